use std::collections::BTreeMap;

use palette::{Hsl, IntoColor, Srgb};

/// An 8-bit sRGB triple, independent of any rendering toolkit.
pub type Rgb = [u8; 3];

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Rgb> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            [
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            ]
        })
        .collect()
}

/// Colour of a heatmap cell holding `count` out of a maximum of `max`:
/// white for zero, saturated blue at the maximum.
pub fn heat(count: usize, max: usize) -> Rgb {
    let t = if max == 0 { 0.0 } else { count as f32 / max as f32 };
    let hsl = Hsl::new(220.0, 0.8, 1.0 - 0.55 * t);
    let rgb: Srgb = hsl.into_color();
    [
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    ]
}

// ---------------------------------------------------------------------------
// Color mapping: series / category label → Rgb
// ---------------------------------------------------------------------------

/// Maps labels (series names or bar categories) to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Rgb>,
    default_color: Rgb,
}

impl ColorMap {
    /// Build a colour map, assigning hues in the order the labels are given.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        let palette = generate_palette(labels.len());
        let mapping = labels.into_iter().zip(palette).collect();

        ColorMap {
            mapping,
            default_color: [128, 128, 128],
        }
    }

    /// Look up the colour for a given label.
    pub fn color_for(&self, label: &str) -> Rgb {
        self.mapping.get(label).copied().unwrap_or(self.default_color)
    }

    /// Return the legend entries (label → colour) for the UI.
    pub fn legend_entries(&self) -> Vec<(String, Rgb)> {
        self.mapping.iter().map(|(l, c)| (l.clone(), *c)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_colours_are_distinct() {
        let p = generate_palette(6);
        assert_eq!(p.len(), 6);
        for (i, a) in p.iter().enumerate() {
            assert!(p[i + 1..].iter().all(|b| a != b));
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn unknown_labels_fall_back_to_grey() {
        let cm = ColorMap::new(["Movie", "TV Show"]);
        assert_ne!(cm.color_for("Movie"), cm.color_for("TV Show"));
        assert_eq!(cm.color_for("Podcast"), [128, 128, 128]);
        assert_eq!(cm.legend_entries().len(), 2);
    }

    #[test]
    fn heat_darkens_with_count() {
        let empty = heat(0, 10);
        let full = heat(10, 10);
        let sum = |c: Rgb| c.iter().map(|&v| v as u32).sum::<u32>();
        assert!(sum(full) < sum(empty));
        assert_eq!(heat(0, 0), empty);
    }
}
