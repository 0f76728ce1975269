//! Chart descriptions → inline SVG via `plotters`.

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::chart::{CategoryChart, Chart, PivotTable, XyChart};
use crate::color::{heat, ColorMap, Rgb};

/// Pixel size of every rendered chart.
pub const CHART_SIZE: (u32, u32) = (640, 400);

type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;

fn rgb(c: Rgb) -> RGBColor {
    RGBColor(c[0], c[1], c[2])
}

/// Render `chart` as a standalone `<svg>` document.
pub fn render_svg(chart: &Chart) -> anyhow::Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE)?;
        match chart {
            Chart::Bar(c) | Chart::Histogram(c) => draw_categories(&root, c)?,
            Chart::Line(c) => draw_xy(&root, c, true)?,
            Chart::Scatter(c) => draw_xy(&root, c, false)?,
            Chart::Heatmap(p) => draw_heatmap(&root, p)?,
        }
        root.present()?;
    }
    Ok(svg)
}

/// Stacked bars: every series is drawn on top of the previous ones.
fn draw_categories(root: &Area<'_>, c: &CategoryChart) -> anyhow::Result<()> {
    let n = c.categories.len();
    let totals: Vec<f64> = (0..n)
        .map(|i| c.series.iter().map(|s| s.values.get(i).copied().unwrap_or(0.0)).sum())
        .collect();
    let max = totals.iter().copied().fold(0.0, f64::max);
    let y_max = if max > 0.0 { max * 1.1 } else { 1.0 };

    let mut chart = ChartBuilder::on(root)
        .caption(&c.axes.title, ("sans-serif", 20).into_font())
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(50)
        .build_cartesian_2d((0u32..n.max(1) as u32).into_segmented(), 0f64..y_max)?;

    let categories = &c.categories;
    let label = |v: &SegmentValue<u32>| match v {
        SegmentValue::CenterOf(i) => categories.get(*i as usize).cloned().unwrap_or_default(),
        _ => String::new(),
    };
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n.max(1))
        .x_label_formatter(&label)
        .x_desc(&c.axes.x_label)
        .y_desc(&c.axes.y_label)
        .draw()?;

    let category_colors = ColorMap::new(categories.iter().cloned());
    let series_colors = ColorMap::new(c.series.iter().map(|s| s.name.clone()));
    let mut base = vec![0.0; n];

    for series in &c.series {
        let bars: Vec<Rectangle<(SegmentValue<u32>, f64)>> = series
            .values
            .iter()
            .enumerate()
            .filter(|(_, v)| **v > 0.0)
            .map(|(i, v)| {
                let color = if c.color_by_category {
                    category_colors.color_for(&categories[i])
                } else {
                    series_colors.color_for(&series.name)
                };
                let mut bar = Rectangle::new(
                    [
                        (SegmentValue::Exact(i as u32), base[i]),
                        (SegmentValue::Exact(i as u32 + 1), base[i] + v),
                    ],
                    rgb(color).filled(),
                );
                bar.set_margin(0, 0, 6, 6);
                base[i] += v;
                bar
            })
            .collect();

        let anno = chart.draw_series(bars)?;
        if !c.color_by_category {
            let color = rgb(series_colors.color_for(&series.name));
            anno.label(&series.name)
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
        }
    }

    if !c.color_by_category && c.series.len() > 1 {
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
    }
    Ok(())
}

/// Padded axis range covering `values`; `0..1` when there are none.
fn span(values: impl Iterator<Item = f64>) -> std::ops::Range<f64> {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !lo.is_finite() {
        return 0.0..1.0;
    }
    let pad = if hi > lo { (hi - lo) * 0.05 } else { 1.0 };
    lo - pad..hi + pad
}

fn draw_xy(root: &Area<'_>, c: &XyChart, connect: bool) -> anyhow::Result<()> {
    let points = || c.series.iter().flat_map(|s| s.points.iter());
    let x_range = span(points().map(|p| p.0));
    let y_range = if connect {
        // Counts start at zero.
        0.0..span(points().map(|p| p.1)).end
    } else {
        span(points().map(|p| p.1))
    };

    let mut chart = ChartBuilder::on(root)
        .caption(&c.axes.title, ("sans-serif", 20).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc(&c.axes.x_label)
        .y_desc(&c.axes.y_label)
        .x_label_formatter(&|x| format!("{x:.0}"))
        .draw()?;

    let colors = ColorMap::new(c.series.iter().map(|s| s.name.clone()));
    for series in &c.series {
        let color = rgb(colors.color_for(&series.name));
        if connect {
            chart.draw_series(LineSeries::new(series.points.iter().copied(), color.stroke_width(2)))?;
        }
        let anno = chart.draw_series(
            series
                .points
                .iter()
                .map(|&p| Circle::new(p, if connect { 2 } else { 3 }, color.filled())),
        )?;
        anno.label(&series.name)
            .legend(move |(x, y)| Circle::new((x + 5, y), 4, color.filled()));
    }

    if c.series.len() > 1 {
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
    }
    Ok(())
}

fn draw_heatmap(root: &Area<'_>, p: &PivotTable) -> anyhow::Result<()> {
    let nx = p.x_labels.len().max(1) as u32;
    let ny = p.y_labels.len().max(1) as u32;

    let mut chart = ChartBuilder::on(root)
        .caption(&p.axes.title, ("sans-serif", 20).into_font())
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(90)
        .build_cartesian_2d((0..nx).into_segmented(), (0..ny).into_segmented())?;

    let x_label = |v: &SegmentValue<u32>| match v {
        SegmentValue::CenterOf(i) => p.x_labels.get(*i as usize).cloned().unwrap_or_default(),
        _ => String::new(),
    };
    let y_label = |v: &SegmentValue<u32>| match v {
        SegmentValue::CenterOf(i) => p.y_labels.get(*i as usize).cloned().unwrap_or_default(),
        _ => String::new(),
    };
    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(nx as usize)
        .y_labels(ny as usize)
        .x_label_formatter(&x_label)
        .y_label_formatter(&y_label)
        .x_desc(&p.axes.x_label)
        .y_desc(&p.axes.y_label)
        .draw()?;

    let max = p.max_count();
    let cells = p.counts.iter().enumerate().flat_map(|(row, counts)| {
        counts.iter().enumerate().map(move |(col, &n)| (col as u32, row as u32, n))
    });
    chart.draw_series(cells.clone().map(|(col, row, n)| {
        Rectangle::new(
            [
                (SegmentValue::Exact(col), SegmentValue::Exact(row)),
                (SegmentValue::Exact(col + 1), SegmentValue::Exact(row + 1)),
            ],
            rgb(heat(n, max)).filled(),
        )
    }))?;

    let centered = ("sans-serif", 13)
        .into_font()
        .into_text_style(root)
        .pos(Pos::new(HPos::Center, VPos::Center));
    chart.draw_series(cells.map(|(col, row, n)| {
        Text::new(
            n.to_string(),
            (SegmentValue::CenterOf(col), SegmentValue::CenterOf(row)),
            centered.clone(),
        )
    }))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{standing_charts, Axes, Series, XySeries};
    use crate::data::filter::View;
    use crate::data::loader::read_csv;

    fn axes() -> Axes {
        Axes {
            title: "Title <1>".into(),
            x_label: "x".into(),
            y_label: "y".into(),
        }
    }

    #[test]
    fn every_family_renders_svg() {
        let charts = [
            Chart::Bar(CategoryChart {
                axes: axes(),
                categories: vec!["Movie".into(), "TV Show".into()],
                series: vec![
                    Series { name: "a".into(), values: vec![3.0, 1.0] },
                    Series { name: "b".into(), values: vec![0.0, 2.0] },
                ],
                color_by_category: false,
            }),
            Chart::Scatter(XyChart {
                axes: axes(),
                series: vec![XySeries { name: "pts".into(), points: vec![(1.0, 2.0), (3.0, 4.0)] }],
            }),
            Chart::Heatmap(PivotTable {
                axes: axes(),
                x_labels: vec!["Movie".into()],
                y_labels: vec!["PG".into(), "R".into()],
                counts: vec![vec![1], vec![0]],
            }),
        ];
        for chart in &charts {
            let svg = render_svg(chart).unwrap();
            assert!(svg.contains("<svg"), "{:?}", chart.family());
            assert!(svg.contains("</svg>"));
        }
    }

    #[test]
    fn empty_standing_charts_still_render() {
        let ds = read_csv("type,country,release_year\n".as_bytes()).unwrap();
        for chart in standing_charts(&View::all(&ds)) {
            assert!(chart.is_empty());
            assert!(render_svg(&chart).unwrap().contains("<svg"));
        }
    }

    #[test]
    fn span_pads_single_values() {
        assert_eq!(span([2020.0].into_iter()), 2019.0..2021.0);
        assert_eq!(span(std::iter::empty()), 0.0..1.0);
    }
}
