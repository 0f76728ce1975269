//! Chart selection and chart construction shared by both front-ends.
//!
//! Nothing here draws pixels: the functions turn a filtered [`View`] into
//! plain chart descriptions ([`Chart`]) which the dashboard hands to
//! `egui_plot` and the web server hands to `plotters`.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::data::aggregate::{content_type_distribution, releases_per_year, top_countries};
use crate::data::filter::View;
use crate::data::model::{ColumnKind, Dataset, Record, Value};

// ---------------------------------------------------------------------------
// Relationship classification
// ---------------------------------------------------------------------------

/// How the user expects the X and Y columns to relate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RelationshipMode {
    #[default]
    Auto,
    OneToOne,
    OneToMany,
    ManyToMany,
}

impl RelationshipMode {
    pub const ALL: [RelationshipMode; 4] = [
        RelationshipMode::Auto,
        RelationshipMode::OneToOne,
        RelationshipMode::OneToMany,
        RelationshipMode::ManyToMany,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RelationshipMode::Auto => "Auto",
            RelationshipMode::OneToOne => "One-to-One",
            RelationshipMode::OneToMany => "One-to-Many",
            RelationshipMode::ManyToMany => "Many-to-Many",
        }
    }

    /// Parse a label as produced by [`RelationshipMode::label`]; unknown
    /// text falls back to `Auto`.
    pub fn from_label(s: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|m| m.label().eq_ignore_ascii_case(s.trim()))
            .unwrap_or_default()
    }
}

impl fmt::Display for RelationshipMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartFamily {
    Bar,
    Line,
    Scatter,
    Histogram,
    Heatmap,
}

/// Result of [`classify`]: exactly one of `family` / `warning` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub family: Option<ChartFamily>,
    pub warning: Option<String>,
}

impl Classification {
    fn chart(family: ChartFamily) -> Self {
        Self {
            family: Some(family),
            warning: None,
        }
    }

    fn warn(msg: &str) -> Self {
        Self {
            family: None,
            warning: Some(msg.to_string()),
        }
    }
}

/// Pick the chart family for a column pair.
///
/// Depends only on the mode and the column kinds, never on row values.
/// In `Auto` a numeric pair wins over a numeric Y, and anything else falls
/// back to a histogram of X alone.
pub fn classify(mode: RelationshipMode, x: ColumnKind, y: ColumnKind) -> Classification {
    use RelationshipMode::*;
    match (mode, x.is_numeric(), y.is_numeric()) {
        (Auto, true, true) => Classification::chart(ChartFamily::Scatter),
        (Auto, _, true) => Classification::chart(ChartFamily::Bar),
        (Auto, _, false) => Classification::chart(ChartFamily::Histogram),
        (OneToOne, true, true) => Classification::chart(ChartFamily::Scatter),
        (OneToOne, _, _) => Classification::warn("One-to-One requires both columns numeric"),
        (OneToMany, _, true) => Classification::chart(ChartFamily::Bar),
        (OneToMany, _, false) => Classification::warn("One-to-Many requires a numeric Y column"),
        (ManyToMany, false, false) => Classification::chart(ChartFamily::Heatmap),
        (ManyToMany, _, _) => Classification::warn("Many-to-Many requires both columns categorical"),
    }
}

// ---------------------------------------------------------------------------
// Chart descriptions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Axes {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
}

impl Axes {
    fn new(title: impl Into<String>, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            x_label: x_label.into(),
            y_label: y_label.into(),
        }
    }
}

/// One value per category.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
}

/// Bars over labelled categories; one bar per category and series.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryChart {
    pub axes: Axes,
    pub categories: Vec<String>,
    pub series: Vec<Series>,
    /// Give every category its own colour instead of every series.
    pub color_by_category: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct XySeries {
    pub name: String,
    pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct XyChart {
    pub axes: Axes,
    pub series: Vec<XySeries>,
}

/// Count of rows per (x, y) pair; `counts[row][col]` is indexed by
/// `y_labels` then `x_labels`, absent pairs hold zero.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotTable {
    pub axes: Axes,
    pub x_labels: Vec<String>,
    pub y_labels: Vec<String>,
    pub counts: Vec<Vec<usize>>,
}

impl PivotTable {
    pub fn max_count(&self) -> usize {
        self.counts.iter().flatten().copied().max().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Chart {
    Bar(CategoryChart),
    Line(XyChart),
    Scatter(XyChart),
    Histogram(CategoryChart),
    Heatmap(PivotTable),
}

impl Chart {
    pub fn family(&self) -> ChartFamily {
        match self {
            Chart::Bar(_) => ChartFamily::Bar,
            Chart::Line(_) => ChartFamily::Line,
            Chart::Scatter(_) => ChartFamily::Scatter,
            Chart::Histogram(_) => ChartFamily::Histogram,
            Chart::Heatmap(_) => ChartFamily::Heatmap,
        }
    }

    pub fn axes(&self) -> &Axes {
        match self {
            Chart::Bar(c) | Chart::Histogram(c) => &c.axes,
            Chart::Line(c) | Chart::Scatter(c) => &c.axes,
            Chart::Heatmap(p) => &p.axes,
        }
    }

    /// A chart with nothing to draw (zero categories or points).
    pub fn is_empty(&self) -> bool {
        match self {
            Chart::Bar(c) | Chart::Histogram(c) => c.categories.is_empty(),
            Chart::Line(c) | Chart::Scatter(c) => c.series.iter().all(|s| s.points.is_empty()),
            Chart::Heatmap(p) => p.x_labels.is_empty() || p.y_labels.is_empty(),
        }
    }
}

// ---------------------------------------------------------------------------
// Standing reports
// ---------------------------------------------------------------------------

/// Bar chart of rows per content type.
pub fn content_type_chart(view: &View<'_>) -> Chart {
    let counts = content_type_distribution(view);
    Chart::Bar(CategoryChart {
        axes: Axes::new("Distribution of Content Types", "Type", "Count"),
        categories: counts.iter().map(|(v, _)| v.to_string()).collect(),
        series: vec![Series {
            name: "count".into(),
            values: counts.iter().map(|(_, n)| *n as f64).collect(),
        }],
        color_by_category: true,
    })
}

/// Bar chart of the ten most common countries.
pub fn top_countries_chart(view: &View<'_>) -> Chart {
    let top = top_countries(view);
    Chart::Bar(CategoryChart {
        axes: Axes::new("Top 10 Countries by Content", "Country", "Count"),
        categories: top.iter().map(|(c, _)| c.clone()).collect(),
        series: vec![Series {
            name: "count".into(),
            values: top.iter().map(|(_, n)| *n as f64).collect(),
        }],
        color_by_category: true,
    })
}

/// Line chart of releases per year.
pub fn releases_chart(view: &View<'_>) -> Chart {
    let points = releases_per_year(view)
        .into_iter()
        .filter_map(|(year, n)| Some((year.as_f64()?, n as f64)))
        .collect();
    Chart::Line(XyChart {
        axes: Axes::new("Content Releases Over Time", "Year", "Number of Releases"),
        series: vec![XySeries {
            name: "releases".into(),
            points,
        }],
    })
}

/// The three charts shown on every page, in display order.
pub fn standing_charts(view: &View<'_>) -> [Chart; 3] {
    [
        content_type_chart(view),
        top_countries_chart(view),
        releases_chart(view),
    ]
}

// ---------------------------------------------------------------------------
// Relationship chart
// ---------------------------------------------------------------------------

/// The user's column choices; `None` means "not chosen".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub mode: RelationshipMode,
    pub x: Option<String>,
    pub y: Option<String>,
    pub color_by: Option<String>,
}

/// What to show in place of the relationship chart.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// X or Y not chosen yet.
    Prompt(String),
    /// The filtered view has no rows.
    NoData,
    /// The column kinds do not suit the mode.
    Warning(String),
    Chart(Chart),
}

pub const SELECT_PROMPT: &str = "Select both an X and a Y column to draw a relationship chart.";
pub const NO_DATA_NOTICE: &str = "No data matches the selected filters.";

/// Build the relationship chart for `selection` over `view`.
///
/// Columns the dataset does not have count as not chosen.
pub fn relationship_chart(view: &View<'_>, selection: &Selection) -> Outcome {
    let dataset = view.dataset();
    let (Some((x, x_kind)), Some((y, y_kind))) = (
        known_column(dataset, &selection.x),
        known_column(dataset, &selection.y),
    ) else {
        return Outcome::Prompt(SELECT_PROMPT.to_string());
    };
    if view.is_empty() {
        return Outcome::NoData;
    }
    let color_by = known_column(dataset, &selection.color_by).map(|(name, _)| name);

    let classification = classify(selection.mode, x_kind, y_kind);
    let Some(family) = classification.family else {
        let warning = classification.warning.unwrap_or_default();
        log::warn!("{} chart of {x} / {y} refused: {warning}", selection.mode);
        return Outcome::Warning(warning);
    };

    let chart = match family {
        ChartFamily::Scatter => scatter(view, x, y, color_by),
        ChartFamily::Bar => bar_sum(view, x, y, color_by),
        ChartFamily::Histogram => histogram(view, x, x_kind, color_by),
        ChartFamily::Heatmap => heatmap(view, x, y),
        // classify never picks a line chart for a column pair.
        ChartFamily::Line => return Outcome::Warning("Line charts are reserved for the release timeline".into()),
    };
    Outcome::Chart(chart)
}

fn known_column<'s>(dataset: &Dataset, column: &'s Option<String>) -> Option<(&'s str, ColumnKind)> {
    let name = column.as_deref()?;
    Some((name, dataset.kind(name)?))
}

fn group_name(record: &Record, color_by: Option<&str>, fallback: &str) -> String {
    match color_by {
        Some(col) => record.get(col).to_string(),
        None => fallback.to_string(),
    }
}

fn scatter(view: &View<'_>, x: &str, y: &str, color_by: Option<&str>) -> Chart {
    let mut groups: BTreeMap<String, Vec<(f64, f64)>> = BTreeMap::new();
    for rec in view.rows() {
        if let (Some(xv), Some(yv)) = (rec.get(x).as_f64(), rec.get(y).as_f64()) {
            groups
                .entry(group_name(rec, color_by, y))
                .or_default()
                .push((xv, yv));
        }
    }
    Chart::Scatter(XyChart {
        axes: Axes::new(format!("{y} vs {x}"), x, y),
        series: groups
            .into_iter()
            .map(|(name, points)| XySeries { name, points })
            .collect(),
    })
}

/// Y summed per distinct X value, split into series by the colour column.
fn bar_sum(view: &View<'_>, x: &str, y: &str, color_by: Option<&str>) -> Chart {
    let mut categories: BTreeSet<&Value> = BTreeSet::new();
    let mut sums: BTreeMap<String, BTreeMap<&Value, f64>> = BTreeMap::new();
    for rec in view.rows() {
        let xv = rec.get(x);
        let Some(yv) = rec.get(y).as_f64() else { continue };
        if xv.is_null() {
            continue;
        }
        categories.insert(xv);
        *sums
            .entry(group_name(rec, color_by, y))
            .or_default()
            .entry(xv)
            .or_default() += yv;
    }
    let series = sums
        .into_iter()
        .map(|(name, per_x)| Series {
            name,
            values: categories
                .iter()
                .map(|c| per_x.get(c).copied().unwrap_or(0.0))
                .collect(),
        })
        .collect();
    Chart::Bar(CategoryChart {
        axes: Axes::new(format!("{y} by {x}"), x, y),
        categories: categories.iter().map(|v| v.to_string()).collect(),
        series,
        color_by_category: color_by.is_none(),
    })
}

/// Distribution of X alone: counts per category, or equal-width bins for
/// numeric columns.
fn histogram(view: &View<'_>, x: &str, x_kind: ColumnKind, color_by: Option<&str>) -> Chart {
    let rows: Vec<(&Value, String)> = view
        .rows()
        .filter(|r| !r.get(x).is_null())
        .map(|r| (r.get(x), group_name(r, color_by, "count")))
        .collect();

    type Bucket = Box<dyn Fn(&Value) -> Option<usize>>;
    let (categories, bucket_of): (Vec<String>, Bucket) = match x_kind {
        ColumnKind::Numeric => {
            let bins = Bins::fit(rows.iter().filter_map(|(v, _)| v.as_f64()));
            let labels = bins.labels();
            let bucket: Bucket = Box::new(move |v: &Value| bins.index(v.as_f64()?));
            (labels, bucket)
        }
        ColumnKind::Categorical => {
            let distinct: Vec<Value> = rows
                .iter()
                .map(|(v, _)| (*v).clone())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect();
            let labels = distinct.iter().map(Value::to_string).collect();
            let bucket: Bucket = Box::new(move |v: &Value| distinct.binary_search(v).ok());
            (labels, bucket)
        }
    };

    let mut counts: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for (v, group) in &rows {
        if let Some(i) = bucket_of(v) {
            counts
                .entry(group.clone())
                .or_insert_with(|| vec![0.0; categories.len()])[i] += 1.0;
        }
    }

    Chart::Histogram(CategoryChart {
        axes: Axes::new(format!("Distribution of {x}"), x, "count"),
        categories,
        series: counts
            .into_iter()
            .map(|(name, values)| Series { name, values })
            .collect(),
        color_by_category: false,
    })
}

/// Equal-width bins over a numeric range, sized by Sturges' rule.
#[derive(Debug, Clone, PartialEq)]
struct Bins {
    min: f64,
    width: f64,
    count: usize,
}

impl Bins {
    fn fit(values: impl Iterator<Item = f64>) -> Self {
        let (mut min, mut max, mut n) = (f64::INFINITY, f64::NEG_INFINITY, 0usize);
        for v in values.filter(|v| v.is_finite()) {
            min = min.min(v);
            max = max.max(v);
            n += 1;
        }
        if n == 0 {
            return Bins { min: 0.0, width: 1.0, count: 0 };
        }
        let count = ((n as f64).log2().ceil() as usize + 1).max(1);
        let span = max - min;
        if span == 0.0 {
            return Bins { min, width: 1.0, count: 1 };
        }
        Bins {
            min,
            width: span / count as f64,
            count,
        }
    }

    /// The last bin is closed so the maximum lands inside it.
    fn index(&self, v: f64) -> Option<usize> {
        if self.count == 0 || !v.is_finite() || v < self.min {
            return None;
        }
        let i = ((v - self.min) / self.width) as usize;
        Some(i.min(self.count - 1))
    }

    fn labels(&self) -> Vec<String> {
        fn short(v: f64) -> String {
            let r = (v * 100.0).round() / 100.0;
            format!("{r}")
        }
        (0..self.count)
            .map(|i| {
                let lo = self.min + self.width * i as f64;
                format!("{}-{}", short(lo), short(lo + self.width))
            })
            .collect()
    }
}

/// Count pivot of X against Y with zero-filled gaps.
fn heatmap(view: &View<'_>, x: &str, y: &str) -> Chart {
    let mut pairs: BTreeMap<(&Value, &Value), usize> = BTreeMap::new();
    let mut xs: BTreeSet<&Value> = BTreeSet::new();
    let mut ys: BTreeSet<&Value> = BTreeSet::new();
    for rec in view.rows() {
        let (xv, yv) = (rec.get(x), rec.get(y));
        if xv.is_null() || yv.is_null() {
            continue;
        }
        xs.insert(xv);
        ys.insert(yv);
        *pairs.entry((xv, yv)).or_default() += 1;
    }
    let counts = ys
        .iter()
        .map(|yv| {
            xs.iter()
                .map(|xv| pairs.get(&(*xv, *yv)).copied().unwrap_or(0))
                .collect()
        })
        .collect();
    Chart::Heatmap(PivotTable {
        axes: Axes::new(format!("{x} vs {y} (count)"), x, y),
        x_labels: xs.iter().map(|v| v.to_string()).collect(),
        y_labels: ys.iter().map(|v| v.to_string()).collect(),
        counts,
    })
}
