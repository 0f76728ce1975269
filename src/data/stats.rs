use super::aggregate::value_counts;
use super::filter::View;
use super::model::{ColumnKind, Value};

// ---------------------------------------------------------------------------
// Column summaries
// ---------------------------------------------------------------------------

/// Descriptive statistics of a numeric column.
///
/// Everything except `count` is `None` when the column has no values;
/// `std` additionally needs two values.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

/// Descriptive statistics of a categorical column.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoricalSummary {
    pub count: usize,
    pub unique: usize,
    pub top: Option<Value>,
    pub freq: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Summary {
    Numeric(NumericSummary),
    Categorical(CategoricalSummary),
}

impl Summary {
    /// Row label / formatted value pairs, in display order.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        fn num(v: Option<f64>) -> String {
            v.map_or_else(|| "NaN".to_string(), |v| format!("{v:.6}"))
        }
        match self {
            Summary::Numeric(s) => vec![
                ("count", s.count.to_string()),
                ("mean", num(s.mean)),
                ("std", num(s.std)),
                ("min", num(s.min)),
                ("25%", num(s.q25)),
                ("50%", num(s.median)),
                ("75%", num(s.q75)),
                ("max", num(s.max)),
            ],
            Summary::Categorical(s) => vec![
                ("count", s.count.to_string()),
                ("unique", s.unique.to_string()),
                ("top", s.top.as_ref().map_or_else(|| "NaN".to_string(), Value::to_string)),
                ("freq", s.freq.map_or_else(|| "NaN".to_string(), |f| f.to_string())),
            ],
        }
    }
}

/// Summarise `column` over the rows of `view`.
///
/// Returns `None` for a column the dataset does not have.
pub fn describe(view: &View<'_>, column: &str) -> Option<Summary> {
    let kind = view.dataset().kind(column)?;
    let summary = match kind {
        ColumnKind::Numeric => {
            let values: Vec<f64> = view.column(column).filter_map(Value::as_f64).collect();
            Summary::Numeric(describe_numeric(values))
        }
        ColumnKind::Categorical => {
            let counts = value_counts(view.column(column));
            let count = counts.iter().map(|(_, n)| n).sum();
            // value_counts breaks ties by value, so the first entry is the top.
            let top = counts.first().cloned();
            Summary::Categorical(CategoricalSummary {
                count,
                unique: counts.len(),
                freq: top.as_ref().map(|(_, n)| *n),
                top: top.map(|(v, _)| v),
            })
        }
    };
    Some(summary)
}

fn describe_numeric(mut values: Vec<f64>) -> NumericSummary {
    values.sort_by(f64::total_cmp);
    let count = values.len();
    if count == 0 {
        return NumericSummary {
            count,
            mean: None,
            std: None,
            min: None,
            q25: None,
            median: None,
            q75: None,
            max: None,
        };
    }

    let n = count as f64;
    let mean = values.iter().sum::<f64>() / n;
    let std = (count > 1).then(|| {
        let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (n - 1.0)).sqrt()
    });

    NumericSummary {
        count,
        mean: Some(mean),
        std,
        min: values.first().copied(),
        q25: Some(quantile(&values, 0.25)),
        median: Some(quantile(&values, 0.5)),
        q75: Some(quantile(&values, 0.75)),
        max: values.last().copied(),
    }
}

/// Linear interpolation between the closest ranks of a sorted, non-empty slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}
