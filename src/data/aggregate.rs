use std::collections::{BTreeMap, HashMap};

use super::filter::View;
use super::model::{Dataset, Value};

/// How many countries the "top countries" report keeps.
pub const TOP_COUNTRIES: usize = 10;

// ---------------------------------------------------------------------------
// Counting primitives
// ---------------------------------------------------------------------------

/// Count non-null values, most frequent first; ties are ordered by value so
/// the result does not depend on row order.
pub fn value_counts<'a>(values: impl IntoIterator<Item = &'a Value>) -> Vec<(Value, usize)> {
    let mut counts: HashMap<&Value, usize> = HashMap::new();
    for v in values {
        if !v.is_null() {
            *counts.entry(v).or_default() += 1;
        }
    }
    let mut out: Vec<(Value, usize)> = counts.into_iter().map(|(v, n)| (v.clone(), n)).collect();
    out.sort_by(|(va, na), (vb, nb)| nb.cmp(na).then_with(|| va.cmp(vb)));
    out
}

/// [`value_counts`] over one column of a view.
pub fn column_counts(view: &View<'_>, column: &str) -> Vec<(Value, usize)> {
    value_counts(view.column(column))
}

// ---------------------------------------------------------------------------
// Standing reports
// ---------------------------------------------------------------------------

/// Rows per content type (`type` column).
pub fn content_type_distribution(view: &View<'_>) -> Vec<(Value, usize)> {
    column_counts(view, "type")
}

/// The ten most common production countries.
///
/// Cells listing several countries (`"United States, India"`) credit each of
/// them once, so co-productions are not hidden behind their combined label.
pub fn top_countries(view: &View<'_>) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for value in view.column("country") {
        let cell = value.to_string();
        for country in cell.split(',').map(str::trim).filter(|c| !c.is_empty()) {
            *counts.entry(country.to_string()).or_default() += 1;
        }
    }
    let mut out: Vec<(String, usize)> = counts.into_iter().collect();
    out.sort_by(|(ca, na), (cb, nb)| nb.cmp(na).then_with(|| ca.cmp(cb)));
    out.truncate(TOP_COUNTRIES);
    out
}

/// Releases per `release_year`, oldest year first.
pub fn releases_per_year(view: &View<'_>) -> Vec<(Value, usize)> {
    let mut counts: BTreeMap<Value, usize> = BTreeMap::new();
    for v in view.column("release_year") {
        *counts.entry(normalize_year(v)).or_default() += 1;
    }
    counts.into_iter().collect()
}

/// `2019.0` and `2019` are the same year.
fn normalize_year(v: &Value) -> Value {
    match v {
        Value::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Value::Integer(*f as i64),
        other => other.clone(),
    }
}

// ---------------------------------------------------------------------------
// Selector options
// ---------------------------------------------------------------------------

/// Sorted distinct non-null values of `column` across the whole dataset.
pub fn options(dataset: &Dataset, column: &str) -> Vec<Value> {
    dataset
        .unique_values
        .get(column)
        .map(|vals| vals.iter().cloned().collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::data::filter::{apply, filter_state};
    use crate::data::loader::read_csv;

    fn catalog() -> Dataset {
        read_csv(
            "type,country,release_year\n\
             Movie,India,2019\n\
             Movie,\"United States, India\",2020\n\
             TV Show,India,2019\n\
             TV Show,Japan,2021\n\
             Movie,,2018\n\
             Movie,Japan,\n"
                .as_bytes(),
        )
        .unwrap()
    }

    fn s(v: &str) -> Value {
        Value::String(v.into())
    }

    #[test]
    fn type_distribution_counts_each_type() {
        let ds = catalog();
        let counts = content_type_distribution(&View::all(&ds));
        assert_eq!(counts, vec![(s("Movie"), 4), (s("TV Show"), 2)]);
    }

    #[test]
    fn top_countries_splits_co_productions() {
        let ds = catalog();
        let top = top_countries(&View::all(&ds));
        assert_eq!(
            top,
            vec![
                ("India".to_string(), 3),
                ("Japan".to_string(), 2),
                ("United States".to_string(), 1),
            ]
        );
    }

    #[test]
    fn releases_are_sorted_by_year() {
        let ds = catalog();
        let years = releases_per_year(&View::all(&ds));
        assert_eq!(
            years,
            vec![
                (Value::Integer(2018), 1),
                (Value::Integer(2019), 2),
                (Value::Integer(2020), 1),
                (Value::Integer(2021), 1),
            ]
        );
    }

    #[test]
    fn empty_view_gives_empty_reports() {
        let ds = catalog();
        let view = apply(&ds, &filter_state([("type", Some("Documentary"))]));
        assert!(view.is_empty());
        assert!(content_type_distribution(&view).is_empty());
        assert!(top_countries(&view).is_empty());
        assert!(releases_per_year(&view).is_empty());
    }

    #[test]
    fn options_are_sorted_and_distinct() {
        let ds = catalog();
        assert_eq!(options(&ds, "type"), vec![s("Movie"), s("TV Show")]);
        assert_eq!(options(&ds, "release_year").len(), 4);
        assert!(options(&ds, "director").is_empty());
    }

    #[test]
    fn float_years_merge_with_integer_years() {
        let ds = read_csv("type,country,release_year\nMovie,India,2019\nMovie,India,2019.0\n".as_bytes())
            .unwrap();
        assert_eq!(releases_per_year(&View::all(&ds)), vec![(Value::Integer(2019), 2)]);
    }

    proptest! {
        #[test]
        fn top_countries_is_bounded_and_descending(
            countries in prop::collection::vec("[A-P]", 0..200),
        ) {
            let mut text = String::from("type,country,release_year\n");
            for c in &countries {
                text.push_str(&format!("Movie,{c},2000\n"));
            }
            let ds = read_csv(text.as_bytes()).unwrap();
            let top = top_countries(&View::all(&ds));
            prop_assert!(top.len() <= TOP_COUNTRIES);
            prop_assert!(top.windows(2).all(|w| w[0].1 >= w[1].1));
        }

        #[test]
        fn release_years_strictly_ascend(
            years in prop::collection::vec(1950i64..2025, 0..200),
        ) {
            let mut text = String::from("type,country,release_year\n");
            for y in &years {
                text.push_str(&format!("Movie,India,{y}\n"));
            }
            let ds = read_csv(text.as_bytes()).unwrap();
            let per_year = releases_per_year(&View::all(&ds));
            prop_assert!(per_year.windows(2).all(|w| w[0].0 < w[1].0));
            prop_assert_eq!(per_year.iter().map(|(_, n)| n).sum::<usize>(), years.len());
        }
    }
}
