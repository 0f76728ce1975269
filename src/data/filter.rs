use std::collections::BTreeMap;

use super::model::{ColumnKind, Dataset, Record, Value};

/// Columns offered as equality filters by both front-ends.
pub const FILTER_COLUMNS: [&str; 3] = ["type", "release_year", "country"];

// ---------------------------------------------------------------------------
// Filter predicate: one accepted value per column
// ---------------------------------------------------------------------------

/// Per-column selection state: maps column_name → accepted value.
/// A column that is absent, or whose value is empty, is unconstrained.
pub type FilterState = BTreeMap<String, String>;

/// Build a [`FilterState`] from optional selections, dropping unset ones.
pub fn filter_state<'a>(
    pairs: impl IntoIterator<Item = (&'a str, Option<&'a str>)>,
) -> FilterState {
    pairs
        .into_iter()
        .filter_map(|(col, val)| {
            let val = val?.trim();
            (!val.is_empty()).then(|| (col.to_string(), val.to_string()))
        })
        .collect()
}

/// Whether a single cell satisfies `wanted`.
///
/// * Numeric columns compare numerically after parsing `wanted` as a float,
///   so `"2019"` matches both `2019` and `2019.0`.
/// * Categorical columns compare the cell's text exactly.
/// * Null cells never match.
pub fn value_matches(value: &Value, kind: ColumnKind, wanted: &str) -> bool {
    if value.is_null() {
        return false;
    }
    match kind {
        ColumnKind::Numeric => match (wanted.trim().parse::<f64>(), value.as_f64()) {
            (Ok(w), Some(v)) => w == v,
            _ => false,
        },
        ColumnKind::Categorical => value.to_string() == wanted,
    }
}

fn record_matches(dataset: &Dataset, record: &Record, filters: &FilterState) -> bool {
    filters.iter().all(|(col, wanted)| {
        if wanted.is_empty() {
            return true;
        }
        match dataset.kind(col) {
            Some(kind) => value_matches(record.get(col), kind, wanted),
            // Unknown column: nothing can satisfy it.
            None => false,
        }
    })
}

/// Return indices of rows that pass all active filters, in dataset order.
pub fn filtered_indices(dataset: &Dataset, filters: &FilterState) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| record_matches(dataset, rec, filters))
        .map(|(i, _)| i)
        .collect()
}

// ---------------------------------------------------------------------------
// View – a borrowed subset of the dataset
// ---------------------------------------------------------------------------

/// The rows of a [`Dataset`] that survived filtering.
///
/// Holds indices only; the dataset itself is never copied or mutated.
#[derive(Debug, Clone)]
pub struct View<'a> {
    dataset: &'a Dataset,
    indices: Vec<usize>,
}

impl<'a> View<'a> {
    /// Unfiltered view over every row.
    pub fn all(dataset: &'a Dataset) -> Self {
        Self {
            dataset,
            indices: (0..dataset.len()).collect(),
        }
    }

    /// View over previously computed indices (e.g. cached by the dashboard).
    pub fn from_indices(dataset: &'a Dataset, indices: Vec<usize>) -> Self {
        Self { dataset, indices }
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = &'a Record> + '_ {
        let records = &self.dataset.records;
        self.indices.iter().map(move |&i| &records[i])
    }

    /// Non-null values of `column` in row order.
    pub fn column<'s>(&'s self, column: &'s str) -> impl Iterator<Item = &'a Value> + 's {
        self.rows()
            .map(move |r| r.get(column))
            .filter(|v| !v.is_null())
    }
}

/// Apply `filters` to `dataset`.
pub fn apply<'a>(dataset: &'a Dataset, filters: &FilterState) -> View<'a> {
    View::from_indices(dataset, filtered_indices(dataset, filters))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::data::loader::read_csv;

    fn catalog() -> Dataset {
        read_csv(
            "type,country,release_year\n\
             Movie,India,2019\n\
             Movie,United States,2020\n\
             Movie,India,2020\n\
             Movie,,2018\n\
             Movie,Japan,2019\n\
             TV Show,India,2019\n\
             TV Show,Japan,2021\n\
             TV Show,United States,\n"
                .as_bytes(),
        )
        .unwrap()
    }

    #[test]
    fn type_filter_keeps_only_movies() {
        let ds = catalog();
        let view = apply(&ds, &filter_state([("type", Some("Movie"))]));
        assert_eq!(view.len(), 5);
        assert!(view.rows().all(|r| r.get("type") == &Value::String("Movie".into())));
    }

    #[test]
    fn empty_filter_state_is_the_whole_dataset() {
        let ds = catalog();
        let view = apply(&ds, &FilterState::new());
        assert_eq!(view.indices(), View::all(&ds).indices());
    }

    #[test]
    fn unset_values_do_not_constrain() {
        let ds = catalog();
        let filters = filter_state([
            ("type", Some("")),
            ("release_year", None),
            ("country", Some("  ")),
        ]);
        assert!(filters.is_empty());
        assert_eq!(apply(&ds, &filters).len(), ds.len());
    }

    #[test]
    fn predicates_are_conjunctive() {
        let ds = catalog();
        let filters = filter_state([
            ("type", Some("Movie")),
            ("release_year", Some("2019")),
            ("country", Some("India")),
        ]);
        assert_eq!(apply(&ds, &filters).indices(), &[0]);
    }

    #[test]
    fn year_compares_numerically() {
        let ds = catalog();
        let view = apply(&ds, &filter_state([("release_year", Some("2020.0"))]));
        assert_eq!(view.indices(), &[1, 2]);
    }

    #[test]
    fn absent_value_gives_empty_view() {
        let ds = catalog();
        assert!(apply(&ds, &filter_state([("country", Some("Atlantis"))])).is_empty());
        assert!(apply(&ds, &filter_state([("release_year", Some("soon"))])).is_empty());
        assert!(apply(&ds, &filter_state([("director", Some("Anyone"))])).is_empty());
    }

    #[test]
    fn nulls_never_match() {
        assert!(!value_matches(&Value::Null, ColumnKind::Categorical, "<null>"));
        assert!(!value_matches(&Value::Null, ColumnKind::Numeric, "0"));
    }

    const TYPES: [&str; 2] = ["Movie", "TV Show"];
    const COUNTRIES: [&str; 3] = ["India", "Japan", ""];

    proptest! {
        #[test]
        fn view_is_exactly_the_matching_subset(
            rows in prop::collection::vec((0usize..2, 0usize..3, 2015i64..2019), 0..40),
            want_type in prop::option::of(0usize..2),
            want_country in prop::option::of(0usize..3),
            want_year in prop::option::of(2014i64..2020),
        ) {
            let mut text = String::from("type,country,release_year\n");
            for (t, c, y) in &rows {
                text.push_str(&format!("{},{},{}\n", TYPES[*t], COUNTRIES[*c], y));
            }
            let ds = read_csv(text.as_bytes()).unwrap();
            let year = want_year.map(|y| y.to_string());
            let filters = filter_state([
                ("type", want_type.map(|t| TYPES[t])),
                ("country", want_country.map(|c| COUNTRIES[c])),
                ("release_year", year.as_deref()),
            ]);
            let view = apply(&ds, &filters);

            prop_assert!(view.indices().windows(2).all(|w| w[0] < w[1]));
            prop_assert!(view.indices().iter().all(|&i| i < ds.len()));

            for (i, (t, c, y)) in rows.iter().enumerate() {
                let expected = want_type.map_or(true, |w| w == *t)
                    && want_country.map_or(true, |w| COUNTRIES[w].is_empty() || (w == *c))
                    && want_year.map_or(true, |w| w == *y);
                prop_assert_eq!(view.indices().contains(&i), expected);
            }
        }
    }
}
