use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ---------------------------------------------------------------------------
// Value – a single cell of the catalog
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value, guessed per cell when the CSV is read.
/// Used as a key in `BTreeMap` / `BTreeSet` downstream so `Value` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord so we can put Value in BTreeSet --

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use std::cmp::Ordering;
        use Value::*;
        fn discriminant(v: &Value) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                // Integers and floats share a rank so mixed numeric columns sort by magnitude.
                Integer(_) | Float(_) => 2,
                String(_) => 3,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Integer(a), Float(b)) => (*a as f64).total_cmp(b).then(Ordering::Less),
            (Float(a), Integer(b)) => a.total_cmp(&(*b as f64)).then(Ordering::Greater),
            (String(a), String(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::String(s) => s.hash(state),
            Value::Integer(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Bool(b) => b.hash(state),
            Value::Null => {}
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Null => write!(f, "<null>"),
        }
    }
}

impl Value {
    /// Try to interpret the value as an `f64` for numeric comparisons and axes.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Guess the type of a raw CSV field. `NaN` and infinities read as missing.
    pub fn guess(s: &str) -> Value {
        if s.is_empty() {
            return Value::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return Value::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return if f.is_finite() { Value::Float(f) } else { Value::Null };
        }
        if s == "true" || s == "false" {
            return Value::Bool(s == "true");
        }
        Value::String(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// ColumnKind – the per-column type classification
// ---------------------------------------------------------------------------

/// Coarse column type consulted by the filter and the relationship classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

impl ColumnKind {
    /// Classify a column from its observed values.
    ///
    /// Numeric requires at least one non-null value and every non-null value
    /// to be an integer or a float.
    pub fn infer<'a>(values: impl IntoIterator<Item = &'a Value>) -> Self {
        let mut seen_numeric = false;
        for v in values {
            match v {
                Value::Null => {}
                Value::Integer(_) | Value::Float(_) => seen_numeric = true,
                _ => return ColumnKind::Categorical,
            }
        }
        if seen_numeric {
            ColumnKind::Numeric
        } else {
            ColumnKind::Categorical
        }
    }

    pub fn is_numeric(self) -> bool {
        self == ColumnKind::Numeric
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Numeric => write!(f, "numeric"),
            ColumnKind::Categorical => write!(f, "categorical"),
        }
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the catalog
// ---------------------------------------------------------------------------

/// A single catalog entry: column_name → value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub fields: BTreeMap<String, Value>,
}

impl Record {
    pub fn new(fields: BTreeMap<String, Value>) -> Self {
        Self { fields }
    }

    /// Value of `column`, `Null` when the row lacks it.
    pub fn get(&self, column: &str) -> &Value {
        static NULL: Value = Value::Null;
        self.fields.get(column).unwrap_or(&NULL)
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded catalog
// ---------------------------------------------------------------------------

/// The full parsed catalog with pre-computed column indices.
///
/// Built once at startup and only ever read afterwards.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// All rows, in file order.
    pub records: Vec<Record>,
    /// Column names in header order.
    pub column_names: Vec<String>,
    /// For each column the sorted set of unique non-null values.
    pub unique_values: BTreeMap<String, BTreeSet<Value>>,
    /// For each column its inferred kind.
    pub kinds: BTreeMap<String, ColumnKind>,
}

impl Dataset {
    /// Build column indices from loaded rows. `column_names` fixes the column order.
    pub fn from_records(column_names: Vec<String>, records: Vec<Record>) -> Self {
        let mut unique_values: BTreeMap<String, BTreeSet<Value>> = column_names
            .iter()
            .map(|c| (c.clone(), BTreeSet::new()))
            .collect();

        for rec in &records {
            for (col, val) in &rec.fields {
                if val.is_null() {
                    continue;
                }
                unique_values
                    .entry(col.clone())
                    .or_default()
                    .insert(val.clone());
            }
        }

        let kinds = unique_values
            .iter()
            .map(|(col, vals)| (col.clone(), ColumnKind::infer(vals)))
            .collect();

        Dataset {
            records,
            column_names,
            unique_values,
            kinds,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Inferred kind of `column`, `None` for unknown columns.
    pub fn kind(&self, column: &str) -> Option<ColumnKind> {
        self.kinds.get(column).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, Value)]) -> Record {
        Record::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        )
    }

    #[test]
    fn guess_picks_the_narrowest_type() {
        assert_eq!(Value::guess(""), Value::Null);
        assert_eq!(Value::guess("2019"), Value::Integer(2019));
        assert_eq!(Value::guess("7.5"), Value::Float(7.5));
        assert_eq!(Value::guess("true"), Value::Bool(true));
        assert_eq!(Value::guess("TV Show"), Value::String("TV Show".into()));
    }

    #[test]
    fn non_finite_floats_read_as_missing() {
        for raw in ["NaN", "nan", "inf", "-inf", "Infinity"] {
            assert_eq!(Value::guess(raw), Value::Null, "{raw}");
        }
    }

    #[test]
    fn mixed_numeric_values_sort_by_magnitude() {
        let mut v = vec![Value::Float(2.5), Value::Integer(3), Value::Integer(1)];
        v.sort();
        assert_eq!(v, vec![Value::Integer(1), Value::Float(2.5), Value::Integer(3)]);
        assert_ne!(
            Value::Integer(2).cmp(&Value::Float(2.0)),
            std::cmp::Ordering::Equal
        );
    }

    #[test]
    fn column_kinds_are_inferred_once_from_values() {
        let ds = Dataset::from_records(
            vec!["type".into(), "release_year".into(), "empty".into()],
            vec![
                record(&[
                    ("type", Value::String("Movie".into())),
                    ("release_year", Value::Integer(2020)),
                    ("empty", Value::Null),
                ]),
                record(&[
                    ("type", Value::String("TV Show".into())),
                    ("release_year", Value::Null),
                    ("empty", Value::Null),
                ]),
            ],
        );
        assert_eq!(ds.kind("type"), Some(ColumnKind::Categorical));
        assert_eq!(ds.kind("release_year"), Some(ColumnKind::Numeric));
        assert_eq!(ds.kind("empty"), Some(ColumnKind::Categorical));
        assert_eq!(ds.kind("missing"), None);
        assert_eq!(ds.unique_values["release_year"].len(), 1);
        assert!(ds.unique_values["empty"].is_empty());
    }

    #[test]
    fn missing_field_reads_as_null() {
        let r = record(&[("type", Value::String("Movie".into()))]);
        assert!(r.get("country").is_null());
    }
}
