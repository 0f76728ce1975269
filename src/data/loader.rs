use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use crate::error::{DataError, Result};

use super::model::{Dataset, Record, Value};

/// Columns every catalog file must provide.
pub const REQUIRED_COLUMNS: [&str; 3] = ["type", "country", "release_year"];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the catalog from a file.  Dispatch by extension.
///
/// Only `.csv` is supported; anything else is rejected up front so a
/// misconfigured path fails before the CSV parser produces a confusing error.
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        other => Err(DataError::UnsupportedFormat(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one catalog entry per row.
/// Every column is kept; cell types are guessed individually.
pub fn load_csv(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = read_csv(file)?;
    log::info!(
        "Loaded {} rows from {} with columns {:?}",
        dataset.len(),
        path.display(),
        dataset.column_names
    );
    Ok(dataset)
}

/// Parse CSV text from any reader.
pub fn read_csv<R: Read>(input: R) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    for required in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == required) {
            return Err(DataError::MissingColumn(required.to_string()));
        }
    }

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        let fields: BTreeMap<String, Value> = headers
            .iter()
            .zip(row.iter())
            .map(|(col, raw)| (col.clone(), Value::guess(raw)))
            .collect();
        records.push(Record::new(fields));
    }

    Ok(Dataset::from_records(headers, records))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::data::model::ColumnKind;

    const SAMPLE: &str = "\
show_id,type,title,country,release_year
s1,Movie,Dick Johnson Is Dead,United States,2020
s2,TV Show,Blood & Water,South Africa,2021
s3,TV Show,Ganglands,,2021
s4,Movie,Sankofa,\"United States, Ghana, Burkina Faso\",1993
";

    #[test]
    fn reads_rows_and_guesses_types() {
        let ds = read_csv(SAMPLE.as_bytes()).unwrap();
        assert_eq!(ds.len(), 4);
        assert_eq!(
            ds.column_names,
            vec!["show_id", "type", "title", "country", "release_year"]
        );
        assert_eq!(ds.records[0].get("release_year"), &Value::Integer(2020));
        assert!(ds.records[2].get("country").is_null());
        assert_eq!(
            ds.records[3].get("country"),
            &Value::String("United States, Ghana, Burkina Faso".into())
        );
        assert_eq!(ds.kind("release_year"), Some(ColumnKind::Numeric));
        assert_eq!(ds.kind("type"), Some(ColumnKind::Categorical));
    }

    #[test]
    fn padded_cells_are_trimmed() {
        let ds = read_csv(" type , country ,release_year\nMovie,India ,2019\n TV Show,  ,2020\n".as_bytes())
            .unwrap();
        assert_eq!(ds.column_names, vec!["type", "country", "release_year"]);
        assert_eq!(ds.records[0].get("country"), &Value::String("India".into()));
        assert_eq!(ds.records[1].get("type"), &Value::String("TV Show".into()));
        assert!(ds.records[1].get("country").is_null());
    }

    #[test]
    fn nan_cells_are_skipped_by_summaries() {
        use crate::data::filter::View;
        use crate::data::stats::describe;

        let ds = read_csv("type,country,release_year\nMovie,India,2019\nMovie,Japan,NaN\n".as_bytes())
            .unwrap();
        assert!(ds.records[1].get("release_year").is_null());
        assert_eq!(ds.kind("release_year"), Some(ColumnKind::Numeric));

        let rows = describe(&View::all(&ds), "release_year").unwrap().rows();
        assert_eq!(rows[0], ("count", "1".to_string()));
        assert_eq!(rows[1], ("mean", "2019.000000".to_string()));
        assert_eq!(rows[7], ("max", "2019.000000".to_string()));
    }

    #[test]
    fn missing_required_column_is_fatal() {
        let err = read_csv("type,country\nMovie,India\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::MissingColumn(ref c) if c == "release_year"));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = read_csv("type,country,release_year\nMovie,India\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::Csv(_)));
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 4);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_file(Path::new("/nonexistent/netflix_titles.csv")).unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
        assert!(err.to_string().contains("netflix_titles.csv"));
    }

    #[test]
    fn rejects_other_extensions() {
        let err = load_file(Path::new("catalog.parquet")).unwrap_err();
        assert!(matches!(err, DataError::UnsupportedFormat(ref e) if e == "parquet"));
    }
}
