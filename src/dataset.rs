//! Dataset construction and column access.
//!
//! A dataset is a polars [`DataFrame`]. Callers hand over record-oriented JSON
//! (`{"data": [{"ID": 1, "Name": "a"}, ...]}`) and this module materialises it
//! into typed columns:
//!
//! - column order follows the first appearance of each key across the records
//! - a key missing from a row, or an explicit `null`, becomes a null cell
//! - integers → `Int64`, mixed numbers → `Float64`, booleans → `Boolean`,
//!   anything else → `String` (non-string scalars keep their JSON text)
//! - a column mixing strings with other values also gets a companion
//!   [`kind_column`] holding each cell's JSON type, so `1` and `"1"` stay
//!   distinct when rows are compared
//!
//! ```
//! use serde_json::json;
//! use tabcheck::dataset;
//!
//! let doc = json!({"data": [{"ID": 1, "Email": "a@b.com"}, {"ID": 2}]});
//! let df = dataset::from_json_document(doc.to_string().as_bytes())?;
//! assert_eq!(df.height(), 2);
//! assert_eq!(df.column("Email")?.null_count(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::error::{PipelineError, Result};
use polars::prelude::*;
use serde_json::{Map, Value};
use std::collections::HashSet;

/// One row as supplied by the caller.
pub type Record = Map<String, Value>;

/// Key holding the record list in a data document.
pub const DATA_KEY: &str = "data";

const MISSING_DATA_KEY: &str =
    r#"Invalid input format. JSON file should contain "data" key with a list of records."#;

/// Parse a `{"data": [...]}` document into a dataset.
pub fn from_json_document(bytes: &[u8]) -> Result<DataFrame> {
    let document: Value = serde_json::from_slice(bytes).map_err(|e| {
        PipelineError::InputFormat(format!(
            "Invalid input format. Data file is not valid JSON: {e}"
        ))
    })?;

    let Some(Value::Array(rows)) = document.get(DATA_KEY) else {
        return Err(PipelineError::InputFormat(MISSING_DATA_KEY.to_owned()));
    };

    let records = rows
        .iter()
        .map(|row| match row {
            Value::Object(record) => Ok(record),
            _ => Err(PipelineError::InputFormat(MISSING_DATA_KEY.to_owned())),
        })
        .collect::<Result<Vec<_>>>()?;

    from_records(records)
}

/// Build a dataset from row mappings.
pub fn from_records<'a>(records: impl IntoIterator<Item = &'a Record>) -> Result<DataFrame> {
    let records: Vec<&Record> = records.into_iter().collect();

    let mut seen = HashSet::new();
    let mut names: Vec<&str> = Vec::new();
    for record in &records {
        for key in record.keys() {
            if seen.insert(key.as_str()) {
                names.push(key.as_str());
            }
        }
    }

    let mut columns = Vec::with_capacity(names.len());
    for name in names {
        let cells: Vec<Option<&Value>> = records
            .iter()
            .map(|record| record.get(name).filter(|v| !v.is_null()))
            .collect();
        columns.push(build_column(name, &cells));
        if mixes_strings_and_scalars(&cells) {
            columns.push(kind_tags(name, &cells));
        }
    }

    Ok(DataFrame::new(columns)?)
}

const KIND_SUFFIX: &str = "__tabcheck_kind";

/// Name of the companion column recording cell types for `column`.
///
/// Only present when `column` mixes strings with other JSON values.
pub fn kind_column(column: &str) -> String {
    format!("{column}{KIND_SUFFIX}")
}

fn mixes_strings_and_scalars(cells: &[Option<&Value>]) -> bool {
    let mut present = cells.iter().flatten();
    let strings = present.clone().any(|v| v.is_string());
    strings && present.any(|v| !v.is_string())
}

fn kind_tags(name: &str, cells: &[Option<&Value>]) -> Column {
    let tags: Vec<Option<&str>> = cells
        .iter()
        .map(|cell| {
            cell.map(|value| match value {
                Value::String(_) => "string",
                Value::Number(_) => "number",
                Value::Bool(_) => "boolean",
                Value::Array(_) => "array",
                Value::Object(_) => "object",
                Value::Null => "null",
            })
        })
        .collect();
    Column::from(Series::new(kind_column(name).into(), tags))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellKind {
    Int,
    Float,
    Bool,
    Text,
}

impl CellKind {
    fn of(value: &Value) -> Self {
        match value {
            Value::Number(n) if n.is_i64() => Self::Int,
            Value::Number(_) => Self::Float,
            Value::Bool(_) => Self::Bool,
            _ => Self::Text,
        }
    }

    fn widen(self, other: Self) -> Self {
        match (self, other) {
            (a, b) if a == b => a,
            (Self::Int, Self::Float) | (Self::Float, Self::Int) => Self::Float,
            _ => Self::Text,
        }
    }
}

fn column_kind(cells: &[Option<&Value>]) -> CellKind {
    cells
        .iter()
        .flatten()
        .map(|v| CellKind::of(v))
        .reduce(CellKind::widen)
        .unwrap_or(CellKind::Text)
}

fn build_column(name: &str, cells: &[Option<&Value>]) -> Column {
    let series = match column_kind(cells) {
        CellKind::Int => {
            let values: Vec<Option<i64>> = cells.iter().map(|c| c.and_then(Value::as_i64)).collect();
            Series::new(name.into(), values)
        }
        CellKind::Float => {
            let values: Vec<Option<f64>> = cells.iter().map(|c| c.and_then(Value::as_f64)).collect();
            Series::new(name.into(), values)
        }
        CellKind::Bool => {
            let values: Vec<Option<bool>> =
                cells.iter().map(|c| c.and_then(Value::as_bool)).collect();
            Series::new(name.into(), values)
        }
        CellKind::Text => {
            let values: Vec<Option<String>> = cells.iter().map(|c| c.map(render_text)).collect();
            Series::new(name.into(), values)
        }
    };
    Column::from(series)
}

fn render_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Look up a column a check cannot run without.
pub fn require_column<'a>(df: &'a DataFrame, check: &str, column: &str) -> Result<&'a Column> {
    df.column(column)
        .map_err(|_| PipelineError::MissingColumn {
            check: check.to_owned(),
            column: column.to_owned(),
        })
}

/// Cell values of a column as text; nulls stay `None`.
pub fn text_cells(column: &Column) -> Result<Vec<Option<String>>> {
    let as_text = column.cast(&DataType::String)?;
    Ok(as_text
        .as_materialized_series()
        .str()?
        .into_iter()
        .map(|cell| cell.map(ToOwned::to_owned))
        .collect())
}

/// Build a dataset from a JSON array of rows; panics on malformed input.
#[cfg(test)]
pub(crate) fn frame(rows: Value) -> DataFrame {
    let records: Vec<Record> = serde_json::from_value(rows).expect("rows must be objects");
    from_records(&records).expect("valid dataset")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(value: Value) -> Vec<Record> {
        serde_json::from_value(value).expect("records")
    }

    #[test]
    fn test_column_order_follows_first_appearance() -> Result<()> {
        let rows = records(json!([{"b": 1}, {"a": "x", "b": 2}, {"c": true}]));
        let df = from_records(&rows)?;

        let names: Vec<&str> = df.get_column_names().iter().map(|n| n.as_str()).collect();
        assert_eq!(names, ["b", "a", "c"]);
        assert_eq!(df.height(), 3);
        Ok(())
    }

    #[test]
    fn test_absent_keys_and_nulls_become_missing() -> Result<()> {
        let rows = records(json!([{"Age": 10}, {"Age": null}, {"Name": "z"}]));
        let df = from_records(&rows)?;

        assert_eq!(df.column("Age")?.null_count(), 2);
        assert_eq!(df.column("Name")?.null_count(), 2);
        Ok(())
    }

    #[test]
    fn test_column_types_are_inferred() -> Result<()> {
        let rows = records(json!([
            {"i": 1, "f": 1, "b": true, "s": "x", "mixed": 1},
            {"i": 2, "f": 2.5, "b": false, "s": "y", "mixed": "one"}
        ]));
        let df = from_records(&rows)?;

        assert_eq!(df.column("i")?.dtype(), &DataType::Int64);
        assert_eq!(df.column("f")?.dtype(), &DataType::Float64);
        assert_eq!(df.column("b")?.dtype(), &DataType::Boolean);
        assert_eq!(df.column("s")?.dtype(), &DataType::String);
        assert_eq!(df.column("mixed")?.dtype(), &DataType::String);

        let mixed = text_cells(df.column("mixed")?)?;
        assert_eq!(mixed, [Some("1".to_owned()), Some("one".to_owned())]);
        Ok(())
    }

    #[test]
    fn test_mixed_column_records_cell_kinds() -> Result<()> {
        let rows = records(json!([{"ID": 1}, {"ID": "1"}, {"ID": null}, {"n": 1, "ID": true}]));
        let df = from_records(&rows)?;

        let names: Vec<&str> = df.get_column_names().iter().map(|n| n.as_str()).collect();
        assert_eq!(names, ["ID", "ID__tabcheck_kind", "n"]);

        let kinds = text_cells(df.column(&kind_column("ID"))?)?;
        assert_eq!(
            kinds,
            [
                Some("number".to_owned()),
                Some("string".to_owned()),
                None,
                Some("boolean".to_owned())
            ]
        );
        Ok(())
    }

    #[test]
    fn test_uniform_columns_have_no_kind_column() -> Result<()> {
        let rows = records(json!([{"i": 1, "s": "a", "x": 1}, {"i": 2, "s": "b", "x": true}]));
        let df = from_records(&rows)?;

        assert_eq!(df.width(), 3);
        Ok(())
    }

    #[test]
    fn test_empty_string_is_not_null() -> Result<()> {
        let rows = records(json!([{"Email": ""}, {"Email": null}]));
        let df = from_records(&rows)?;

        assert_eq!(df.column("Email")?.null_count(), 1);
        Ok(())
    }

    #[test]
    fn test_document_without_data_key_is_rejected() {
        let err = from_json_document(br#"{"rows": []}"#).unwrap_err();
        assert_eq!(err.status(), 400);
        assert!(err.to_string().contains(r#""data" key"#));
    }

    #[test]
    fn test_document_with_non_object_rows_is_rejected() {
        let err = from_json_document(br#"{"data": [1, 2]}"#).unwrap_err();
        assert!(matches!(err, PipelineError::InputFormat(_)));
    }

    #[test]
    fn test_invalid_json_is_an_input_error() {
        let err = from_json_document(b"{not json").unwrap_err();
        assert!(matches!(err, PipelineError::InputFormat(_)));
    }

    #[test]
    fn test_require_column_reports_check_and_column() -> Result<()> {
        let df = from_json_document(br#"{"data": [{"ID": 1}]}"#)?;
        let err = require_column(&df, "email_validity", "Email").unwrap_err();

        match err {
            PipelineError::MissingColumn { check, column } => {
                assert_eq!(check, "email_validity");
                assert_eq!(column, "Email");
            }
            other => panic!("unexpected error: {other}"),
        }
        Ok(())
    }
}
