//! CSV ingestion, used for spreadsheet exports of the network dataset.

use std::path::Path;

use crate::error::{LoadError, LoadResult};
use crate::types::{DataSet, DataType, Schema, Value};

/// Ingest a CSV file into an in-memory [`DataSet`].
///
/// Rules:
///
/// - CSV must have headers.
/// - Headers must contain every required schema field (order can differ, extra columns are
///   ignored). Optional fields without a header are left out of the returned schema.
/// - Each value is parsed according to the schema field type.
pub fn ingest_csv_from_path(path: impl AsRef<Path>, schema: &Schema) -> LoadResult<DataSet> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_path(path)?;
    ingest_csv_from_reader(&mut rdr, schema)
}

/// Ingest CSV data from an existing CSV reader.
pub fn ingest_csv_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
    schema: &Schema,
) -> LoadResult<DataSet> {
    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_owned).collect();
    let projection = schema.project(&headers).map_err(|name| LoadError::SchemaMismatch {
        message: format!("missing required column '{name}'. headers={headers:?}"),
    })?;

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for (row_idx0, result) in rdr.records().enumerate() {
        // 1-based, and the header occupies row 1.
        let user_row = row_idx0 + 2;
        let record = result?;

        let mut row: Vec<Value> = Vec::with_capacity(projection.positions.len());
        for (field, &pos) in projection.schema.fields.iter().zip(&projection.positions) {
            let raw = record.get(pos).unwrap_or("");
            row.push(parse_text_cell(user_row, &field.name, field.data_type, raw)?);
        }
        rows.push(row);
    }

    Ok(DataSet::new(projection.schema, rows))
}

/// Parse one textual cell into a typed [`Value`]. Blank cells are [`Value::Null`].
pub(crate) fn parse_text_cell(
    row: usize,
    column: &str,
    data_type: DataType,
    raw: &str,
) -> LoadResult<Value> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Value::Null);
    }

    let parse_err = |message: String| LoadError::ParseError {
        row,
        column: column.to_owned(),
        raw: raw.to_owned(),
        message,
    };

    match data_type {
        DataType::Utf8 => Ok(Value::Utf8(trimmed.to_owned())),
        DataType::Int64 => match trimmed.parse::<i64>() {
            Ok(v) => Ok(Value::Int64(v)),
            // Spreadsheet exports often write integer columns as `2023.0`.
            Err(e) => match trimmed.parse::<f64>() {
                Ok(f) if f.fract() == 0.0 => Ok(Value::Int64(f as i64)),
                _ => Err(parse_err(e.to_string())),
            },
        },
        DataType::Float64 => trimmed
            .parse::<f64>()
            .map(Value::Float64)
            .map_err(|e| parse_err(e.to_string())),
    }
}
