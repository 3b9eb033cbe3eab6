#![cfg(feature = "excel")]

//! Workbook ingestion (`.xlsx`, `.xls`, `.xlsm`, `.xlsb`, `.ods`) via `calamine`.

use std::path::Path;

use calamine::{Data, Range, Reader, open_workbook_auto};

use crate::error::{LoadError, LoadResult};
use crate::types::{DataSet, DataType, Schema, Value};

use super::csv::parse_text_cell;

/// Ingest one sheet of a workbook into an in-memory `DataSet`.
///
/// Behavior:
/// - Picks `sheet_name` if provided; otherwise uses the first sheet in the workbook
/// - Detects the first non-empty row as the header row
/// - Validates that all required schema fields exist as headers
/// - Reads remaining rows and converts cells into typed `Value`s
pub fn ingest_excel_from_path(
    path: impl AsRef<Path>,
    sheet_name: Option<&str>,
    schema: &Schema,
) -> LoadResult<DataSet> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet = match sheet_name {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| LoadError::SchemaMismatch {
                message: "workbook has no sheets".to_string(),
            })?,
    };
    let range = workbook.worksheet_range(&sheet)?;
    ingest_sheet_range(&sheet, &range, schema)
}

/// Ingest several sheets of a workbook and concatenate all rows into one `DataSet`.
///
/// - If `sheet_names` is `None`, ingests **all sheets** in workbook order.
/// - If `sheet_names` is `Some(&[...])`, ingests only those sheets (in the provided order).
///
/// Every sheet must yield the same loaded columns; a sheet that carries an optional column
/// another sheet lacks is a schema mismatch.
pub fn ingest_excel_workbook_from_path(
    path: impl AsRef<Path>,
    sheet_names: Option<&[&str]>,
    schema: &Schema,
) -> LoadResult<DataSet> {
    let mut workbook = open_workbook_auto(path)?;

    let sheets: Vec<String> = match sheet_names {
        Some(names) => names.iter().map(|s| s.to_string()).collect(),
        None => workbook.sheet_names().to_vec(),
    };
    if sheets.is_empty() {
        return Err(LoadError::SchemaMismatch {
            message: "workbook has no sheets".to_string(),
        });
    }

    let mut merged: Option<DataSet> = None;
    for sheet in sheets {
        let range = workbook.worksheet_range(&sheet)?;
        let mut part = ingest_sheet_range(&sheet, &range, schema)?;
        match merged.as_mut() {
            None => merged = Some(part),
            Some(acc) if acc.schema == part.schema => acc.rows.append(&mut part.rows),
            Some(acc) => {
                return Err(LoadError::SchemaMismatch {
                    message: format!(
                        "sheet '{sheet}' has columns {:?}, expected {:?}",
                        part.schema.field_names().collect::<Vec<_>>(),
                        acc.schema.field_names().collect::<Vec<_>>()
                    ),
                });
            }
        }
    }

    Ok(merged.unwrap_or_else(|| DataSet::new(schema.clone(), Vec::new())))
}

fn ingest_sheet_range(sheet: &str, range: &Range<Data>, schema: &Schema) -> LoadResult<DataSet> {
    let header_row_idx = range
        .rows()
        .position(|row| row.iter().any(|c| !matches!(c, Data::Empty)))
        .ok_or_else(|| LoadError::SchemaMismatch {
            message: format!("sheet '{sheet}': sheet has no non-empty rows (no header row found)"),
        })?;

    let headers: Vec<String> = range
        .rows()
        .nth(header_row_idx)
        .map(|row| row.iter().map(cell_to_header_string).collect())
        .unwrap_or_default();

    let projection = schema.project(&headers).map_err(|name| LoadError::SchemaMismatch {
        message: format!("sheet '{sheet}': missing required column '{name}'. headers={headers:?}"),
    })?;

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for (idx0, row) in range.rows().enumerate().skip(header_row_idx + 1) {
        // Skip fully blank trailing rows that some editors leave behind.
        if row.iter().all(|c| matches!(c, Data::Empty)) {
            continue;
        }

        // Report 1-based row number (Excel-like).
        let user_row = idx0 + 1;

        let mut out_row: Vec<Value> = Vec::with_capacity(projection.positions.len());
        for (field, &pos) in projection.schema.fields.iter().zip(&projection.positions) {
            let cell = row.get(pos).unwrap_or(&Data::Empty);
            let col_label = format!("{sheet}:{name}", name = field.name);
            out_row.push(convert_cell(user_row, &col_label, field.data_type, cell)?);
        }
        rows.push(out_row);
    }

    Ok(DataSet::new(projection.schema, rows))
}

fn cell_to_header_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Empty => String::new(),
        other => cell_to_string(other),
    }
}

/// Render a cell as text. Whole floats drop their fractional part so that numeric ids written
/// by spreadsheet tools (`101.0`) match the ids users type (`101`).
fn cell_to_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => (*f as i64).to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

fn convert_cell(row: usize, column: &str, data_type: DataType, c: &Data) -> LoadResult<Value> {
    let parse_err = |message: &str| LoadError::ParseError {
        row,
        column: column.to_string(),
        raw: c.to_string(),
        message: message.to_string(),
    };

    match (data_type, c) {
        (_, Data::Empty) => Ok(Value::Null),
        (_, Data::String(s)) if data_type != DataType::Utf8 => {
            parse_text_cell(row, column, data_type, s)
        }
        (DataType::Utf8, _) => Ok(Value::Utf8(cell_to_string(c))),
        (DataType::Int64, Data::Int(i)) => Ok(Value::Int64(*i)),
        (DataType::Int64, Data::Float(f)) if f.fract() == 0.0 => Ok(Value::Int64(*f as i64)),
        (DataType::Int64, Data::Float(_)) => {
            Err(parse_err("expected integer (got non-integer float)"))
        }
        (DataType::Int64, _) => Err(parse_err("expected integer")),
        (DataType::Float64, Data::Float(f)) => Ok(Value::Float64(*f)),
        (DataType::Float64, Data::Int(i)) => Ok(Value::Float64(*i as f64)),
        (DataType::Float64, _) => Err(parse_err("expected number")),
    }
}
