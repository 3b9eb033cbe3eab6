//! Core data model types.
//!
//! Sources are loaded into an in-memory [`DataSet`] according to a [`Schema`] (a list of typed
//! [`Field`]s). Fields are either required or optional; optional fields that the source does not
//! provide are left out of the loaded dataset's schema.

use std::fmt;

use serde::Serialize;

/// Logical data type for a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point number.
    Float64,
    /// UTF-8 string.
    Utf8,
}

/// A single named, typed field in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field/column name.
    pub name: String,
    /// Field data type.
    pub data_type: DataType,
    /// Whether loading fails when the source lacks this column.
    pub required: bool,
}

impl Field {
    /// Create a new required field.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            required: true,
        }
    }

    /// Create a field that may be absent from the source.
    pub fn optional(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            required: false,
            ..Self::new(name, data_type)
        }
    }
}

/// A list of fields describing the expected shape of incoming data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Ordered list of fields.
    pub fields: Vec<Field>,
}

impl Schema {
    /// Create a new schema from fields.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Returns the index of a field by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Returns `true` if the schema has a field called `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Match this schema against a source header row.
    ///
    /// Returns the schema that will actually be loaded (optional fields missing from `headers`
    /// are dropped), the header position of each loaded field, and the names of the dropped
    /// optional fields. A missing required field yields `Err` with the field name.
    pub(crate) fn project<S: AsRef<str>>(&self, headers: &[S]) -> Result<Projection, String> {
        let mut fields = Vec::with_capacity(self.fields.len());
        let mut positions = Vec::with_capacity(self.fields.len());
        let mut missing_optional = Vec::new();

        for field in &self.fields {
            match headers.iter().position(|h| h.as_ref().trim() == field.name) {
                Some(pos) => {
                    fields.push(field.clone());
                    positions.push(pos);
                }
                None if field.required => return Err(field.name.clone()),
                None => missing_optional.push(field.name.clone()),
            }
        }

        Ok(Projection {
            schema: Schema::new(fields),
            positions,
            missing_optional,
        })
    }
}

/// The outcome of matching a [`Schema`] against a header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Projection {
    pub schema: Schema,
    pub positions: Vec<usize>,
    pub missing_optional: Vec<String>,
}

/// A single typed value in a [`DataSet`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing/empty value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// UTF-8 string.
    Utf8(String),
}

impl Value {
    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Integer view of the value. Whole floats are accepted.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int64(v) => Some(*v),
            Value::Float64(v) if v.fract() == 0.0 => Some(*v as i64),
            _ => None,
        }
    }

    /// Numeric view of the value.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int64(v) => Some(*v as f64),
            Value::Float64(v) => Some(*v),
            _ => None,
        }
    }

    /// String view of a [`Value::Utf8`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Utf8(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Int64(v) => write!(f, "{v}"),
            Value::Float64(v) => write!(f, "{v}"),
            Value::Utf8(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Utf8(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Utf8(s)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

/// In-memory tabular dataset.
///
/// Rows are stored as `Vec<Vec<Value>>` in the same order as the [`Schema`] fields.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSet {
    /// Schema describing row shape.
    pub schema: Schema,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
}

impl DataSet {
    /// Create a dataset from schema and rows.
    pub fn new(schema: Schema, rows: Vec<Vec<Value>>) -> Self {
        Self { schema, rows }
    }

    /// Number of rows in the dataset.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate the values of one column, or `None` if the column does not exist.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Value>> {
        let idx = self.schema.index_of(name)?;
        Some(self.rows.iter().map(move |row| row.get(idx).unwrap_or(&Value::Null)))
    }

    /// Create a new dataset containing only rows that match `predicate`.
    ///
    /// The returned dataset preserves the original schema and row order.
    pub fn filter_rows<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&[Value]) -> bool,
    {
        let rows = self
            .rows
            .iter()
            .filter(|row| predicate(row.as_slice()))
            .cloned()
            .collect();
        Self {
            schema: self.schema.clone(),
            rows,
        }
    }

    /// Reduce (fold) all rows into an accumulator value.
    ///
    /// This is similar to `Iterator::fold`, but provides each row as `&[Value]`.
    pub fn reduce_rows<A, F>(&self, init: A, mut reducer: F) -> A
    where
        F: FnMut(A, &[Value]) -> A,
    {
        self.rows
            .iter()
            .fold(init, |acc, row| reducer(acc, row.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::{DataSet, DataType, Field, Schema, Value};

    fn schema() -> Schema {
        Schema::new(vec![
            Field::new("Year", DataType::Int64),
            Field::new("Area_Code", DataType::Utf8),
            Field::optional("User_Pressure", DataType::Float64),
        ])
    }

    #[test]
    fn project_drops_missing_optional_fields() {
        let headers = ["Area_Code", "Extra", "Year"];
        let p = schema().project(&headers).unwrap();

        assert_eq!(p.schema.field_names().collect::<Vec<_>>(), vec!["Year", "Area_Code"]);
        assert_eq!(p.positions, vec![2, 0]);
        assert_eq!(p.missing_optional, vec!["User_Pressure".to_string()]);
    }

    #[test]
    fn project_rejects_missing_required_field() {
        let headers = ["Area_Code", "User_Pressure"];
        assert_eq!(schema().project(&headers).unwrap_err(), "Year");
    }

    #[test]
    fn project_trims_header_whitespace() {
        let headers = [" Year ", "Area_Code\t", "User_Pressure"];
        let p = schema().project(&headers).unwrap();
        assert_eq!(p.positions, vec![0, 1, 2]);
        assert!(p.missing_optional.is_empty());
    }

    #[test]
    fn column_iterates_values_in_row_order() {
        let ds = DataSet::new(
            Schema::new(vec![Field::new("Year", DataType::Int64)]),
            vec![vec![Value::Int64(2022)], vec![Value::Null]],
        );
        let col: Vec<_> = ds.column("Year").unwrap().cloned().collect();
        assert_eq!(col, vec![Value::Int64(2022), Value::Null]);
        assert!(ds.column("Month").is_none());
    }

    #[test]
    fn value_views() {
        assert_eq!(Value::Float64(3.0).as_i64(), Some(3));
        assert_eq!(Value::Float64(3.5).as_i64(), None);
        assert_eq!(Value::Int64(4).as_f64(), Some(4.0));
        assert_eq!(Value::from("A1").as_str(), Some("A1"));
        assert_eq!(Value::Null.to_string(), "");
        assert!(Value::Null.is_null());
    }
}
