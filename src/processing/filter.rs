//! Row filtering for [`crate::types::DataSet`].
//!
//! Besides the generic predicate [`filter`], this module implements the dashboard's multi-select
//! semantics: a [`FilterSelection`] maps columns to allowed values and [`apply`] keeps the rows
//! that match every non-empty selection.

use std::collections::BTreeMap;

use crate::types::{DataSet, Value};

/// Returns a new [`DataSet`] containing only rows for which `predicate` returns `true`.
///
/// This is a convenience wrapper around [`DataSet::filter_rows`].
pub fn filter<F>(dataset: &DataSet, predicate: F) -> DataSet
where
    F: FnMut(&[Value]) -> bool,
{
    dataset.filter_rows(predicate)
}

/// Allowed values per column.
///
/// A column that is absent, or present with an empty value set, imposes no constraint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSelection {
    columns: BTreeMap<String, Vec<Value>>,
}

impl FilterSelection {
    /// An empty selection (matches every row).
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Self::set`].
    pub fn with<I, V>(mut self, column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.set(column, values);
        self
    }

    /// Replace the allowed values for `column`. Duplicates are dropped.
    pub fn set<I, V>(&mut self, column: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let mut allowed: Vec<Value> = Vec::new();
        for v in values {
            let v = v.into();
            if !allowed.contains(&v) {
                allowed.push(v);
            }
        }
        self.columns.insert(column.into(), allowed);
    }

    /// Remove any constraint on `column`.
    pub fn clear(&mut self, column: &str) {
        self.columns.remove(column);
    }

    /// Allowed values for `column` (empty if unconstrained).
    pub fn values(&self, column: &str) -> &[Value] {
        self.columns.get(column).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns `true` if no column is constrained.
    pub fn is_empty(&self) -> bool {
        self.columns.values().all(Vec::is_empty)
    }

    /// Columns with a non-empty value set.
    pub fn active_columns(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(column, _)| column.as_str())
    }
}

/// Keep the rows whose value in each constrained column is one of the selected values.
///
/// Row order is preserved and the input is left untouched. A constrained column that the dataset
/// does not have matches no rows. An empty result is a valid outcome.
pub fn apply(dataset: &DataSet, selection: &FilterSelection) -> DataSet {
    let constraints: Vec<(Option<usize>, &[Value])> = selection
        .active_columns()
        .map(|column| (dataset.schema.index_of(column), selection.values(column)))
        .collect();

    if constraints.is_empty() {
        return dataset.clone();
    }

    dataset.filter_rows(|row| {
        constraints.iter().all(|(idx, allowed)| match idx {
            Some(idx) => row.get(*idx).is_some_and(|v| allowed.contains(v)),
            None => false,
        })
    })
}

/// Distinct non-null values of `column` in first-seen order.
///
/// Returns an empty list if the column does not exist. These are the options offered by the
/// multi-select filters.
pub fn unique_values(dataset: &DataSet, column: &str) -> Vec<Value> {
    let mut out: Vec<Value> = Vec::new();
    if let Some(values) = dataset.column(column) {
        for v in values {
            if !v.is_null() && !out.contains(v) {
                out.push(v.clone());
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{FilterSelection, apply, filter, unique_values};
    use crate::types::{DataSet, DataType, Field, Schema, Value};

    fn sample_dataset() -> DataSet {
        let schema = Schema::new(vec![
            Field::new("User_ID", DataType::Utf8),
            Field::new("Area_Code", DataType::Utf8),
            Field::new("Weather_Condition", DataType::Utf8),
            Field::new("Hourly_Water_Consumption", DataType::Float64),
        ]);

        let row = |u: &str, a: &str, w: &str, c: f64| {
            vec![Value::from(u), Value::from(a), Value::from(w), Value::Float64(c)]
        };
        let rows = vec![
            row("U1", "A1", "Sunny", 10.0),
            row("U2", "A1", "Rainy", 20.0),
            row("U3", "A2", "Sunny", 30.0),
            row("U4", "A3", "Cloudy", 40.0),
            vec![Value::from("U5"), Value::Null, Value::from("Sunny"), Value::Float64(50.0)],
        ];

        DataSet::new(schema, rows)
    }

    fn consumption(ds: &DataSet) -> Vec<f64> {
        ds.column("Hourly_Water_Consumption")
            .unwrap()
            .filter_map(Value::as_f64)
            .collect()
    }

    #[test]
    fn filter_rows_by_predicate() {
        let ds = sample_dataset();
        let idx = ds.schema.index_of("Hourly_Water_Consumption").unwrap();
        let out = filter(&ds, |row| matches!(row.get(idx), Some(Value::Float64(v)) if *v > 25.0));
        assert_eq!(consumption(&out), vec![30.0, 40.0, 50.0]);
        assert_eq!(ds.row_count(), 5);
    }

    #[test]
    fn empty_selection_returns_dataset_unchanged() {
        let ds = sample_dataset();
        let sel = FilterSelection::new()
            .with("User_ID", Vec::<Value>::new())
            .with("Area_Code", Vec::<&str>::new());
        assert!(sel.is_empty());
        assert_eq!(apply(&ds, &sel), ds);
        assert_eq!(apply(&ds, &FilterSelection::new()), ds);
    }

    #[test]
    fn values_within_a_column_are_ored() {
        let ds = sample_dataset();
        let sel = FilterSelection::new().with("Area_Code", ["A1", "A3"]);
        assert_eq!(consumption(&apply(&ds, &sel)), vec![10.0, 20.0, 40.0]);
    }

    #[test]
    fn columns_are_anded() {
        let ds = sample_dataset();
        let sel = FilterSelection::new()
            .with("Area_Code", ["A1", "A2"])
            .with("Weather_Condition", ["Sunny"]);
        assert_eq!(consumption(&apply(&ds, &sel)), vec![10.0, 30.0]);
    }

    #[test]
    fn null_cells_never_match_a_selection() {
        let ds = sample_dataset();
        let sel = FilterSelection::new().with("Area_Code", ["A1", "A2", "A3"]);
        assert_eq!(apply(&ds, &sel).row_count(), 4);
    }

    #[test]
    fn unknown_column_matches_nothing() {
        let ds = sample_dataset();
        let sel = FilterSelection::new().with("Device_ID", ["D1"]);
        let out = apply(&ds, &sel);
        assert!(out.is_empty());
        assert_eq!(out.schema, ds.schema);
    }

    #[test]
    fn apply_is_idempotent_subset_and_order_independent() {
        let ds = sample_dataset();
        let selections = [
            FilterSelection::new(),
            FilterSelection::new().with("User_ID", ["U2", "U4", "U9"]),
            FilterSelection::new()
                .with("Weather_Condition", ["Sunny", "Cloudy"])
                .with("Area_Code", ["A2", "A3"]),
            FilterSelection::new().with("Area_Code", ["nowhere"]),
        ];

        for sel in &selections {
            let once = apply(&ds, sel);
            assert!(once.row_count() <= ds.row_count());
            assert!(once.rows.iter().all(|r| ds.rows.contains(r)));
            assert_eq!(apply(&once, sel), once);
        }

        let a_then_w = apply(
            &apply(&ds, &FilterSelection::new().with("Area_Code", ["A1", "A2"])),
            &FilterSelection::new().with("Weather_Condition", ["Sunny"]),
        );
        let w_then_a = apply(
            &apply(&ds, &FilterSelection::new().with("Weather_Condition", ["Sunny"])),
            &FilterSelection::new().with("Area_Code", ["A1", "A2"]),
        );
        assert_eq!(a_then_w, w_then_a);
    }

    #[test]
    fn set_dedups_and_clear_removes() {
        let mut sel = FilterSelection::new();
        sel.set("Area_Code", ["A1", "A1", "A2"]);
        assert_eq!(sel.values("Area_Code"), &[Value::from("A1"), Value::from("A2")]);
        assert_eq!(sel.active_columns().collect::<Vec<_>>(), vec!["Area_Code"]);
        sel.clear("Area_Code");
        assert!(sel.is_empty());
        assert!(sel.values("Area_Code").is_empty());
    }

    #[test]
    fn unique_values_keep_first_seen_order_and_skip_nulls() {
        let ds = sample_dataset();
        assert_eq!(
            unique_values(&ds, "Area_Code"),
            vec![Value::from("A1"), Value::from("A2"), Value::from("A3")]
        );
        assert_eq!(
            unique_values(&ds, "Weather_Condition"),
            vec![Value::from("Sunny"), Value::from("Rainy"), Value::from("Cloudy")]
        );
        assert!(unique_values(&ds, "missing").is_empty());
    }
}
