//! Reduction operations for [`crate::types::DataSet`].

use serde::Serialize;

use crate::types::{DataSet, DataType, Value};

/// Built-in reduction operations over a single column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReduceOp {
    /// Count rows. Over a whole dataset nulls are included; per group only non-null values count.
    Count,
    /// Sum numeric values, ignoring nulls.
    Sum,
    /// Arithmetic mean of numeric values, ignoring nulls.
    Mean,
    /// Minimum numeric value, ignoring nulls.
    Min,
    /// Maximum numeric value, ignoring nulls.
    Max,
}

/// Reduce a column using a built-in [`ReduceOp`].
///
/// - Returns `None` if `column` does not exist in the schema.
/// - `Sum`/`Min`/`Max` keep the column type (`Int64` or `Float64`); `Mean` is always `Float64`.
/// - Returns `Some(Value::Null)` if there are no non-null numeric values.
/// - For `Count`, always returns `Some(Value::Int64(row_count))`.
pub fn reduce(dataset: &DataSet, column: &str, op: ReduceOp) -> Option<Value> {
    let idx = dataset.schema.index_of(column)?;
    let data_type = dataset.schema.fields.get(idx)?.data_type;

    if op == ReduceOp::Count {
        return Some(Value::Int64(dataset.row_count() as i64));
    }

    match data_type {
        DataType::Int64 if op != ReduceOp::Mean => {
            let acc = dataset.reduce_rows(None::<i64>, |acc, row| match row.get(idx) {
                Some(Value::Int64(v)) => Some(match (op, acc) {
                    (_, None) => *v,
                    (ReduceOp::Sum, Some(a)) => a + v,
                    (ReduceOp::Min, Some(a)) => a.min(*v),
                    (_, Some(a)) => a.max(*v),
                }),
                _ => acc,
            });
            Some(acc.map(Value::Int64).unwrap_or(Value::Null))
        }
        DataType::Int64 | DataType::Float64 => {
            let acc = dataset.reduce_rows(Accumulator::default(), |mut acc, row| {
                if let Some(v) = row.get(idx).and_then(Value::as_f64) {
                    acc.push(v);
                }
                acc
            });
            let out = if acc.is_empty() { None } else { acc.finish(op) };
            Some(out.map(Value::Float64).unwrap_or(Value::Null))
        }
        _ => Some(Value::Null),
    }
}

/// Running state for the numeric reductions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Accumulator {
    count: usize,
    sum: f64,
    min: Option<f64>,
    max: Option<f64>,
}

impl Accumulator {
    pub(crate) fn push(&mut self, v: f64) {
        self.count += 1;
        self.sum += v;
        self.min = Some(self.min.map_or(v, |m| m.min(v)));
        self.max = Some(self.max.map_or(v, |m| m.max(v)));
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Result of `op` over the pushed values.
    ///
    /// With nothing pushed, `Sum` is `0.0` and `Count` is `0.0`; `Mean`/`Min`/`Max` are `None`.
    pub(crate) fn finish(&self, op: ReduceOp) -> Option<f64> {
        match op {
            ReduceOp::Count => Some(self.count as f64),
            ReduceOp::Sum => Some(self.sum),
            ReduceOp::Mean if self.count > 0 => Some(self.sum / self.count as f64),
            ReduceOp::Mean => None,
            ReduceOp::Min => self.min,
            ReduceOp::Max => self.max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Accumulator, ReduceOp, reduce};
    use crate::types::{DataSet, DataType, Field, Schema, Value};

    fn numeric_dataset_with_nulls() -> DataSet {
        let schema = Schema::new(vec![
            Field::new("Month", DataType::Int64),
            Field::new("Area_Tank_Level", DataType::Float64),
        ]);

        let rows = vec![
            vec![Value::Int64(1), Value::Float64(10.0)],
            vec![Value::Int64(2), Value::Null],
            vec![Value::Int64(3), Value::Float64(5.5)],
        ];

        DataSet::new(schema, rows)
    }

    #[test]
    fn reduce_count_counts_rows() {
        let ds = numeric_dataset_with_nulls();
        assert_eq!(reduce(&ds, "Area_Tank_Level", ReduceOp::Count), Some(Value::Int64(3)));
        assert_eq!(reduce(&ds, "Month", ReduceOp::Count), Some(Value::Int64(3)));
    }

    #[test]
    fn reduce_sum_ignores_nulls_and_preserves_type() {
        let ds = numeric_dataset_with_nulls();
        assert_eq!(
            reduce(&ds, "Area_Tank_Level", ReduceOp::Sum),
            Some(Value::Float64(15.5))
        );
        assert_eq!(reduce(&ds, "Month", ReduceOp::Sum), Some(Value::Int64(6)));
    }

    #[test]
    fn reduce_mean_ignores_nulls() {
        let ds = numeric_dataset_with_nulls();
        assert_eq!(
            reduce(&ds, "Area_Tank_Level", ReduceOp::Mean),
            Some(Value::Float64(7.75))
        );
        assert_eq!(reduce(&ds, "Month", ReduceOp::Mean), Some(Value::Float64(2.0)));
    }

    #[test]
    fn reduce_min_max_ignore_nulls() {
        let ds = numeric_dataset_with_nulls();
        assert_eq!(
            reduce(&ds, "Area_Tank_Level", ReduceOp::Min),
            Some(Value::Float64(5.5))
        );
        assert_eq!(
            reduce(&ds, "Area_Tank_Level", ReduceOp::Max),
            Some(Value::Float64(10.0))
        );
        assert_eq!(reduce(&ds, "Month", ReduceOp::Min), Some(Value::Int64(1)));
        assert_eq!(reduce(&ds, "Month", ReduceOp::Max), Some(Value::Int64(3)));
    }

    #[test]
    fn reduce_returns_none_for_missing_column() {
        let ds = numeric_dataset_with_nulls();
        assert_eq!(reduce(&ds, "User_Pressure", ReduceOp::Count), None);
        assert_eq!(reduce(&ds, "User_Pressure", ReduceOp::Sum), None);
    }

    #[test]
    fn reduce_numeric_returns_null_if_all_values_null() {
        let schema = Schema::new(vec![Field::new("Area_Pressure", DataType::Float64)]);
        let ds = DataSet::new(schema, vec![vec![Value::Null], vec![Value::Null]]);
        for op in [ReduceOp::Sum, ReduceOp::Mean, ReduceOp::Min, ReduceOp::Max] {
            assert_eq!(reduce(&ds, "Area_Pressure", op), Some(Value::Null));
        }
    }

    #[test]
    fn empty_accumulator_sums_to_zero_but_has_no_mean() {
        let acc = Accumulator::default();
        assert_eq!(acc.finish(ReduceOp::Sum), Some(0.0));
        assert_eq!(acc.finish(ReduceOp::Count), Some(0.0));
        assert_eq!(acc.finish(ReduceOp::Mean), None);
        assert_eq!(acc.finish(ReduceOp::Max), None);
    }
}
