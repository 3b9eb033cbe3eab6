//! Grouped aggregation over calendar periods.
//!
//! [`aggregate`] groups rows by `Year` (and optionally `Month`), plus at most one categorical
//! dimension, and reduces one or more metric columns per group. The output is an
//! [`AggregatedSeries`]: one point per group, sorted by key, ready to plot.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::AggregateError;
use crate::nrw::{MONTH, YEAR};
use crate::types::{DataSet, Value};

use super::reduce::{Accumulator, ReduceOp};

/// Time resolution of a grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    /// Group by `Year`.
    Yearly,
    /// Group by `Year` and `Month`; points carry the first day of the month as date.
    Monthly,
}

/// Group keys: a time resolution plus an optional categorical dimension column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupKeys {
    pub granularity: Granularity,
    pub dimension: Option<String>,
}

impl GroupKeys {
    /// `(Year, Month)`.
    pub fn monthly() -> Self {
        Self {
            granularity: Granularity::Monthly,
            dimension: None,
        }
    }

    /// `(Year)`.
    pub fn yearly() -> Self {
        Self {
            granularity: Granularity::Yearly,
            dimension: None,
        }
    }

    /// Add a categorical dimension column to the keys.
    pub fn by(mut self, column: impl Into<String>) -> Self {
        self.dimension = Some(column.into());
        self
    }
}

/// One group of an [`AggregatedSeries`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub year: i64,
    pub month: Option<u32>,
    /// First day of the month for monthly groups.
    pub date: Option<NaiveDate>,
    /// Value of the dimension column, rendered as text.
    pub dimension: Option<String>,
    /// One reduced value per metric column, in the order the metrics were requested.
    pub values: Vec<Option<f64>>,
    /// Number of input rows in the group.
    pub rows: usize,
}

impl SeriesPoint {
    /// Reduced value of the first metric.
    pub fn value(&self) -> Option<f64> {
        self.values.first().copied().flatten()
    }
}

/// Chart-ready output of a grouped aggregation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedSeries {
    pub dimension: Option<String>,
    pub metrics: Vec<String>,
    /// Points sorted by `(year, month, dimension)`, one per distinct key.
    pub points: Vec<SeriesPoint>,
}

impl AggregatedSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Values of metric `metric` across all points, in point order.
    pub fn metric_values(&self, metric: &str) -> Option<Vec<Option<f64>>> {
        let idx = self.metrics.iter().position(|m| m == metric)?;
        Some(self.points.iter().map(|p| p.values[idx]).collect())
    }

    /// Distinct dimension values in order of first appearance.
    pub fn dimension_values(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for d in self.points.iter().filter_map(|p| p.dimension.as_deref()) {
            if !out.contains(&d) {
                out.push(d);
            }
        }
        out
    }
}

type GroupKey = (i64, Option<i64>, Option<String>);

/// Group `dataset` by `keys` and reduce each of `metrics` with `op`.
///
/// Rows with a null key are left out of every group. Null metric values are ignored; a group
/// whose values for a metric are all null gets `0.0` for `Sum` and `None` for `Mean`.
///
/// # Errors
///
/// - [`AggregateError::EmptyDataset`] if `dataset` has no rows.
/// - [`AggregateError::UnknownColumn`] if a key or metric column is missing from the schema.
/// - [`AggregateError::InvalidDate`] if a monthly group is not a calendar month.
///
/// ```rust
/// use nrw_dashboard::processing::{aggregate, GroupKeys, ReduceOp};
/// use nrw_dashboard::types::{DataSet, DataType, Field, Schema, Value};
///
/// let ds = DataSet::new(
///     Schema::new(vec![
///         Field::new("Year", DataType::Int64),
///         Field::new("Month", DataType::Int64),
///         Field::new("Area_Code", DataType::Utf8),
///         Field::new("Hourly_Water_Consumption", DataType::Float64),
///     ]),
///     vec![
///         vec![Value::Int64(2023), Value::Int64(1), Value::from("A1"), Value::Float64(10.0)],
///         vec![Value::Int64(2023), Value::Int64(1), Value::from("A1"), Value::Float64(20.0)],
///     ],
/// );
///
/// let series = aggregate(
///     &ds,
///     &GroupKeys::monthly().by("Area_Code"),
///     &["Hourly_Water_Consumption"],
///     ReduceOp::Sum,
/// )
/// .unwrap();
/// assert_eq!(series.len(), 1);
/// assert_eq!(series.points[0].date.unwrap().to_string(), "2023-01-01");
/// assert_eq!(series.points[0].value(), Some(30.0));
/// ```
pub fn aggregate(
    dataset: &DataSet,
    keys: &GroupKeys,
    metrics: &[&str],
    op: ReduceOp,
) -> Result<AggregatedSeries, AggregateError> {
    if dataset.is_empty() {
        return Err(AggregateError::EmptyDataset);
    }

    let index_of = |name: &str| {
        dataset
            .schema
            .index_of(name)
            .ok_or_else(|| AggregateError::UnknownColumn(name.to_string()))
    };
    let year_idx = index_of(YEAR)?;
    let month_idx = match keys.granularity {
        Granularity::Monthly => Some(index_of(MONTH)?),
        Granularity::Yearly => None,
    };
    let dim_idx = keys.dimension.as_deref().map(index_of).transpose()?;
    let metric_idxs = metrics
        .iter()
        .map(|m| index_of(m))
        .collect::<Result<Vec<_>, _>>()?;

    let mut groups: BTreeMap<GroupKey, (usize, Vec<Accumulator>)> = BTreeMap::new();
    for row in &dataset.rows {
        let Some(key) = group_key(row, year_idx, month_idx, dim_idx) else {
            continue;
        };
        let (count, accs) = groups
            .entry(key)
            .or_insert_with(|| (0, vec![Accumulator::default(); metric_idxs.len()]));
        *count += 1;
        for (acc, &idx) in accs.iter_mut().zip(&metric_idxs) {
            if let Some(v) = row.get(idx).and_then(Value::as_f64) {
                acc.push(v);
            }
        }
    }

    let points = groups
        .into_iter()
        .map(|((year, month, dimension), (rows, accs))| -> Result<SeriesPoint, AggregateError> {
            let date = match month {
                Some(m) => Some(month_start(year, m)?),
                None => None,
            };
            Ok(SeriesPoint {
                year,
                month: month.map(|m| m as u32),
                date,
                dimension,
                values: accs.iter().map(|acc| acc.finish(op)).collect(),
                rows,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(AggregatedSeries {
        dimension: keys.dimension.clone(),
        metrics: metrics.iter().map(|m| m.to_string()).collect(),
        points,
    })
}

fn group_key(
    row: &[Value],
    year_idx: usize,
    month_idx: Option<usize>,
    dim_idx: Option<usize>,
) -> Option<GroupKey> {
    let year = row.get(year_idx)?.as_i64()?;
    let month = match month_idx {
        Some(idx) => Some(row.get(idx)?.as_i64()?),
        None => None,
    };
    let dimension = match dim_idx {
        Some(idx) => match row.get(idx)? {
            Value::Null => return None,
            v => Some(v.to_string()),
        },
        None => None,
    };
    Some((year, month, dimension))
}

/// First day of `month` in `year`.
pub fn month_start(year: i64, month: i64) -> Result<NaiveDate, AggregateError> {
    let invalid = || AggregateError::InvalidDate { year, month };
    let y = i32::try_from(year).map_err(|_| invalid())?;
    let m = u32::try_from(month).map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(y, m, 1).ok_or_else(invalid)
}
