//! In-memory data transformations.
//!
//! The processing layer operates on [`crate::types::DataSet`] values produced by ingestion and
//! never mutates its input.
//!
//! - [`filter()`]: row filtering by predicate
//! - [`apply()`]: multi-select filtering with a [`FilterSelection`]
//! - [`reduce()`]: whole-column reductions (count/sum/mean/min/max)
//! - [`aggregate()`]: grouped reductions by year/month and a dimension
//!
//! ## Example: select → aggregate
//!
//! ```rust
//! use nrw_dashboard::processing::{aggregate, apply, FilterSelection, GroupKeys, ReduceOp};
//! use nrw_dashboard::types::{DataSet, DataType, Field, Schema, Value};
//!
//! let schema = Schema::new(vec![
//!     Field::new("Year", DataType::Int64),
//!     Field::new("Area_Code", DataType::Utf8),
//!     Field::new("Hourly_Water_Consumption", DataType::Float64),
//! ]);
//! let ds = DataSet::new(
//!     schema,
//!     vec![
//!         vec![Value::Int64(2022), Value::from("A1"), Value::Float64(10.0)],
//!         vec![Value::Int64(2023), Value::from("A1"), Value::Float64(20.0)],
//!         vec![Value::Int64(2023), Value::from("A2"), Value::Float64(5.0)],
//!     ],
//! );
//!
//! let only_a1 = apply(&ds, &FilterSelection::new().with("Area_Code", ["A1"]));
//! let yearly = aggregate(
//!     &only_a1,
//!     &GroupKeys::yearly(),
//!     &["Hourly_Water_Consumption"],
//!     ReduceOp::Sum,
//! )
//! .unwrap();
//! assert_eq!(
//!     yearly.metric_values("Hourly_Water_Consumption").unwrap(),
//!     vec![Some(10.0), Some(20.0)]
//! );
//! ```

pub mod filter;
pub mod group;
pub mod reduce;

pub use filter::{FilterSelection, apply, filter, unique_values};
pub use group::{AggregatedSeries, GroupKeys, Granularity, SeriesPoint, aggregate, month_start};
pub use reduce::{ReduceOp, reduce};
