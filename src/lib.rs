//! `nrw-dashboard` is the data core of a water-distribution dashboard. It loads a spreadsheet of
//! network readings (consumption, tank levels, pressure, weather), filters it with the sidebar
//! multi-selects, turns it into chart-ready series and describes the fixed network topology.
//! Drawing is left to a [`render::ChartRenderer`].
//!
//! ## Pipeline
//!
//! ```text
//!  NRW_dataset6.xlsx ──► loader::DatasetSource (read once, cached)
//!                              │  Arc<DataSet>
//!                              ▼
//!  FilterSelection ───► processing::apply ──► charts::* (group by year/month[/dimension])
//!                                                 │
//!  topology::TopologyGraph (fixed) ───────────────┤
//!                                                 ▼
//!                                      render::ChartRenderer
//! ```
//!
//! ## Dataset columns
//!
//! Required: `User_ID`, `Area_Code`, `Device_ID`, `Weather_Condition`, `Year`, `Month`,
//! `Hourly_Water_Consumption`, `Area_Tank_Level`, `Main_Tank_Level`.
//! Optional: `Main_Tank_Pressure`, `Area_Pressure`, `User_Pressure`; the pressure chart is
//! replaced by a warning when any of them is missing.
//!
//! ## Example
//!
//! ```no_run
//! use nrw_dashboard::config::DashboardConfig;
//! use nrw_dashboard::dashboard::Dashboard;
//! use nrw_dashboard::loader::DatasetSource;
//! use nrw_dashboard::processing::FilterSelection;
//! use nrw_dashboard::render::SnapshotRenderer;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let source = DatasetSource::new(DashboardConfig::default());
//! let dashboard = Dashboard::from_source(&source)?;
//!
//! let selection = FilterSelection::new().with("Area_Code", ["A1", "A2"]);
//! let mut page = SnapshotRenderer::new();
//! dashboard.render(&selection, &mut page);
//! println!("{}", page.to_json()?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`config`]: where the dataset lives and how loads are logged
//! - [`ingestion`]: CSV and workbook readers plus load observers
//! - [`loader`]: the cached dataset handle
//! - [`types`]: schema + in-memory dataset types
//! - [`nrw`]: column names and schema of the network dataset
//! - [`processing`]: filter, reduce and grouped aggregation
//! - [`charts`]: the dashboard's charts
//! - [`topology`]: the network diagram
//! - [`render`]: the renderer boundary
//! - [`dashboard`]: page assembly
//! - [`error`]: error types

pub mod charts;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod ingestion;
pub mod loader;
pub mod nrw;
pub mod processing;
pub mod render;
pub mod topology;
pub mod types;

pub use error::{AggregateError, LoadError, LoadResult};
