//! Ingestion entrypoints and implementations.
//!
//! Most callers go through [`crate::loader::DatasetSource`], which wraps
//! [`ingest_validated_from_path`] (from [`unified`]) with caching. [`ingest_from_path`]:
//!
//! - auto-detects format by file extension (or you can override via [`IngestionOptions`])
//! - reads the source into an in-memory [`crate::types::DataSet`]
//! - optionally reports success/failure/alerts to a [`LoadObserver`]
//!
//! Format-specific functions are also available under [`csv`] and (feature `excel`) `excel`.

pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;
pub mod observability;
pub mod unified;

pub use observability::{
    CompositeObserver, FileObserver, LoadContext, LoadObserver, LoadSeverity, LoadStats,
    StdErrObserver,
};
pub use unified::{
    ExcelSheetSelection, IngestionFormat, IngestionOptions, ingest_from_path,
    ingest_validated_from_path,
};
