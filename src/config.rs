//! Dashboard configuration.
//!
//! The dashboard has no CLI flags or environment variables. A [`DashboardConfig`] is either built
//! in code (starting from [`Default`]) or read from a JSON file where every key is optional:
//!
//! ```json
//! {
//!   "source": "data/NRW_dataset6.xlsx",
//!   "sheet": { "sheet": "2023" },
//!   "alert_at_or_above": "error",
//!   "log_file": "nrw-load.log"
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::LoadResult;
use crate::ingestion::{
    CompositeObserver, ExcelSheetSelection, FileObserver, IngestionFormat, IngestionOptions,
    LoadObserver, LoadSeverity, StdErrObserver,
};

/// Workbook the dashboard reads when nothing else is configured.
pub const DEFAULT_SOURCE: &str = "data/NRW_dataset6.xlsx";

/// Settings for locating and reading the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Path of the workbook (or CSV export).
    pub source: PathBuf,
    /// Forced format; inferred from the extension of `source` when absent.
    pub format: Option<IngestionFormat>,
    /// Which sheet(s) to read from a workbook.
    pub sheet: ExcelSheetSelection,
    /// Failures at or above this severity are raised as alerts.
    pub alert_at_or_above: LoadSeverity,
    /// Report load events on stderr.
    pub log_to_stderr: bool,
    /// Also append load events to this file.
    pub log_file: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from(DEFAULT_SOURCE),
            format: None,
            sheet: ExcelSheetSelection::First,
            alert_at_or_above: LoadSeverity::Critical,
            log_to_stderr: true,
            log_file: None,
        }
    }
}

impl DashboardConfig {
    /// Config that reads `source` with all other settings at their defaults.
    pub fn for_source(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    /// Parse a JSON config document.
    pub fn from_json_str(input: &str) -> LoadResult<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Read and parse a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> LoadResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Ingestion options derived from this config.
    ///
    /// Observers follow `log_to_stderr` and `log_file`; with both set, events go to both.
    pub fn ingestion_options(&self) -> IngestionOptions {
        let mut observers: Vec<Arc<dyn LoadObserver>> = Vec::new();
        if self.log_to_stderr {
            observers.push(Arc::new(StdErrObserver));
        }
        if let Some(path) = &self.log_file {
            observers.push(Arc::new(FileObserver::new(path)));
        }

        let observer: Option<Arc<dyn LoadObserver>> = match observers.len() {
            0 => None,
            1 => observers.pop(),
            _ => Some(Arc::new(CompositeObserver::new(observers))),
        };

        IngestionOptions {
            format: self.format,
            excel_sheet_selection: self.sheet.clone(),
            observer,
            alert_at_or_above: self.alert_at_or_above,
        }
    }
}
