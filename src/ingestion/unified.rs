//! Unified ingestion entrypoint.
//!
//! [`ingest_from_path`] reads a file into an in-memory [`crate::types::DataSet`] using a provided
//! [`crate::types::Schema`].
//!
//! - If [`IngestionOptions::format`] is `None`, the format is inferred from the file extension.
//! - If a [`LoadObserver`] is provided, success/failure/alerts are reported to it.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{LoadError, LoadResult};
use crate::types::{DataSet, Schema};

use super::csv;
use super::observability::{LoadContext, LoadObserver, LoadSeverity, LoadStats, severity_for_error};

/// Supported ingestion formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestionFormat {
    /// Comma-separated values.
    Csv,
    /// Spreadsheet/workbook formats (feature-gated behind `excel`).
    Excel,
}

impl IngestionFormat {
    /// Parse an ingestion format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Some(Self::Excel),
            _ => None,
        }
    }

    /// Resolve the format for `path`: `forced` if given, otherwise inferred from the extension.
    pub fn resolve(path: &Path, forced: Option<Self>) -> LoadResult<Self> {
        match forced {
            Some(f) => Ok(f),
            None => infer_format_from_path(path),
        }
    }
}

/// How to choose sheet(s) when ingesting a workbook.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExcelSheetSelection {
    /// Ingest the first sheet.
    #[default]
    First,
    /// Ingest a single named sheet.
    Sheet(String),
    /// Ingest all sheets and concatenate rows.
    AllSheets,
    /// Ingest only the listed sheets (in order) and concatenate rows.
    Sheets(Vec<String>),
}

/// Options controlling unified ingestion behavior.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct IngestionOptions {
    /// If `None`, auto-detect format from file extension.
    pub format: Option<IngestionFormat>,
    /// Excel-specific options.
    pub excel_sheet_selection: ExcelSheetSelection,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn LoadObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: LoadSeverity,
}

impl fmt::Debug for IngestionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionOptions")
            .field("format", &self.format)
            .field("excel_sheet_selection", &self.excel_sheet_selection)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for IngestionOptions {
    fn default() -> Self {
        Self {
            format: None,
            excel_sheet_selection: ExcelSheetSelection::default(),
            observer: None,
            alert_at_or_above: LoadSeverity::Critical,
        }
    }
}

/// Unified ingestion entry point for path-based sources.
///
/// When an observer is configured, this function reports:
///
/// - `on_loaded` on success, with row count and dropped optional columns
/// - `on_failure` on failure, with a computed severity
/// - `on_alert` on failure when the computed severity is >= `options.alert_at_or_above`
///
/// ```no_run
/// use nrw_dashboard::ingestion::{ingest_from_path, IngestionOptions};
/// use nrw_dashboard::nrw::nrw_schema;
///
/// # fn main() -> Result<(), nrw_dashboard::LoadError> {
/// let ds = ingest_from_path("data/NRW_dataset6.xlsx", &nrw_schema(), &IngestionOptions::default())?;
/// println!("rows={}", ds.row_count());
/// # Ok(())
/// # }
/// ```
pub fn ingest_from_path(
    path: impl AsRef<Path>,
    schema: &Schema,
    options: &IngestionOptions,
) -> LoadResult<DataSet> {
    ingest_validated_from_path(path, schema, options, |_| Ok(()))
}

/// Like [`ingest_from_path`], but runs `validate` on the parsed rows first. A validation error
/// is reported as a failure; `on_loaded` only fires for data that passed.
pub fn ingest_validated_from_path<V>(
    path: impl AsRef<Path>,
    schema: &Schema,
    options: &IngestionOptions,
    validate: V,
) -> LoadResult<DataSet>
where
    V: FnOnce(&DataSet) -> LoadResult<()>,
{
    let path = path.as_ref();
    let fmt = IngestionFormat::resolve(path, options.format)?;

    let ctx = LoadContext {
        path: path.to_path_buf(),
        format: fmt,
    };

    let result = match fmt {
        IngestionFormat::Csv => csv::ingest_csv_from_path(path, schema),
        IngestionFormat::Excel => {
            ingest_excel_dispatch(path, schema, &options.excel_sheet_selection)
        }
    }
    .and_then(|ds| validate(&ds).map(|()| ds));

    if let Some(obs) = options.observer.as_ref() {
        match &result {
            Ok(ds) => obs.on_loaded(&ctx, &load_stats(schema, ds)),
            Err(e) => report_failure(obs.as_ref(), &ctx, e, options.alert_at_or_above),
        }
    }

    result
}

/// Report a failure to `obs`, raising an alert when it meets `alert_at_or_above`.
fn report_failure(
    obs: &dyn LoadObserver,
    ctx: &LoadContext,
    error: &LoadError,
    alert_at_or_above: LoadSeverity,
) {
    let sev = severity_for_error(error);
    obs.on_failure(ctx, sev, error);
    if sev >= alert_at_or_above {
        obs.on_alert(ctx, sev, error);
    }
}

fn load_stats(requested: &Schema, loaded: &DataSet) -> LoadStats {
    LoadStats {
        rows: loaded.row_count(),
        missing_optional: requested
            .field_names()
            .filter(|name| !loaded.schema.contains(name))
            .map(str::to_owned)
            .collect(),
    }
}

fn infer_format_from_path(path: &Path) -> LoadResult<IngestionFormat> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| LoadError::SchemaMismatch {
            message: format!(
                "cannot infer format: path has no extension ({})",
                path.display()
            ),
        })?;

    IngestionFormat::from_extension(ext).ok_or_else(|| LoadError::SchemaMismatch {
        message: format!(
            "cannot infer format from extension '{ext}' for path ({})",
            path.display()
        ),
    })
}

fn ingest_excel_dispatch(
    path: &Path,
    schema: &Schema,
    sel: &ExcelSheetSelection,
) -> LoadResult<DataSet> {
    #[cfg(feature = "excel")]
    {
        use super::excel;

        match sel {
            ExcelSheetSelection::First => excel::ingest_excel_from_path(path, None, schema),
            ExcelSheetSelection::Sheet(name) => {
                excel::ingest_excel_from_path(path, Some(name.as_str()), schema)
            }
            ExcelSheetSelection::AllSheets => {
                excel::ingest_excel_workbook_from_path(path, None, schema)
            }
            ExcelSheetSelection::Sheets(names) => {
                let refs: Vec<&str> = names.iter().map(|s| s.as_str()).collect();
                excel::ingest_excel_workbook_from_path(path, Some(refs.as_slice()), schema)
            }
        }
    }

    #[cfg(not(feature = "excel"))]
    {
        let _ = (path, schema, sel);
        Err(LoadError::SchemaMismatch {
            message: "excel ingestion not enabled (enable cargo feature 'excel')".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::IngestionFormat;

    #[test]
    fn format_inferred_from_extension() {
        assert_eq!(
            IngestionFormat::resolve(Path::new("data/NRW_dataset6.XLSX"), None).unwrap(),
            IngestionFormat::Excel
        );
        assert_eq!(
            IngestionFormat::resolve(Path::new("export.csv"), None).unwrap(),
            IngestionFormat::Csv
        );
    }

    #[test]
    fn forced_format_wins_over_extension() {
        assert_eq!(
            IngestionFormat::resolve(Path::new("export.txt"), Some(IngestionFormat::Csv)).unwrap(),
            IngestionFormat::Csv
        );
    }

    #[test]
    fn unknown_extension_is_a_schema_mismatch() {
        let err = IngestionFormat::resolve(Path::new("data.parquet"), None).unwrap_err();
        assert!(err.to_string().contains("cannot infer format from extension 'parquet'"));
        let err = IngestionFormat::resolve(Path::new("data"), None).unwrap_err();
        assert!(err.to_string().contains("path has no extension"));
    }
}
