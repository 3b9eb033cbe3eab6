//! Load event reporting.
//!
//! The loader does not log on its own; it reports outcomes to an optional [`LoadObserver`].
//! Stock observers write to stderr, append to a file, or fan out to several observers.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::LoadError;

use super::unified::IngestionFormat;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (load failed).
    Error,
    /// Critical error (typically I/O or other infrastructure failures).
    Critical,
}

/// Context about a load attempt.
#[derive(Debug, Clone)]
pub struct LoadContext {
    /// The input path.
    pub path: PathBuf,
    /// Format used for ingestion.
    pub format: IngestionFormat,
}

/// Stats reported on a successful load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadStats {
    /// Number of loaded rows.
    pub rows: usize,
    /// Optional columns the source did not provide.
    pub missing_optional: Vec<String>,
}

/// Observer interface for load outcomes.
pub trait LoadObserver: Send + Sync {
    /// Called when the source was read and parsed.
    fn on_loaded(&self, _ctx: &LoadContext, _stats: &LoadStats) {}

    /// Called when a load request was served from the cache without reading the source.
    fn on_cache_hit(&self, _ctx: &LoadContext, _rows: usize) {}

    /// Called when loading fails.
    fn on_failure(&self, _ctx: &LoadContext, _severity: LoadSeverity, _error: &LoadError) {}

    /// Called when a load failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &LoadContext, severity: LoadSeverity, error: &LoadError) {
        self.on_failure(ctx, severity, error)
    }
}

/// Severity assigned to a load failure.
pub fn severity_for_error(e: &LoadError) -> LoadSeverity {
    match e {
        LoadError::Io(_) => LoadSeverity::Critical,
        LoadError::Csv(err) => match err.kind() {
            ::csv::ErrorKind::Io(_) => LoadSeverity::Critical,
            _ => LoadSeverity::Error,
        },
        #[cfg(feature = "excel")]
        LoadError::Excel(calamine::Error::Io(_)) => LoadSeverity::Critical,
        #[cfg(feature = "excel")]
        LoadError::Excel(_) => LoadSeverity::Error,
        LoadError::Config(_) | LoadError::SchemaMismatch { .. } | LoadError::ParseError { .. } => {
            LoadSeverity::Error
        }
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn LoadObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn LoadObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl LoadObserver for CompositeObserver {
    fn on_loaded(&self, ctx: &LoadContext, stats: &LoadStats) {
        for o in &self.observers {
            o.on_loaded(ctx, stats);
        }
    }

    fn on_cache_hit(&self, ctx: &LoadContext, rows: usize) {
        for o in &self.observers {
            o.on_cache_hit(ctx, rows);
        }
    }

    fn on_failure(&self, ctx: &LoadContext, severity: LoadSeverity, error: &LoadError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &LoadContext, severity: LoadSeverity, error: &LoadError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Logs load events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl LoadObserver for StdErrObserver {
    fn on_loaded(&self, ctx: &LoadContext, stats: &LoadStats) {
        eprintln!(
            "[load][ok] format={:?} path={} rows={} missing_optional={:?}",
            ctx.format,
            ctx.path.display(),
            stats.rows,
            stats.missing_optional
        );
    }

    fn on_cache_hit(&self, ctx: &LoadContext, rows: usize) {
        eprintln!("[load][cached] path={} rows={rows}", ctx.path.display());
    }

    fn on_failure(&self, ctx: &LoadContext, severity: LoadSeverity, error: &LoadError) {
        eprintln!(
            "[load][{:?}] format={:?} path={} err={}",
            severity,
            ctx.format,
            ctx.path.display(),
            error
        );
    }

    fn on_alert(&self, ctx: &LoadContext, severity: LoadSeverity, error: &LoadError) {
        eprintln!(
            "[ALERT][load][{:?}] format={:?} path={} err={}",
            severity,
            ctx.format,
            ctx.path.display(),
            error
        );
    }
}

/// Appends load events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{} {line}", unix_ts());
        }
    }
}

impl LoadObserver for FileObserver {
    fn on_loaded(&self, ctx: &LoadContext, stats: &LoadStats) {
        self.append_line(&format!(
            "ok format={:?} path={} rows={} missing_optional={}",
            ctx.format,
            ctx.path.display(),
            stats.rows,
            stats.missing_optional.join(",")
        ));
    }

    fn on_cache_hit(&self, ctx: &LoadContext, rows: usize) {
        self.append_line(&format!("cached path={} rows={rows}", ctx.path.display()));
    }

    fn on_failure(&self, ctx: &LoadContext, severity: LoadSeverity, error: &LoadError) {
        self.append_line(&format!(
            "fail severity={:?} format={:?} path={} err={}",
            severity,
            ctx.format,
            ctx.path.display(),
            error
        ));
    }

    fn on_alert(&self, ctx: &LoadContext, severity: LoadSeverity, error: &LoadError) {
        self.append_line(&format!(
            "ALERT severity={:?} format={:?} path={} err={}",
            severity,
            ctx.format,
            ctx.path.display(),
            error
        ));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
