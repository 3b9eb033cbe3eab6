//! Cached dataset loading.
//!
//! A [`DatasetSource`] is created once at start-up and handed to whatever needs the data. The
//! first successful [`DatasetSource::load`] reads the source; every later call returns the same
//! `Arc<DataSet>` without touching the file again. Concurrent first calls wait for a single read.
//! A failed load is not cached, so the next call retries the read.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::config::DashboardConfig;
use crate::error::LoadResult;
use crate::ingestion::{IngestionFormat, IngestionOptions, LoadContext, ingest_validated_from_path};
use crate::nrw::{nrw_schema, validate_records};
use crate::types::{DataSet, Schema};

/// Handle to the dashboard dataset: a configured source plus a write-once cache.
pub struct DatasetSource {
    config: DashboardConfig,
    schema: Schema,
    options: IngestionOptions,
    cache: OnceCell<Arc<DataSet>>,
}

impl DatasetSource {
    /// Create a handle for the network dataset described by `config`. Nothing is read yet.
    pub fn new(config: DashboardConfig) -> Self {
        Self::with_schema(config, nrw_schema())
    }

    /// Create a handle that loads `schema` instead of the network dataset schema.
    pub fn with_schema(config: DashboardConfig, schema: Schema) -> Self {
        let options = config.ingestion_options();
        Self {
            config,
            schema,
            options,
            cache: OnceCell::new(),
        }
    }

    /// Replace the ingestion options derived from the config (e.g. to attach another observer).
    pub fn with_options(mut self, options: IngestionOptions) -> Self {
        self.options = options;
        self
    }

    /// The config this handle was built from.
    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Returns `true` once a load has succeeded.
    pub fn is_loaded(&self) -> bool {
        self.cache.get().is_some()
    }

    /// Return the dataset, reading the source on first use.
    pub fn load(&self) -> LoadResult<Arc<DataSet>> {
        let mut read_here = false;
        let ds = self.cache.get_or_try_init(|| {
            read_here = true;
            ingest_validated_from_path(
                &self.config.source,
                &self.schema,
                &self.options,
                validate_records,
            )
            .map(Arc::new)
        })?;

        if !read_here {
            self.report_cache_hit(ds);
        }
        Ok(Arc::clone(ds))
    }

    fn report_cache_hit(&self, ds: &DataSet) {
        let Some(obs) = self.options.observer.as_ref() else {
            return;
        };
        if let Ok(format) = self.format() {
            obs.on_cache_hit(&self.context(format), ds.row_count());
        }
    }

    fn format(&self) -> LoadResult<IngestionFormat> {
        IngestionFormat::resolve(&self.config.source, self.options.format)
    }

    fn context(&self, format: IngestionFormat) -> LoadContext {
        LoadContext {
            path: self.config.source.clone(),
            format,
        }
    }
}

impl fmt::Debug for DatasetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatasetSource")
            .field("source", &self.config.source)
            .field("options", &self.options)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}
