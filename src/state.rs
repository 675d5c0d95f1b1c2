use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::cache::DatasetCache;
use crate::data::export::save_csv;
use crate::data::filter::{apply, DateRange, FilterSelection};
use crate::data::model::{Dataset, Dimension};
use crate::data::DataError;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// One-line message shown in the top bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Info(String),
    Error(String),
}

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// File the dataset is read from.
    pub source_path: PathBuf,

    cache: DatasetCache,

    /// Loaded dataset (None until a load succeeds).
    pub dataset: Option<Arc<Dataset>>,

    /// Set when the source could not be loaded; the dashboard is not drawn.
    pub fatal_error: Option<String>,

    /// Date picker values. Validated into a [`DateRange`] on every pass.
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    /// Per-dimension inclusion sets.
    pub filters: BTreeMap<Dimension, BTreeSet<String>>,

    /// Category colours shared by every chart.
    pub color_map: Option<ColorMap>,

    /// Whether the raw transaction table is expanded.
    pub show_table: bool,

    pub status: Option<Status>,
}

impl AppState {
    /// Build the state and load the configured source.
    pub fn new(config: DashboardConfig) -> Self {
        let mut state = Self::empty(config);
        state.load();
        state
    }

    fn empty(config: DashboardConfig) -> Self {
        let today = chrono::Local::now().date_naive();
        Self {
            source_path: config.data_path.clone(),
            config,
            cache: DatasetCache::new(),
            dataset: None,
            fatal_error: None,
            start_date: today,
            end_date: today,
            filters: BTreeMap::new(),
            color_map: None,
            show_table: false,
            status: None,
        }
    }

    /// Load `source_path` through the cache. A failure is fatal: the
    /// dataset is dropped and nothing but the error is rendered.
    pub fn load(&mut self) {
        match self.cache.get_or_load(&self.source_path) {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => self.fail(e),
        }
    }

    /// Drop the cached copy and read the file again.
    pub fn reload(&mut self) {
        self.cache.invalidate(&self.source_path);
        log::info!("Reloading {}", self.source_path.display());
        self.load();
    }

    /// Switch to a different source file.
    pub fn open(&mut self, path: PathBuf) {
        self.source_path = path;
        self.load();
    }

    /// Report an error. Selection errors only reach the status line; any
    /// other error drops the dataset.
    fn fail(&mut self, e: DataError) {
        if !e.is_fatal() {
            log::warn!("{e}");
            self.status = Some(Status::Error(e.to_string()));
            return;
        }
        log::error!("Failed to load {}: {e}", self.source_path.display());
        self.dataset = None;
        self.color_map = None;
        self.fatal_error = Some(format!("❌ {e}"));
    }

    /// Ingest a newly loaded dataset and reset filters to "everything".
    pub fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        if dataset.is_empty() {
            return self.fail(DataError::EmptySource(self.source_path.clone()));
        }
        let defaults = match FilterSelection::all(&dataset) {
            Ok(sel) => sel,
            Err(e) => return self.fail(e),
        };

        self.apply_defaults(defaults);
        self.color_map = Some(ColorMap::new(&dataset.values(Dimension::Category)));
        self.dataset = Some(dataset);
        self.fatal_error = None;
        self.status = None;
    }

    fn apply_defaults(&mut self, sel: FilterSelection) {
        self.start_date = sel.date_range.start();
        self.end_date = sel.date_range.end();
        self.filters = Dimension::FILTERABLE
            .iter()
            .filter_map(|d| sel.selected(*d).map(|s| (*d, s.clone())))
            .collect();
    }

    /// Put every filter back to the full domain.
    pub fn reset_filters(&mut self) {
        if let Some(ds) = &self.dataset {
            if let Ok(sel) = FilterSelection::all(ds) {
                self.apply_defaults(sel);
            }
        }
    }

    /// The current widget values as a validated selection.
    pub fn selection(&self) -> Result<FilterSelection, DataError> {
        let set = |d: Dimension| self.filters.get(&d).cloned().unwrap_or_default();
        Ok(FilterSelection {
            date_range: DateRange::new(self.start_date, self.end_date)?,
            categories: set(Dimension::Category),
            regions: set(Dimension::Region),
            channels: set(Dimension::Channel),
        })
    }

    /// Toggle a single value in a dimension's inclusion set.
    pub fn toggle_filter_value(&mut self, dim: Dimension, value: &str) {
        let selected = self.filters.entry(dim).or_default();
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
    }

    /// Select all values of a dimension.
    pub fn select_all(&mut self, dim: Dimension) {
        if let Some(ds) = &self.dataset {
            self.filters.insert(dim, ds.values(dim));
        }
    }

    /// Deselect all values of a dimension.
    pub fn select_none(&mut self, dim: Dimension) {
        self.filters.insert(dim, BTreeSet::new());
    }

    /// Write the rows matching the current selection to `path` as CSV.
    pub fn export_filtered(&mut self, path: &Path) -> Result<usize> {
        let dataset = self.dataset.clone().context("no dataset loaded")?;
        let selection = self.selection().context("current filters are invalid")?;
        let filtered = apply(&dataset, &selection);
        save_csv(&filtered, path).with_context(|| format!("exporting to {}", path.display()))?;
        Ok(filtered.len())
    }
}
