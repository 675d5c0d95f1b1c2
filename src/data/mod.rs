/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐      ┌──────────────┐
///   │  loader   │ ◄── │ DatasetCache │  path + mtime/len → Arc<Dataset>
///   └──────────┘      └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset   │  Vec<Transaction>, raw rows, unique values
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  date range + inclusion sets → FilteredDataset
///   └──────────┘
///        │
///        ├──────────────► aggregate  (KPIs, time series, breakdowns)
///        │
///        └──────────────► export     (CSV of the retained rows)
/// ```
///
/// `pipeline::render` runs filter + aggregate in one call.

pub mod aggregate;
pub mod cache;
pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod pipeline;

pub use error::DataError;
