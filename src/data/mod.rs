/// Data layer: ingestion, validation, summarization and correlation.
///
/// Architecture:
/// ```text
///  .csv / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse bytes → Dataset (numeric / text columns)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ validate  │  missing-value counts, is_clean
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  select   │  numeric column set, raw column values
///   └──────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌──────────┐   ┌─────────────┐
///   │ summary   │   │ correlation  │  describe table / Pearson matrix
///   └──────────┘   └─────────────┘
///        │              │
///        ▼              ▼
///   ┌──────────────────────┐
///   │ pipeline::Session     │  artifact bundle for the UI
///   └──────────────────────┘
/// ```

pub mod correlation;
pub mod error;
pub mod loader;
pub mod model;
pub mod options;
pub mod pipeline;
pub mod select;
pub mod summary;
pub mod validate;
