/// Data layer: catalog types, query building, storage access and export.
///
/// Architecture:
/// ```text
///   Filters + SortField
///        │
///        ▼
///   ┌──────────┐
///   │  query    │  build parameterised SELECT
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  store    │  Catalog: read-only SQLite → Vec<ModelRow>, matrices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  selected names → ZIP bytes, rows → CSV
///   └──────────┘
/// ```

pub mod error;
pub mod export;
pub mod model;
pub mod query;
pub mod store;

#[cfg(test)]
pub mod fixtures;
