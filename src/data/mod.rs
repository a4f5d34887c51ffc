/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  mock / .csv / .json / .parquet / backend
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  clean rows → DrugDataset
///   └──────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │ DrugDataset │  Vec<DrugRecord>, class / state option sets
///   └─────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  search + class + TE bucket → filtered indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ summary  │  count, cost, members, mean age
///   └──────────┘
/// ```

pub mod analysis;
pub mod filter;
pub mod loader;
pub mod mock;
pub mod model;
pub mod summary;
