/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset   │  Vec<Record>, option sets (registry)
///   └──────────┘
///        │          ┌───────────┐
///        ▼          │ selection  │  checked values per dimension
///   ┌──────────┐◀───└───────────┘
///   │  filter   │  membership on all four dimensions → FilteredView
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  KPIs + chart tables → Summary
///   └───────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
pub mod registry;
pub mod selection;
pub mod summary;
