/// Data layer: core types, loading, and class partitioning.
///
/// Architecture:
/// ```text
///  .arff / .csv / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → WaferDataset (label 1 → normal, -1 → abnormal)
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ WaferDataset  │  feature names, Vec<WaferRecord>
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  partition rows by target class
///   └──────────┘
/// ```

pub mod arff;
pub mod loader;
pub mod model;
pub mod filter;
