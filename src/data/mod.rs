/// Data layer: record model, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .json / .csv / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Vec<FleetRecord>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  AND of FilterSpecs → matching records
///   └──────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌──────────┐   ┌──────────┐
///   │  stats    │   │  charts   │  FleetStatistics / ChartData
///   └──────────┘   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  full or filtered set → CSV
///   └──────────┘
/// ```
///
/// `parse` holds the number/date/magnitude rules shared by all of the above.
pub mod charts;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod parse;
pub mod stats;
