//! Fleet reporting core: record model, ad-hoc filters, statistics and
//! chart bucketing.
//!
//! Everything in here is a pure function of its inputs. The desktop
//! application (`src/main.rs`) owns the record set and the filter list and
//! calls back into this crate on every change.

pub mod config;
pub mod data;
pub mod error;

pub use data::charts::{generate_chart_data, generate_chart_data_at, BarBucket, ChartData, PieSlice};
pub use data::export::{default_export_filename, export_csv, records_for_export, ExportOutcome};
pub use data::filter::{matches, matching_indices, partition, FilterSpec, FilterValue, Operator};
pub use data::model::{FieldKind, FieldName, FieldValue, FleetRecord};
pub use data::stats::{calculate_fleet_statistics, calculate_fleet_statistics_at, FleetStatistics};
pub use error::ExportError;
