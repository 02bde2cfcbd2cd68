use std::path::Path;

use chrono::NaiveDate;

use super::filter::{partition, FilterSpec};
use super::model::FleetRecord;
use crate::error::ExportError;

// ---------------------------------------------------------------------------
// Export collaborator
// ---------------------------------------------------------------------------

/// What the UI shows after an export attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    pub success: bool,
    pub error: Option<String>,
}

impl<T> From<Result<T, ExportError>> for ExportOutcome {
    fn from(result: Result<T, ExportError>) -> Self {
        match result {
            Ok(_) => ExportOutcome {
                success: true,
                error: None,
            },
            Err(e) => ExportOutcome {
                success: false,
                error: Some(e.to_string()),
            },
        }
    }
}

/// The record set to hand to the exporter: everything when no filter is
/// active, the filtered subset otherwise.
pub fn records_for_export<'a>(
    all: &'a [FleetRecord],
    filters: &[FilterSpec],
) -> Vec<&'a FleetRecord> {
    if filters.is_empty() {
        all.iter().collect()
    } else {
        partition(all, filters)
    }
}

/// `fleet_all_2026-10-18.csv` or `fleet_filtered_2026-10-18.csv`.
pub fn default_export_filename(filtered: bool, today: NaiveDate) -> String {
    let scope = if filtered { "filtered" } else { "all" };
    format!("fleet_{scope}_{}.csv", today.format("%Y-%m-%d"))
}

/// Write `records` as CSV with a header row. Returns the number of rows.
pub fn export_csv<'a, I>(records: I, path: &Path) -> Result<usize, ExportError>
where
    I: IntoIterator<Item = &'a FleetRecord>,
{
    let mut records = records.into_iter().peekable();
    if records.peek().is_none() {
        return Err(ExportError::Empty);
    }

    let file = std::fs::File::create(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = csv::Writer::from_writer(file);

    let mut rows = 0;
    for record in records {
        writer.serialize(record)?;
        rows += 1;
    }
    writer.flush().map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    log::info!("Exported {rows} records to {}", path.display());
    Ok(rows)
}
