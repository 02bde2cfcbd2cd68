use std::path::PathBuf;

/// Failures surfaced by the export collaborator. Data-quality problems in
/// records are never errors; writing the file is the only thing that can fail.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("IO error writing {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Nothing to export: the record set is empty")]
    Empty,
}
