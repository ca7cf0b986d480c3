use thiserror::Error;

/// Errors that can arise while loading, playing or persisting an adventure.
#[derive(Debug, Error)]
pub enum AdventureError {
    /// Wrapper around IO errors (reading data files, save directory creation, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapper around serde_json errors from save files.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// A data file line could not be parsed.
    #[error("malformed {kind} data at line {line}: {reason}")]
    Malformed {
        kind: &'static str,
        line: usize,
        reason: String,
    },

    /// The map has no rows, an empty row, or rows of different length.
    #[error("invalid map grid: {0}")]
    InvalidGrid(String),

    /// The map references a location number with no `LOCATION` block.
    #[error("unknown location {0}")]
    UnknownLocation(i32),

    /// No cell on the map carries the origin id.
    #[error("origin location {0} not found on map")]
    OriginNotFound(i32),

    /// Save label rejected by validation.
    #[error("invalid save label: {0}")]
    InvalidLabel(#[from] crate::validation::ValidationError),

    /// Returned when restoring a label that has no save file.
    #[error("saved game not found: {0}")]
    SaveNotFound(String),
}
