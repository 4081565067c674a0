use thiserror::Error;

/// Errors surfaced by the checking engine and the format converters.
#[derive(Debug, Error)]
pub enum Error {
    /// A polygon that cannot be checked: too few vertices or an edge that
    /// is neither horizontal nor vertical.
    #[error("invalid polygon {id}: {reason}")]
    Input { id: i32, reason: String },

    /// An out-of-range configuration parameter.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A malformed input file (PGM header, GDSII record stream).
    #[error("{0}")]
    Format(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to encode report: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
