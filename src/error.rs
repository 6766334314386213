use thiserror::Error;

/// Errors from the I/O edges of the crate (config files, persistent stores).
///
/// The simulation itself never fails; these only surface from loading and
/// flushing.
#[derive(Error, Debug)]
pub enum SkyflapError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
    #[error("Storage unavailable: {0}")]
    Storage(String),
}
