//! Error types for the generation core and the export paths.
//!
//! Generation itself cannot fail; only parsing caller input and writing files can.

/// Result type alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A metric name outside of rssi/cqi/rsrp/rsrq/snr.
    #[error("unknown metric type: {0:?}")]
    UnknownMetric(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
