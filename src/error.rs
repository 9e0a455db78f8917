use chrono::{DateTime, Utc};
use thiserror::Error;

/// The underlying position source cannot resolve a requested instant.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct PositionError {
    pub message: String,
}

impl PositionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ScanError {
    /// The request was rejected before any sampling took place.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// The position source failed mid-scan; no partial pass list is returned.
    #[error("position unavailable at {instant}: {message}")]
    PositionUnavailable {
        instant: DateTime<Utc>,
        message: String,
    },
    /// The scan was cancelled cooperatively. Distinct from an empty result.
    #[error("scan cancelled")]
    Cancelled,
}

#[derive(Debug, Error)]
pub enum TleError {
    #[error("TLE file read error: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("invalid TLE ({context}): {message}")]
    InvalidTle { context: String, message: String },
    #[error("no satellites found in {0}")]
    NoSatellites(String),
}

#[derive(Debug, Error)]
pub enum EphemerisError {
    #[error("ephemeris file read error: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("invalid ephemeris record at line {line}: {message}")]
    InvalidRecord { line: usize, message: String },
    #[error("ephemeris for {0} needs at least two samples")]
    TooFewSamples(String),
    #[error("ephemeris samples for {0} are not strictly time-ordered")]
    OutOfOrder(String),
}
