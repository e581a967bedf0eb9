use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum ScanError {
    #[error("driver error: {0}")]
    Driver(String),
    #[error("timeout waiting for scan results")]
    Timeout,
    #[error("invalid state: {0}")]
    State(String),
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("missing channel plan")]
    MissingChannelPlan,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

/// Map a driver-boundary error to a typed `ScanError`.
///
/// The `ScanDriver` trait uses `Box<dyn Error + Send + Sync>` for maximum
/// flexibility; this converts those to our typed error enum.
pub fn map_driver_error(e: &(dyn std::error::Error + 'static)) -> ScanError {
    let s = e.to_string();
    if s.to_lowercase().contains("timeout") {
        ScanError::Timeout
    } else {
        ScanError::Driver(s)
    }
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
