use thiserror::Error;

/// Errors surfaced to callers of the crate.
///
/// Provider outages and malformed provider payloads never appear here: the resolver turns them
/// into degraded positions (see [`ResolveFailure`](crate::ephemeris::ResolveFailure)). What is
/// left is rejected input and setup problems.
#[derive(Error, Debug)]
pub enum OrreryError {
    #[error("Invalid bounding box: {0}")]
    InvalidBoundingBox(String),

    #[error("Unknown celestial body: {0}")]
    UnknownBody(String),

    #[error("Unknown catalog object: {0}")]
    UnknownObject(u32),

    #[error("Invalid time: {0}")]
    InvalidTime(String),

    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Unable to read configuration file: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("HTTP client construction failed: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Catalog row rejected: {0}")]
    CatalogRead(#[from] csv::Error),

    #[error("Tracing subscriber initialization failed: {0}")]
    TracingInit(String),
}

impl OrreryError {
    /// True for the errors caused by the caller's request rather than by the process setup.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            OrreryError::InvalidBoundingBox(_)
                | OrreryError::UnknownBody(_)
                | OrreryError::UnknownObject(_)
                | OrreryError::InvalidTime(_)
        )
    }
}

impl PartialEq for OrreryError {
    fn eq(&self, other: &Self) -> bool {
        use OrreryError::*;
        match (self, other) {
            (InvalidBoundingBox(a), InvalidBoundingBox(b)) => a == b,
            (UnknownBody(a), UnknownBody(b)) => a == b,
            (UnknownObject(a), UnknownObject(b)) => a == b,
            (InvalidTime(a), InvalidTime(b)) => a == b,
            (TracingInit(a), TracingInit(b)) => a == b,

            // wrapped library errors only compare by variant
            (Config(_), Config(_)) => true,
            (ConfigIo(_), ConfigIo(_)) => true,
            (HttpClient(_), HttpClient(_)) => true,
            (CatalogRead(_), CatalogRead(_)) => true,

            _ => false,
        }
    }
}
