use thiserror::Error;

use crate::version::manifest::ValidationError;
use crate::version::range::RangeError;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("{0}")]
    Network(#[from] reqwest::Error),

    #[error("Package '{0}' not found in npm registry")]
    NotFound(String),

    #[error("{status} {reason}")]
    Status { status: u16, reason: String },

    #[error("Invalid npm registry response format")]
    InvalidResponse(#[source] ValidationError),
}

/// Registry failures with the prefix of the operation that hit them
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to fetch package versions: {0}")]
    Versions(#[source] RegistryError),

    #[error("Failed to fetch package info: {0}")]
    Info(#[source] RegistryError),
}

impl FetchError {
    /// The underlying registry failure
    pub fn registry_error(&self) -> &RegistryError {
        match self {
            FetchError::Versions(e) | FetchError::Info(e) => e,
        }
    }
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Invalid semver range: {range}")]
    InvalidRange {
        range: String,
        #[source]
        source: RangeError,
    },

    #[error("A semver range is required to list satisfied versions")]
    MissingRange,

    #[error(transparent)]
    Fetch(#[from] FetchError),
}
