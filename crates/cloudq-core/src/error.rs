//! Error type shared by the lookup layer and the filter registry.

use crate::cloud::ClientError;
use crate::retry::MissingResponseCode;

/// Result alias used by every lookup.
pub type LookupResult<T> = std::result::Result<T, LookupError>;

/// Failure of a lookup or filter invocation.
///
/// Only [`LookupError::Client`] belongs to the provider's client-error
/// family; every other variant is raised locally and is never retried.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// The provider rejected a request.
    #[error(transparent)]
    Client(#[from] ClientError),
    /// A client error arrived without its nested response code.
    #[error(transparent)]
    MissingResponseCode(#[from] MissingResponseCode),
    /// Zero records matched the search criteria.
    #[error("{0}")]
    NotFound(String),
    /// More than one record matched where exactly one was required.
    #[error("{0}")]
    Ambiguous(String),
    /// A filter argument was missing or had the wrong shape.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// No filter is registered under this name.
    #[error("unknown filter: {0}")]
    UnknownFilter(String),
    /// A lookup result could not be converted to JSON.
    #[error("failed to encode result: {0}")]
    Encode(#[from] serde_json::Error),
}

impl LookupError {
    /// The client error carried by this value, if it belongs to that family.
    pub fn as_client_error(&self) -> Option<&ClientError> {
        match self {
            LookupError::Client(e) => Some(e),
            _ => None,
        }
    }
}
