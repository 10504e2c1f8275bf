//! Classify provider errors and response codes into retry decisions.

use std::sync::LazyLock;

use regex::Regex;

use super::error::MissingResponseCode;
use crate::cloud::ClientError;
use crate::error::LookupError;

/// Response codes that always indicate a transient failure.
///
/// Based on the EC2 API error reference (throttling and internal errors).
pub const RETRY_ON: [&str; 5] = [
    "RequestLimitExceeded",
    "Unavailable",
    "ServiceUnavailable",
    "InternalFailure",
    "InternalError",
];

/// Decides retry eligibility for errors of type `E`.
///
/// One implementation exists per cloud provider. The error type the provider
/// recognizes is the trait's type parameter, so no shared mutable state is
/// involved in picking it.
pub trait RetryClassifier<E: ?Sized> {
    /// True if `error` belongs to the provider's client-error family.
    /// Errors outside the family are never retried.
    fn is_known(&self, error: &E) -> bool;

    /// Extract the short machine-readable response code from a known error.
    fn response_code(&self, error: &E) -> Result<String, MissingResponseCode>;

    /// True if `code` indicates a transient condition worth retrying.
    fn is_retryable(&self, code: &str) -> bool;
}

static NOT_FOUND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\w+\.NotFound").expect("NotFound pattern is a valid regex"));

/// True if `code` is in [`RETRY_ON`] or starts with `<word>.NotFound`.
pub fn is_retryable_code(code: &str) -> bool {
    RETRY_ON.contains(&code) || NOT_FOUND.is_match(code)
}

/// Retry classifier for AWS client errors.
#[derive(Debug, Clone, Copy, Default)]
pub struct AwsRetry;

impl AwsRetry {
    fn code_of(error: &ClientError) -> Result<String, MissingResponseCode> {
        error
            .code()
            .map(str::to_string)
            .ok_or_else(|| MissingResponseCode {
                operation: error.operation.clone(),
            })
    }
}

impl RetryClassifier<LookupError> for AwsRetry {
    fn is_known(&self, error: &LookupError) -> bool {
        error.as_client_error().is_some()
    }

    fn response_code(&self, error: &LookupError) -> Result<String, MissingResponseCode> {
        match error.as_client_error() {
            Some(client) => Self::code_of(client),
            None => Err(MissingResponseCode {
                operation: "<local>".to_string(),
            }),
        }
    }

    fn is_retryable(&self, code: &str) -> bool {
        is_retryable_code(code)
    }
}
