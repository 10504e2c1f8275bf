//! Error raised when a client error lacks its response code.

/// The nested `Error.Code` field of a client error was absent.
///
/// Errors that pass [`RetryClassifier::is_known`](super::RetryClassifier::is_known)
/// are expected to always carry a code; this surfaces the broken invariant
/// as a fresh error instead of guessing a classification.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("client error from {operation} carries no response code")]
pub struct MissingResponseCode {
    /// Operation that produced the malformed error.
    pub operation: String,
}
