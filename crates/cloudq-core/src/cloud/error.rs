use serde::{Deserialize, Serialize};
use std::fmt;

/// Request-level failure reported by the provider.
///
/// Shaped like the provider's error payload: the short response code lives
/// in a nested `Error.Code` field that may, in malformed responses, be absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientError {
    /// API operation that failed (e.g. `DescribeVpcs`).
    pub operation: String,
    pub response: ErrorResponse,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(rename = "Error", default)]
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    #[serde(rename = "Code", default)]
    pub code: Option<String>,
    #[serde(rename = "Message", default)]
    pub message: String,
}

impl ClientError {
    pub fn new(
        operation: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation: operation.into(),
            response: ErrorResponse {
                error: ErrorDetail {
                    code: Some(code.into()),
                    message: message.into(),
                },
            },
        }
    }

    /// A client error whose payload lost its code field.
    pub fn without_code(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            response: ErrorResponse {
                error: ErrorDetail {
                    code: None,
                    message: message.into(),
                },
            },
        }
    }

    pub fn code(&self) -> Option<&str> {
        self.response.error.code.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.response.error.message
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "An error occurred ({}) when calling the {} operation: {}",
            self.code().unwrap_or("Unknown"),
            self.operation,
            self.message()
        )
    }
}

impl std::error::Error for ClientError {}
