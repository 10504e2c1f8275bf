//! Retry and backoff policy.
//!
//! This module encapsulates response-code classification (throttling,
//! internal failures, eventually-consistent "not found" codes) and the
//! exponential backoff loop so every lookup shares one consistent policy.
//!
//! Codes shaped like `Subnet.NotFound` are retried on purpose: a resource
//! created moments ago may not be visible to read APIs yet. The cost is that
//! a resource which really does not exist is retried until the budget runs
//! out before its error surfaces.

mod classify;
mod error;
mod policy;
mod run;
mod sleeper;

pub use classify::{is_retryable_code, AwsRetry, RetryClassifier, RETRY_ON};
pub use error::MissingResponseCode;
pub use policy::Backoff;
pub use sleeper::{Sleeper, ThreadSleeper, TrackingSleeper};
