//! Name/tag → identifier lookups.
//!
//! Every public lookup runs inside the [`Backoff`] executor and acquires its
//! client through [`Lookups::client`], which is itself retried. Zero or
//! multiple matches are reported as [`LookupError::NotFound`] and
//! [`LookupError::Ambiguous`]; those are local errors and are never retried.

mod certificate;
mod compute;
mod data;
mod identity;
mod image;
mod network;
mod security_group;

pub use compute::{InstanceQuery, IpType};
pub use data::QueueKey;
pub use image::{ImageQuery, ImageSort, SortOrder, CANONICAL_OWNER};
pub use network::VpcInfo;

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::cloud::{CloudApi, Provider, Service};
use crate::error::{LookupError, LookupResult};
use crate::retry::{AwsRetry, Backoff, Sleeper, ThreadSleeper};

/// Region and optional named credential profile a lookup runs against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    pub region: String,
    pub profile: Option<String>,
}

impl Scope {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            profile: None,
        }
    }

    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }
}

/// Lookup functions bound to a provider and a retry policy.
pub struct Lookups<P, S = ThreadSleeper> {
    provider: P,
    backoff: Backoff,
    classifier: AwsRetry,
    sleeper: S,
}

impl<P: Provider> Lookups<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            backoff: Backoff::default(),
            classifier: AwsRetry,
            sleeper: ThreadSleeper,
        }
    }
}

impl<P: Provider, S: Sleeper> Lookups<P, S> {
    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Replace the sleeper used between attempts.
    pub fn with_sleeper<S2: Sleeper>(self, sleeper: S2) -> Lookups<P, S2> {
        Lookups {
            provider: self.provider,
            backoff: self.backoff,
            classifier: self.classifier,
            sleeper,
        }
    }

    pub fn backoff(&self) -> &Backoff {
        &self.backoff
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn sleeper(&self) -> &S {
        &self.sleeper
    }

    /// Run `op` under the configured backoff.
    pub fn retrying<T>(&self, op: impl FnMut() -> LookupResult<T>) -> LookupResult<T> {
        self.backoff
            .execute_with_sleeper(&self.classifier, &self.sleeper, op)
    }

    /// Acquire a client for `service`, retrying transient failures.
    pub fn client(&self, scope: &Scope, service: Service) -> LookupResult<Box<dyn CloudApi + '_>> {
        self.retrying(|| {
            self.provider
                .client(&scope.region, service, scope.profile.as_deref())
                .map_err(LookupError::from)
        })
    }
}

/// Exactly one element or a descriptive error.
fn exactly_one<T>(
    mut items: Vec<T>,
    none: impl FnOnce() -> String,
    many: impl FnOnce(&[T]) -> String,
) -> LookupResult<T> {
    match items.len() {
        0 => Err(LookupError::NotFound(none())),
        1 => Ok(items.remove(0)),
        _ => Err(LookupError::Ambiguous(many(&items))),
    }
}

/// Named field of a record as JSON; `null` when absent.
fn field<R: Serialize>(record: &R, key: &str) -> Value {
    serde_json::to_value(record)
        .ok()
        .and_then(|v| v.get(key).cloned())
        .unwrap_or(Value::Null)
}

/// `{k1=v1, k2=v2}` rendering of a tag set for error messages.
fn fmt_tags<V: std::fmt::Debug>(tags: &BTreeMap<String, V>) -> String {
    let mut out = String::from("{");
    for (i, (k, v)) in tags.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{k}={v:?}");
    }
    out.push('}');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_one_reports_counts() {
        let one = exactly_one(vec![1], || "none".into(), |_| "many".into());
        assert_eq!(one.unwrap(), 1);
        let none = exactly_one(Vec::<u8>::new(), || "none".into(), |_| "many".into());
        assert!(matches!(none, Err(LookupError::NotFound(m)) if m == "none"));
        let many = exactly_one(vec![1, 2], || "none".into(), |v| format!("{}", v.len()));
        assert!(matches!(many, Err(LookupError::Ambiguous(m)) if m == "2"));
    }

    #[test]
    fn field_reads_provider_names() {
        let sg = crate::cloud::SecurityGroup {
            group_id: "sg-1".into(),
            group_name: "web".into(),
            ..Default::default()
        };
        assert_eq!(field(&sg, "GroupId"), Value::from("sg-1"));
        assert_eq!(field(&sg, "Nope"), Value::Null);
    }

    #[test]
    fn tags_render_sorted() {
        let mut tags = BTreeMap::new();
        tags.insert("service".to_string(), "web".to_string());
        tags.insert("env".to_string(), "prod".to_string());
        assert_eq!(fmt_tags(&tags), r#"{env="prod", service="web"}"#);
    }
}
