//! Instance lookups.

use serde_json::Value;
use std::collections::BTreeMap;
use std::str::FromStr;

use super::{exactly_one, field, fmt_tags, Lookups, Scope};
use crate::cloud::{tag_filter, CloudApi, Filter, Instance, Provider, Service, Tagged};
use crate::error::{LookupError, LookupResult};
use crate::retry::Sleeper;

/// Which address an IP lookup matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IpType {
    #[default]
    Private,
    Public,
}

impl IpType {
    fn filter_name(self) -> &'static str {
        match self {
            IpType::Private => "private-ip-address",
            IpType::Public => "ip-address",
        }
    }
}

impl FromStr for IpType {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "private" => Ok(IpType::Private),
            "public" => Ok(IpType::Public),
            other => Err(LookupError::InvalidArgument(format!(
                "ip_type must be private or public, got {other}"
            ))),
        }
    }
}

/// Parameters of [`Lookups::instance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceQuery {
    pub name: String,
    /// Instance field to return, e.g. `PublicIpAddress` or `InstanceId`.
    pub return_key: String,
    pub state: Option<String>,
    /// Tag key matched against `name`.
    pub tag_name: String,
    /// When several instances match, drop those carrying this tag key.
    pub ignore_tag_key: Option<String>,
}

impl InstanceQuery {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            return_key: "PublicIpAddress".to_string(),
            state: None,
            tag_name: "Name".to_string(),
            ignore_tag_key: None,
        }
    }

    pub fn with_return_key(mut self, key: impl Into<String>) -> Self {
        self.return_key = key.into();
        self
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn with_tag_name(mut self, tag_name: impl Into<String>) -> Self {
        self.tag_name = tag_name.into();
        self
    }

    pub fn ignoring_tag_key(mut self, key: impl Into<String>) -> Self {
        self.ignore_tag_key = Some(key.into());
        self
    }
}

fn state_filter(state: Option<&str>) -> Option<Filter> {
    state.map(|s| Filter::new("instance-state-name", [s]))
}

fn tag_filters(tags: &BTreeMap<String, String>, state: Option<&str>) -> Vec<Filter> {
    tags.iter()
        .map(|(k, v)| tag_filter(k, v.as_str()))
        .chain(state_filter(state))
        .collect()
}

fn flatten(client: &dyn CloudApi, filters: &[Filter]) -> LookupResult<Vec<Instance>> {
    Ok(client
        .describe_instances(filters)?
        .into_iter()
        .flat_map(|r| r.instances)
        .collect())
}

impl<P: Provider, S: Sleeper> Lookups<P, S> {
    /// `return_key` of every instance carrying all `tags`, optionally restricted to `state`.
    pub fn instances_by_tags(
        &self,
        tags: &BTreeMap<String, String>,
        state: Option<&str>,
        return_key: &str,
        scope: &Scope,
    ) -> LookupResult<Vec<Value>> {
        self.retrying(|| {
            let client = self.client(scope, Service::Ec2)?;
            let instances = flatten(client.as_ref(), &tag_filters(tags, state))?;
            Ok(instances.iter().map(|i| field(i, return_key)).collect())
        })
    }

    /// `return_key` of the single instance carrying all `tags`.
    pub fn instance_by_tags(
        &self,
        tags: &BTreeMap<String, String>,
        state: Option<&str>,
        return_key: &str,
        scope: &Scope,
    ) -> LookupResult<Value> {
        self.retrying(|| {
            let client = self.client(scope, Service::Ec2)?;
            let instances = flatten(client.as_ref(), &tag_filters(tags, state))?;
            let values: Vec<Value> = instances.iter().map(|i| field(i, return_key)).collect();
            exactly_one(
                values,
                || {
                    format!(
                        "No instances was found with the following tags {} in region {}",
                        fmt_tags(tags),
                        scope.region
                    )
                },
                |many| {
                    format!(
                        "More than 1 {} instance was found with the following tags {} in region {}",
                        Value::from(many.to_vec()),
                        fmt_tags(tags),
                        scope.region
                    )
                },
            )
        })
    }

    /// `return_key` of the single instance whose `tag_name` tag equals `name`.
    pub fn instance(&self, query: &InstanceQuery, scope: &Scope) -> LookupResult<Value> {
        self.retrying(|| {
            let client = self.client(scope, Service::Ec2)?;
            let filters: Vec<Filter> =
                std::iter::once(tag_filter(&query.tag_name, query.name.as_str()))
                    .chain(state_filter(query.state.as_deref()))
                    .collect();
            let mut instances = flatten(client.as_ref(), &filters)?;
            match instances.len() {
                0 => Err(LookupError::NotFound(format!(
                    "No instance was found with name {} in region {}",
                    query.name, scope.region
                ))),
                1 => Ok(field(&instances[0], &query.return_key)),
                _ => {
                    if let Some(key) = &query.ignore_tag_key {
                        instances.retain(|i| i.tag(key).is_none());
                        if let [only] = instances.as_slice() {
                            return Ok(field(only, &query.return_key));
                        }
                    }
                    Err(LookupError::Ambiguous(format!(
                        "More than 1 instance was found with name {} in region {}",
                        query.name, scope.region
                    )))
                }
            }
        })
    }

    /// Id of the instance named `name` in `state` (usually `running`).
    pub fn instance_id_by_name(&self, name: &str, state: &str, scope: &Scope) -> LookupResult<String> {
        let query = InstanceQuery::new(name)
            .with_return_key("InstanceId")
            .with_state(state);
        match self.instance(&query, scope)? {
            Value::String(id) => Ok(id),
            other => Err(LookupError::NotFound(format!(
                "Instance {name} has no id: {other}"
            ))),
        }
    }

    /// `Name` tag of the instance holding `ip`; `None` when that instance is untagged.
    pub fn instance_tag_name_by_ip(
        &self,
        ip: &str,
        ip_type: IpType,
        scope: &Scope,
    ) -> LookupResult<Option<String>> {
        self.retrying(|| {
            let client = self.client(scope, Service::Ec2)?;
            let filters = [Filter::new(ip_type.filter_name(), [ip])];
            let instance = flatten(client.as_ref(), &filters)?
                .into_iter()
                .next()
                .ok_or_else(|| {
                    LookupError::NotFound(format!(
                        "Could not retrieve tag name for {ip}: no matching instance"
                    ))
                })?;
            Ok(instance.name_tag().map(str::to_string))
        })
    }

    /// `Name` tags of every instance carrying all `tags`.
    pub fn instances_tag_name_by_tags(
        &self,
        tags: &BTreeMap<String, String>,
        state: Option<&str>,
        scope: &Scope,
    ) -> LookupResult<Vec<String>> {
        self.retrying(|| {
            let client = self.client(scope, Service::Ec2)?;
            let reservations = client.describe_instances(&tag_filters(tags, state))?;
            if reservations.is_empty() {
                return Err(LookupError::NotFound(format!(
                    "No instance was found with the following tags {} in region {}",
                    fmt_tags(tags),
                    scope.region
                )));
            }
            Ok(reservations
                .iter()
                .flat_map(|r| &r.instances)
                .filter_map(|i| i.name_tag().map(str::to_string))
                .collect())
        })
    }
}
