//! Security group lookups.

use serde_json::Value;
use std::collections::BTreeMap;

use super::{exactly_one, field, fmt_tags, Lookups, Scope};
use crate::cloud::{tag_filter, CloudApi, Filter, Provider, Service};
use crate::error::{LookupError, LookupResult};
use crate::retry::Sleeper;

impl<P: Provider, S: Sleeper> Lookups<P, S> {
    /// Id of the security group named `name` in `vpc_id`.
    pub fn sg(&self, name: &str, vpc_id: &str, scope: &Scope) -> LookupResult<String> {
        self.retrying(|| {
            let client = self.client(scope, Service::Ec2)?;
            let ids = sg_ids_by_names(client.as_ref(), &[name.to_string()], vpc_id)?;
            exactly_one(
                ids,
                || format!("Security group {name} was not found"),
                |_| format!("Too many results for {name}"),
            )
        })
    }

    /// Ids of the security groups in `vpc_id` whose group name is one of `names`.
    pub fn sg_ids_by_names(
        &self,
        names: &[String],
        vpc_id: &str,
        scope: &Scope,
    ) -> LookupResult<Vec<String>> {
        self.retrying(|| {
            let client = self.client(scope, Service::Ec2)?;
            sg_ids_by_names(client.as_ref(), names, vpc_id)
        })
    }

    /// CIDR ranges of the first ingress permission of the group tagged `Name=name`.
    ///
    /// A group without ingress permissions yields an empty list.
    pub fn sg_cidrs(&self, name: &str, vpc_id: &str, scope: &Scope) -> LookupResult<Vec<String>> {
        self.retrying(|| {
            let client = self.client(scope, Service::Ec2)?;
            let filters = [
                Filter::new("tag-key", ["Name"]),
                Filter::new("tag-value", [name]),
                Filter::new("vpc-id", [vpc_id]),
            ];
            let group = exactly_one(
                client.describe_security_groups(&filters)?,
                || format!("Security Group {name} was not found"),
                |many| {
                    let ids: Vec<&str> = many.iter().map(|g| g.group_id.as_str()).collect();
                    format!("Too many results for {name}: {}", ids.join(","))
                },
            )?;
            Ok(group
                .ip_permissions
                .into_iter()
                .next()
                .map(|perm| perm.ip_ranges.into_iter().map(|r| r.cidr_ip).collect())
                .unwrap_or_default())
        })
    }

    /// `return_key` of every security group carrying all `tags`.
    pub fn sgs_by_tags(
        &self,
        tags: &BTreeMap<String, String>,
        return_key: &str,
        scope: &Scope,
    ) -> LookupResult<Vec<Value>> {
        self.retrying(|| {
            let client = self.client(scope, Service::Ec2)?;
            sgs_by_tags(client.as_ref(), tags, return_key, &scope.region)
        })
    }

    /// `return_key` of the single security group carrying all `tags`.
    pub fn sg_by_tags(
        &self,
        tags: &BTreeMap<String, String>,
        return_key: &str,
        scope: &Scope,
    ) -> LookupResult<Value> {
        self.retrying(|| {
            let client = self.client(scope, Service::Ec2)?;
            let values = sgs_by_tags(client.as_ref(), tags, return_key, &scope.region)?;
            exactly_one(
                values,
                || no_group_with_tags(tags, &scope.region),
                |_| {
                    format!(
                        "More than 1 security groups was found with tag {} in region {}",
                        fmt_tags(tags),
                        scope.region
                    )
                },
            )
        })
    }
}

fn no_group_with_tags(tags: &BTreeMap<String, String>, region: &str) -> String {
    format!(
        "No security group was found with tag {} in region {region}",
        fmt_tags(tags)
    )
}

fn sg_ids_by_names(
    client: &dyn CloudApi,
    names: &[String],
    vpc_id: &str,
) -> LookupResult<Vec<String>> {
    let filters = [
        Filter::new("vpc-id", [vpc_id]),
        Filter::new("group-name", names),
    ];
    let groups = client.describe_security_groups(&filters)?;
    if groups.is_empty() {
        return Err(LookupError::NotFound(format!(
            "Security group {names:?} was not found"
        )));
    }
    Ok(groups.into_iter().map(|g| g.group_id).collect())
}

fn sgs_by_tags(
    client: &dyn CloudApi,
    tags: &BTreeMap<String, String>,
    return_key: &str,
    region: &str,
) -> LookupResult<Vec<Value>> {
    let filters: Vec<Filter> = tags.iter().map(|(k, v)| tag_filter(k, v.as_str())).collect();
    let groups = client.describe_security_groups(&filters)?;
    if groups.is_empty() {
        return Err(LookupError::NotFound(no_group_with_tags(tags, region)));
    }
    Ok(groups.iter().map(|g| field(g, return_key)).collect())
}
