//! VPC, subnet, route table and availability zone lookups.

use regex::RegexBuilder;
use serde::Serialize;
use std::collections::BTreeMap;

use super::{Lookups, Scope};
use crate::cloud::{Filter, Provider, Service, Subnet, Tagged};
use crate::error::{LookupError, LookupResult};
use crate::retry::Sleeper;

/// Summary of a non-default VPC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VpcInfo {
    pub name: String,
    pub id: String,
    pub cidr: String,
}

const VPC_MISSING: &str = "does not exist";

fn subnet_ids_by_zone(mut subnets: Vec<Subnet>) -> LookupResult<Vec<String>> {
    if subnets.is_empty() {
        return Err(LookupError::NotFound("No subnets were found".into()));
    }
    subnets.sort_by(|a, b| a.availability_zone.cmp(&b.availability_zone));
    Ok(subnets.into_iter().map(|s| s.subnet_id).collect())
}

fn not_main() -> Filter {
    Filter::new("association.main", ["false"])
}

impl<P: Provider, S: Sleeper> Lookups<P, S> {
    /// Id of the first VPC whose `Name` tag equals `name`.
    pub fn vpc_id_by_name(&self, name: &str, scope: &Scope) -> LookupResult<String> {
        self.retrying(|| {
            let client = self.client(scope, Service::Ec2)?;
            let filters = [
                Filter::new("tag-key", ["Name"]),
                Filter::new("tag-value", [name]),
            ];
            client
                .describe_vpcs(&filters)?
                .into_iter()
                .next()
                .map(|v| v.vpc_id)
                .ok_or_else(|| {
                    LookupError::NotFound(format!(
                        "VPC ID for VPC name {name} was not found in region {}",
                        scope.region
                    ))
                })
        })
    }

    /// VPC id for `name`, or the literal `"does not exist"` when the lookup fails for any reason.
    pub fn vpc_exists(&self, name: &str, scope: &Scope) -> String {
        match self.vpc_id_by_name(name, scope) {
            Ok(id) => id,
            Err(e) => {
                tracing::debug!("vpc {} treated as missing: {}", name, e);
                VPC_MISSING.to_string()
            }
        }
    }

    /// Ids of VPCs whose `Name` tag matches any of `names` (case-insensitive regex search).
    pub fn vpc_ids_from_names(&self, names: &[String], scope: &Scope) -> LookupResult<Vec<String>> {
        let patterns = names
            .iter()
            .map(|n| {
                RegexBuilder::new(n)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| LookupError::InvalidArgument(format!("bad VPC name pattern {n}: {e}")))
            })
            .collect::<LookupResult<Vec<_>>>()?;
        self.retrying(|| {
            let client = self.client(scope, Service::Ec2)?;
            Ok(client
                .describe_vpcs(&[])?
                .into_iter()
                .filter(|vpc| {
                    vpc.name_tag()
                        .is_some_and(|name| patterns.iter().any(|p| p.is_match(name)))
                })
                .map(|vpc| vpc.vpc_id)
                .collect())
        })
    }

    /// Available, non-default VPCs except those in `except_ids`.
    pub fn all_vpcs_info_except(
        &self,
        except_ids: &[String],
        scope: &Scope,
    ) -> LookupResult<Vec<VpcInfo>> {
        self.retrying(|| {
            let client = self.client(scope, Service::Ec2)?;
            let filters = [
                Filter::new("state", ["available"]),
                Filter::new("isDefault", ["false"]),
            ];
            let info: Vec<VpcInfo> = client
                .describe_vpcs(&filters)?
                .into_iter()
                .filter(|vpc| !except_ids.contains(&vpc.vpc_id))
                .map(|vpc| VpcInfo {
                    name: vpc.name_tag().unwrap_or_default().to_string(),
                    id: vpc.vpc_id,
                    cidr: vpc.cidr_block,
                })
                .collect();
            if info.is_empty() {
                return Err(LookupError::NotFound("No vpcs were found".into()));
            }
            Ok(info)
        })
    }

    /// Subnet ids in `vpc_id` whose CIDR is one of `cidrs`, ordered by availability zone.
    pub fn subnet_ids(
        &self,
        vpc_id: &str,
        cidrs: &[String],
        scope: &Scope,
    ) -> LookupResult<Vec<String>> {
        self.retrying(|| {
            let client = self.client(scope, Service::Ec2)?;
            let filters = [
                Filter::new("vpc-id", [vpc_id]),
                Filter::new("cidrBlock", cidrs),
            ];
            subnet_ids_by_zone(client.describe_subnets(&filters)?)
        })
    }

    /// Subnet ids in `vpc_id` within availability zone `zone`.
    pub fn subnet_ids_in_zone(
        &self,
        vpc_id: &str,
        zone: &str,
        scope: &Scope,
    ) -> LookupResult<Vec<String>> {
        self.retrying(|| {
            let client = self.client(scope, Service::Ec2)?;
            let filters = [
                Filter::new("vpc-id", [vpc_id]),
                Filter::new("availabilityZone", [zone]),
            ];
            let subnets = client.describe_subnets(&filters)?;
            if subnets.is_empty() {
                return Err(LookupError::NotFound("No subnets were found".into()));
            }
            Ok(subnets.into_iter().map(|s| s.subnet_id).collect())
        })
    }

    /// Subnet ids in `vpc_id` carrying all `tags` (each tag may accept several values).
    pub fn subnet_ids_by_tags(
        &self,
        vpc_id: &str,
        tags: &BTreeMap<String, Vec<String>>,
        scope: &Scope,
    ) -> LookupResult<Vec<String>> {
        self.retrying(|| {
            let client = self.client(scope, Service::Ec2)?;
            let mut filters = vec![Filter::new("vpc-id", [vpc_id])];
            filters.extend(
                tags.iter()
                    .map(|(k, values)| Filter::new(format!("tag:{k}"), values)),
            );
            subnet_ids_by_zone(client.describe_subnets(&filters)?)
        })
    }

    /// Route table ids in `vpc_id`, main or non-main.
    pub fn route_table_ids(
        &self,
        vpc_id: &str,
        main: bool,
        scope: &Scope,
    ) -> LookupResult<Vec<String>> {
        self.retrying(|| {
            let client = self.client(scope, Service::Ec2)?;
            let filters = [
                Filter::new("vpc-id", [vpc_id]),
                Filter::new("association.main", [main.to_string()]),
            ];
            Ok(client
                .describe_route_tables(&[], &filters)?
                .into_iter()
                .map(|rt| rt.route_table_id)
                .collect())
        })
    }

    /// All non-main route table ids in the region.
    pub fn all_route_table_ids(&self, scope: &Scope) -> LookupResult<Vec<String>> {
        self.retrying(|| {
            let client = self.client(scope, Service::Ec2)?;
            Ok(client
                .describe_route_tables(&[], &[not_main()])?
                .into_iter()
                .map(|rt| rt.route_table_id)
                .collect())
        })
    }

    /// Non-main route table ids outside `vpc_id`.
    pub fn all_route_table_ids_except(&self, vpc_id: &str, scope: &Scope) -> LookupResult<Vec<String>> {
        self.route_tables_outside(&[vpc_id.to_string()], scope)
    }

    /// Non-main route table ids outside the VPCs matching `vpc_names`.
    pub fn all_route_table_ids_except_vpc_names(
        &self,
        vpc_names: &[String],
        scope: &Scope,
    ) -> LookupResult<Vec<String>> {
        let vpc_ids = self.vpc_ids_from_names(vpc_names, scope)?;
        self.route_tables_outside(&vpc_ids, scope)
    }

    fn route_tables_outside(&self, vpc_ids: &[String], scope: &Scope) -> LookupResult<Vec<String>> {
        self.retrying(|| {
            let client = self.client(scope, Service::Ec2)?;
            let ids: Vec<String> = client
                .describe_route_tables(&[], &[not_main()])?
                .into_iter()
                .filter(|rt| !vpc_ids.contains(&rt.vpc_id))
                .map(|rt| rt.route_table_id)
                .collect();
            if ids.is_empty() {
                return Err(LookupError::NotFound("No routes were found".into()));
            }
            Ok(ids)
        })
    }

    /// Subnet ids explicitly associated with `route_table_id`.
    pub fn subnet_ids_in_route_table(
        &self,
        route_table_id: &str,
        scope: &Scope,
    ) -> LookupResult<Vec<String>> {
        self.retrying(|| {
            let client = self.client(scope, Service::Ec2)?;
            Ok(client
                .describe_route_tables(&[route_table_id.to_string()], &[])?
                .into_iter()
                .flat_map(|rt| rt.associations)
                .filter_map(|a| a.subnet_id)
                .collect())
        })
    }

    /// Availability zone names of the region, sorted.
    pub fn zones(&self, scope: &Scope) -> LookupResult<Vec<String>> {
        self.retrying(|| {
            let client = self.client(scope, Service::Ec2)?;
            let mut names: Vec<String> = client
                .describe_availability_zones()?
                .into_iter()
                .map(|z| z.zone_name)
                .collect();
            names.sort();
            Ok(names)
        })
    }
}
