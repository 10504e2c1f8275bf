//! EC2-style filter evaluation over inventory records.

use regex::Regex;

use crate::cloud::{ClientError, Filter, Image, Instance, RouteTable, SecurityGroup, Subnet, Tagged, Vpc};

/// A record type that can be narrowed by named filters.
pub(crate) trait Filterable: Tagged {
    /// Filter names understood besides the generic tag filters.
    const FILTERS: &'static [&'static str];

    /// Values of the record for a supported filter name.
    fn filter_values(&self, name: &str) -> Vec<String>;
}

fn supports<R: Filterable>(name: &str) -> bool {
    name == "tag-key" || name == "tag-value" || name.starts_with("tag:") || R::FILTERS.contains(&name)
}

/// Match `value` against a pattern where `*` is any run and `?` any one character.
pub(crate) fn wildcard_match(pattern: &str, value: &str) -> bool {
    if !pattern.contains(['*', '?']) {
        return pattern == value;
    }
    let mut re = String::with_capacity(pattern.len() + 8);
    re.push('^');
    for ch in pattern.chars() {
        match ch {
            '*' => re.push_str(".*"),
            '?' => re.push('.'),
            c => re.push_str(&regex::escape(c.encode_utf8(&mut [0u8; 4]))),
        }
    }
    re.push('$');
    Regex::new(&re).map(|r| r.is_match(value)).unwrap_or(false)
}

fn record_values<R: Filterable>(record: &R, name: &str) -> Vec<String> {
    match name {
        "tag-key" => record.tags().iter().map(|t| t.key.clone()).collect(),
        "tag-value" => record.tags().iter().map(|t| t.value.clone()).collect(),
        _ => match name.strip_prefix("tag:") {
            Some(key) => record.tag(key).map(str::to_string).into_iter().collect(),
            None => record.filter_values(name),
        },
    }
}

pub(crate) fn matches<R: Filterable>(record: &R, filters: &[Filter]) -> bool {
    filters.iter().all(|f| {
        let actual = record_values(record, &f.name);
        f.values
            .iter()
            .any(|pattern| actual.iter().any(|v| wildcard_match(pattern, v)))
    })
}

/// Reject filter names the record type does not know, as the provider does.
pub(crate) fn validate<R: Filterable>(operation: &str, filters: &[Filter]) -> Result<(), ClientError> {
    match filters.iter().find(|f| !supports::<R>(&f.name)) {
        Some(bad) => Err(ClientError::new(
            operation,
            "InvalidParameterValue",
            format!("The filter '{}' is invalid", bad.name),
        )),
        None => Ok(()),
    }
}

/// Clone the records matching every filter.
pub(crate) fn select<R: Filterable + Clone>(
    operation: &str,
    records: &[R],
    filters: &[Filter],
) -> Result<Vec<R>, ClientError> {
    validate::<R>(operation, filters)?;
    Ok(records
        .iter()
        .filter(|r| matches(*r, filters))
        .cloned()
        .collect())
}

fn opt(v: &Option<String>) -> Vec<String> {
    v.iter().cloned().collect()
}

impl Filterable for Vpc {
    const FILTERS: &'static [&'static str] = &[
        "vpc-id",
        "state",
        "isDefault",
        "is-default",
        "cidr",
        "cidrBlock",
        "cidr-block",
    ];

    fn filter_values(&self, name: &str) -> Vec<String> {
        match name {
            "vpc-id" => vec![self.vpc_id.clone()],
            "state" => vec![self.state.clone()],
            "isDefault" | "is-default" => vec![self.is_default.to_string()],
            "cidr" | "cidrBlock" | "cidr-block" => vec![self.cidr_block.clone()],
            _ => Vec::new(),
        }
    }
}

impl Filterable for Subnet {
    const FILTERS: &'static [&'static str] = &[
        "vpc-id",
        "subnet-id",
        "availabilityZone",
        "availability-zone",
        "cidrBlock",
        "cidr-block",
    ];

    fn filter_values(&self, name: &str) -> Vec<String> {
        match name {
            "vpc-id" => vec![self.vpc_id.clone()],
            "subnet-id" => vec![self.subnet_id.clone()],
            "availabilityZone" | "availability-zone" => vec![self.availability_zone.clone()],
            "cidrBlock" | "cidr-block" => vec![self.cidr_block.clone()],
            _ => Vec::new(),
        }
    }
}

impl Filterable for SecurityGroup {
    const FILTERS: &'static [&'static str] = &["vpc-id", "group-name", "group-id"];

    fn filter_values(&self, name: &str) -> Vec<String> {
        match name {
            "vpc-id" => vec![self.vpc_id.clone()],
            "group-name" => vec![self.group_name.clone()],
            "group-id" => vec![self.group_id.clone()],
            _ => Vec::new(),
        }
    }
}

impl Filterable for Instance {
    const FILTERS: &'static [&'static str] = &[
        "instance-id",
        "instance-state-name",
        "instance-type",
        "image-id",
        "vpc-id",
        "private-ip-address",
        "ip-address",
    ];

    fn filter_values(&self, name: &str) -> Vec<String> {
        match name {
            "instance-id" => vec![self.instance_id.clone()],
            "instance-state-name" => vec![self.state.name.clone()],
            "instance-type" => opt(&self.instance_type),
            "image-id" => opt(&self.image_id),
            "vpc-id" => opt(&self.vpc_id),
            "private-ip-address" => opt(&self.private_ip_address),
            "ip-address" => opt(&self.public_ip_address),
            _ => Vec::new(),
        }
    }
}

impl Filterable for RouteTable {
    const FILTERS: &'static [&'static str] = &[
        "vpc-id",
        "route-table-id",
        "association.main",
        "association.subnet-id",
    ];

    fn filter_values(&self, name: &str) -> Vec<String> {
        match name {
            "vpc-id" => vec![self.vpc_id.clone()],
            "route-table-id" => vec![self.route_table_id.clone()],
            "association.main" => self
                .associations
                .iter()
                .map(|a| a.main.to_string())
                .collect(),
            "association.subnet-id" => self
                .associations
                .iter()
                .filter_map(|a| a.subnet_id.clone())
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl Filterable for Image {
    const FILTERS: &'static [&'static str] = &[
        "image-id",
        "name",
        "owner-id",
        "architecture",
        "virtualization-type",
    ];

    fn filter_values(&self, name: &str) -> Vec<String> {
        match name {
            "image-id" => vec![self.image_id.clone()],
            "name" => vec![self.name.clone()],
            "owner-id" => vec![self.owner_id.clone()],
            "architecture" => vec![self.architecture.clone()],
            "virtualization-type" => vec![self.virtualization_type.clone()],
            _ => Vec::new(),
        }
    }
}
