//! Filter registry.
//!
//! Maps the names templates use (`get_sg`, `zones`, `latest_ami_id`, ...) to
//! lookups. Arguments arrive as a JSON object and results leave as JSON, so
//! any front end can drive the registry without knowing lookup signatures.

mod args;

pub use args::{Defaults, FilterArgs};

use serde::Serialize;
use serde_json::Value;

use crate::cloud::Provider;
use crate::error::{LookupError, LookupResult};
use crate::lookup::{ImageQuery, ImageSort, InstanceQuery, Lookups, CANONICAL_OWNER};
use crate::retry::Sleeper;

/// Every registered filter name, sorted.
pub const FILTER_NAMES: &[&str] = &[
    "get_account_id",
    "get_acm_arn",
    "get_acm_arn_by_tag_name",
    "get_all_route_table_ids",
    "get_all_route_table_ids_except",
    "get_all_route_table_ids_except_vpc_names",
    "get_all_subnet_ids_in_route_table",
    "get_all_vpcs_info_except",
    "get_ami_image_id",
    "get_ami_images",
    "get_dynamodb_base_arn",
    "get_elasticache_endpoint",
    "get_instance",
    "get_instance_by_tags",
    "get_instance_id_by_name",
    "get_instance_profile",
    "get_instance_tag_name_by_ip",
    "get_instances_by_tags",
    "get_instances_tag_name_by_tags",
    "get_kinesis_stream_arn",
    "get_older_images",
    "get_rds_endpoint",
    "get_rds_hosted_zone_id",
    "get_route_table_ids",
    "get_server_certificate",
    "get_sg",
    "get_sg_by_tags",
    "get_sg_cidrs",
    "get_sg_ids_by_names",
    "get_sgs_by_tags",
    "get_sqs",
    "get_subnet_ids",
    "get_subnet_ids_by_tags",
    "get_subnet_ids_in_zone",
    "get_vpc_id_by_name",
    "get_vpc_ids_from_names",
    "latest_ami_id",
    "vpc_exists",
    "zones",
];

pub fn names() -> &'static [&'static str] {
    FILTER_NAMES
}

fn json<T: Serialize>(value: T) -> LookupResult<Value> {
    Ok(serde_json::to_value(value)?)
}

fn image_query(args: &FilterArgs) -> LookupResult<ImageQuery> {
    let mut query = ImageQuery::new(args.str("name")?)
        .with_arch(args.str_or("arch", "x86_64")?)
        .with_virtualization_type(args.str_or("virt_type", "hvm")?)
        .with_owner(args.str_or("owner", CANONICAL_OWNER)?);
    for (k, v) in args.tags("tags")? {
        query = query.with_tag(k, v);
    }
    if args.opt_bool("sort")?.unwrap_or(false) {
        let key = args.str_or("sort_by", "CreationDate")?.to_string();
        let sort = if args.opt_bool("sort_by_tag")?.unwrap_or(false) {
            ImageSort::Tag(key)
        } else {
            ImageSort::Attribute(key)
        };
        query = query.sorted_by(sort, args.str_or("order", "desc")?.parse()?);
    }
    if args.opt_bool("fail_if_empty")?.unwrap_or(false) {
        query = query.fail_if_empty();
    }
    Ok(query)
}

impl<P: Provider, S: Sleeper> Lookups<P, S> {
    /// Run the filter `name` with `args`; `region`/`profile` fall back to `defaults`.
    pub fn invoke(&self, name: &str, args: &FilterArgs, defaults: &Defaults) -> LookupResult<Value> {
        if !FILTER_NAMES.contains(&name) {
            return Err(LookupError::UnknownFilter(name.to_string()));
        }
        let scope = args.scope(defaults)?;
        let s = &scope;
        tracing::debug!("invoking {} in {}", name, s.region);

        match name {
            "get_vpc_id_by_name" => json(self.vpc_id_by_name(args.str("name")?, s)?),
            "vpc_exists" => json(self.vpc_exists(args.str("name")?, s)),
            "get_vpc_ids_from_names" => json(self.vpc_ids_from_names(&args.str_list("vpc_names")?, s)?),
            "get_all_vpcs_info_except" => {
                json(self.all_vpcs_info_except(&args.str_list("except_ids")?, s)?)
            }
            "get_subnet_ids" => json(self.subnet_ids(
                args.str("vpc_id")?,
                &args.str_list("cidrs")?,
                s,
            )?),
            "get_subnet_ids_in_zone" => {
                json(self.subnet_ids_in_zone(args.str("vpc_id")?, args.str("zone")?, s)?)
            }
            "get_subnet_ids_by_tags" => json(self.subnet_ids_by_tags(
                args.str("vpc_id")?,
                &args.multi_tags("tags")?,
                s,
            )?),
            "get_route_table_ids" => json(self.route_table_ids(
                args.str("vpc_id")?,
                args.opt_bool("main")?.unwrap_or(false),
                s,
            )?),
            "get_all_route_table_ids" => json(self.all_route_table_ids(s)?),
            "get_all_route_table_ids_except" => {
                json(self.all_route_table_ids_except(args.str("vpc_id")?, s)?)
            }
            "get_all_route_table_ids_except_vpc_names" => {
                json(self.all_route_table_ids_except_vpc_names(&args.str_list("vpc_names")?, s)?)
            }
            "get_all_subnet_ids_in_route_table" => {
                json(self.subnet_ids_in_route_table(args.str("route_table_id")?, s)?)
            }
            "zones" => json(self.zones(s)?),

            "get_sg" => json(self.sg(args.str("name")?, args.str("vpc_id")?, s)?),
            "get_sg_ids_by_names" => {
                json(self.sg_ids_by_names(&args.str_list("names")?, args.str("vpc_id")?, s)?)
            }
            "get_sg_cidrs" => json(self.sg_cidrs(args.str("name")?, args.str("vpc_id")?, s)?),
            "get_sgs_by_tags" => json(self.sgs_by_tags(
                &args.tags("tags")?,
                args.str_or("return_key", "GroupId")?,
                s,
            )?),
            "get_sg_by_tags" => json(self.sg_by_tags(
                &args.tags("tags")?,
                args.str_or("return_key", "GroupId")?,
                s,
            )?),

            "get_instances_by_tags" => json(self.instances_by_tags(
                &args.tags("tags")?,
                args.opt_str("state")?,
                args.str_or("return_key", "PrivateIpAddress")?,
                s,
            )?),
            "get_instance_by_tags" => json(self.instance_by_tags(
                &args.tags("tags")?,
                args.opt_str("state")?,
                args.str_or("return_key", "PrivateIpAddress")?,
                s,
            )?),
            "get_instance" => {
                let mut query = InstanceQuery::new(args.str("name")?)
                    .with_return_key(args.str_or("return_key", "PublicIpAddress")?)
                    .with_tag_name(args.str_or("tag_name", "Name")?);
                if let Some(state) = args.opt_str("state")? {
                    query = query.with_state(state);
                }
                if let Some(key) = args.opt_str("ignore_tag_key")? {
                    query = query.ignoring_tag_key(key);
                }
                json(self.instance(&query, s)?)
            }
            "get_instance_id_by_name" => json(self.instance_id_by_name(
                args.str("name")?,
                args.str_or("state", "running")?,
                s,
            )?),
            "get_instance_tag_name_by_ip" => json(self.instance_tag_name_by_ip(
                args.str("ip")?,
                args.str_or("ip_type", "private")?.parse()?,
                s,
            )?),
            "get_instances_tag_name_by_tags" => json(self.instances_tag_name_by_tags(
                &args.tags("tags")?,
                args.opt_str("state")?,
                s,
            )?),

            "get_ami_images" => json(self.ami_images(&image_query(args)?, s)?),
            "get_ami_image_id" => json(self.ami_image_id(&image_query(args)?, s)?),
            "latest_ami_id" => json(self.latest_ami_id(
                args.str("name")?,
                args.str_or("ami_owner_id", CANONICAL_OWNER)?,
                s,
            )?),
            "get_older_images" => json(self.older_images(
                &image_query(args)?,
                args.opt_str("exclude_ami")?,
                args.opt_bool("exclude_archived")?.unwrap_or(true),
                s,
            )?),

            "get_account_id" => json(self.account_id(s)?),
            "get_instance_profile" => json(self.instance_profile(args.str("name")?, s)?),
            "get_server_certificate" => json(self.server_certificate(args.str("name")?, s)?),

            "get_sqs" => json(self.sqs(
                args.str("name")?,
                args.str_or("key", "arn")?.parse()?,
                s,
            )?),
            "get_dynamodb_base_arn" => json(self.dynamodb_base_arn(s)?),
            "get_kinesis_stream_arn" => {
                json(self.kinesis_stream_arn(args.str("stream_name")?, s)?)
            }
            "get_rds_endpoint" => json(self.rds_endpoint(args.str("instance_name")?, s)?),
            "get_rds_hosted_zone_id" => {
                json(self.rds_hosted_zone_id(args.str("instance_name")?, s)?)
            }
            "get_elasticache_endpoint" => json(self.elasticache_endpoint(args.str("name")?, s)?),

            "get_acm_arn" => json(self.acm_arn(args.str("domain_name")?, s)?),
            "get_acm_arn_by_tag_name" => json(self.acm_arn_by_tag_name(args.str("tag_name")?, s)?),

            other => Err(LookupError::UnknownFilter(other.to_string())),
        }
    }
}
