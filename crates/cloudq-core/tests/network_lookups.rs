//! VPC, subnet, route table and zone lookups against the fixture inventory.

mod common;

use cloudq_core::lookup::{Scope, VpcInfo};
use cloudq_core::LookupError;
use std::collections::BTreeMap;

fn names(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

#[test]
fn vpc_id_by_name_matches_name_tag() {
    let l = common::lookups();
    assert_eq!(l.vpc_id_by_name("production", &common::scope()).unwrap(), "vpc-prod");

    let err = l.vpc_id_by_name("missing", &common::scope()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "VPC ID for VPC name missing was not found in region us-west-2"
    );
}

#[test]
fn vpc_exists_turns_failure_into_marker() {
    let l = common::lookups();
    assert_eq!(l.vpc_exists("production", &common::scope()), "vpc-prod");
    assert_eq!(l.vpc_exists("missing", &common::scope()), "does not exist");
    assert_eq!(l.vpc_exists("production", &Scope::new("ap-south-1")), "does not exist");
}

#[test]
fn vpc_ids_from_names_is_case_insensitive_search() {
    let l = common::lookups();
    let s = common::scope();
    assert_eq!(l.vpc_ids_from_names(&names(&["staging"]), &s).unwrap(), ["vpc-stage"]);
    assert_eq!(
        l.vpc_ids_from_names(&names(&["prod", "^stag"]), &s).unwrap(),
        ["vpc-prod", "vpc-stage"]
    );
    assert!(l.vpc_ids_from_names(&names(&["qa"]), &s).unwrap().is_empty());
    assert!(matches!(
        l.vpc_ids_from_names(&names(&["("]), &s),
        Err(LookupError::InvalidArgument(_))
    ));
}

#[test]
fn all_vpcs_info_skips_default_and_excluded() {
    let l = common::lookups();
    let info = l
        .all_vpcs_info_except(&names(&["vpc-stage"]), &common::scope())
        .unwrap();
    assert_eq!(
        info,
        [
            VpcInfo {
                name: "production".into(),
                id: "vpc-prod".into(),
                cidr: "10.0.0.0/16".into()
            },
            VpcInfo {
                name: String::new(),
                id: "vpc-scratch".into(),
                cidr: "10.2.0.0/16".into()
            },
        ]
    );

    let err = l
        .all_vpcs_info_except(&names(&["vpc-prod", "vpc-stage", "vpc-scratch"]), &common::scope())
        .unwrap_err();
    assert!(matches!(err, LookupError::NotFound(m) if m == "No vpcs were found"));
}

#[test]
fn subnet_ids_are_ordered_by_zone() {
    let l = common::lookups();
    let s = common::scope();
    let ids = l
        .subnet_ids("vpc-prod", &names(&["10.0.3.0/24", "10.0.1.0/24"]), &s)
        .unwrap();
    assert_eq!(ids, ["subnet-a", "subnet-c"]);

    let err = l.subnet_ids("vpc-prod", &names(&["10.9.0.0/24"]), &s).unwrap_err();
    assert!(matches!(err, LookupError::NotFound(m) if m == "No subnets were found"));
}

#[test]
fn subnet_ids_in_zone_filters_by_zone() {
    let l = common::lookups();
    let s = common::scope();
    assert_eq!(l.subnet_ids_in_zone("vpc-prod", "us-west-2b", &s).unwrap(), ["subnet-b"]);
    assert!(matches!(
        l.subnet_ids_in_zone("vpc-stage", "us-west-2c", &s),
        Err(LookupError::NotFound(_))
    ));
}

#[test]
fn subnet_ids_by_tags_accepts_value_lists() {
    let l = common::lookups();
    let s = common::scope();
    let mut tags = BTreeMap::new();
    tags.insert("tier".to_string(), names(&["web"]));
    assert_eq!(
        l.subnet_ids_by_tags("vpc-prod", &tags, &s).unwrap(),
        ["subnet-a", "subnet-c"]
    );

    tags.insert("tier".to_string(), names(&["web", "db"]));
    assert_eq!(
        l.subnet_ids_by_tags("vpc-prod", &tags, &s).unwrap(),
        ["subnet-a", "subnet-b", "subnet-c"]
    );

    tags.insert("tier".to_string(), names(&["cache"]));
    assert!(l.subnet_ids_by_tags("vpc-prod", &tags, &s).is_err());
}

#[test]
fn route_tables_by_main_flag() {
    let l = common::lookups();
    let s = common::scope();
    assert_eq!(l.route_table_ids("vpc-prod", false, &s).unwrap(), ["rtb-prod-a"]);
    assert_eq!(l.route_table_ids("vpc-prod", true, &s).unwrap(), ["rtb-main"]);
    assert!(l.route_table_ids("vpc-scratch", false, &s).unwrap().is_empty());
    assert_eq!(l.all_route_table_ids(&s).unwrap(), ["rtb-prod-a", "rtb-stage"]);
}

#[test]
fn route_tables_outside_vpcs() {
    let l = common::lookups();
    let s = common::scope();
    assert_eq!(l.all_route_table_ids_except("vpc-prod", &s).unwrap(), ["rtb-stage"]);
    assert_eq!(
        l.all_route_table_ids_except_vpc_names(&names(&["PRODUCTION"]), &s)
            .unwrap(),
        ["rtb-stage"]
    );
    let err = l
        .all_route_table_ids_except_vpc_names(&names(&["prod", "staging"]), &s)
        .unwrap_err();
    assert!(matches!(err, LookupError::NotFound(m) if m == "No routes were found"));
}

#[test]
fn subnets_in_route_table_skip_main_association() {
    let l = common::lookups();
    let s = common::scope();
    assert_eq!(
        l.subnet_ids_in_route_table("rtb-prod-a", &s).unwrap(),
        ["subnet-a", "subnet-b"]
    );
    assert!(l.subnet_ids_in_route_table("rtb-main", &s).unwrap().is_empty());
}

#[test]
fn zones_are_sorted_per_region() {
    let l = common::lookups();
    assert_eq!(
        l.zones(&common::scope()).unwrap(),
        ["us-west-2a", "us-west-2b", "us-west-2c"]
    );
    assert_eq!(l.zones(&Scope::new("eu-west-1")).unwrap(), ["eu-west-1a"]);
}
