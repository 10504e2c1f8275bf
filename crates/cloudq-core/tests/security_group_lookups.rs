mod common;

use cloudq_core::LookupError;
use serde_json::json;
use std::collections::BTreeMap;

fn tags(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn sg_resolves_group_name_within_vpc() {
    let l = common::lookups();
    let s = common::scope();
    assert_eq!(l.sg("web", "vpc-prod", &s).unwrap(), "sg-web");
    assert_eq!(l.sg("web", "vpc-stage", &s).unwrap(), "sg-stage-web");

    let err = l.sg("nope", "vpc-prod", &s).unwrap_err();
    assert_eq!(err.to_string(), r#"Security group ["nope"] was not found"#);
}

#[test]
fn sg_ids_by_names_returns_every_match() {
    let l = common::lookups();
    let ids = l
        .sg_ids_by_names(&["web".to_string(), "db".to_string()], "vpc-prod", &common::scope())
        .unwrap();
    assert_eq!(ids, ["sg-web", "sg-db"]);
}

#[test]
fn sg_cidrs_reads_first_permission() {
    let l = common::lookups();
    let s = common::scope();
    assert_eq!(
        l.sg_cidrs("web-elb", "vpc-prod", &s).unwrap(),
        ["10.0.0.0/8", "192.168.0.0/16"]
    );
    assert!(l.sg_cidrs("db", "vpc-prod", &s).unwrap().is_empty());

    let err = l.sg_cidrs("dup", "vpc-prod", &s).unwrap_err();
    assert!(matches!(err, LookupError::Ambiguous(m) if m == "Too many results for dup: sg-dup1,sg-dup2"));

    let err = l.sg_cidrs("nope", "vpc-prod", &s).unwrap_err();
    assert!(matches!(err, LookupError::NotFound(m) if m == "Security Group nope was not found"));
}

#[test]
fn sgs_by_tags_projects_return_key() {
    let l = common::lookups();
    let s = common::scope();
    let prod = tags(&[("env", "prod")]);
    assert_eq!(
        l.sgs_by_tags(&prod, "GroupId", &s).unwrap(),
        [json!("sg-web"), json!("sg-db")]
    );
    assert_eq!(
        l.sgs_by_tags(&prod, "GroupName", &s).unwrap(),
        [json!("web"), json!("db")]
    );
    assert_eq!(l.sgs_by_tags(&prod, "Missing", &s).unwrap(), [json!(null), json!(null)]);

    let err = l.sgs_by_tags(&tags(&[("env", "qa")]), "GroupId", &s).unwrap_err();
    assert_eq!(
        err.to_string(),
        r#"No security group was found with tag {env="qa"} in region us-west-2"#
    );
}

#[test]
fn sg_by_tags_requires_single_group() {
    let l = common::lookups();
    let s = common::scope();
    let web = tags(&[("env", "prod"), ("service", "web")]);
    assert_eq!(l.sg_by_tags(&web, "GroupId", &s).unwrap(), json!("sg-web"));

    let err = l.sg_by_tags(&tags(&[("env", "prod")]), "GroupId", &s).unwrap_err();
    assert!(matches!(err, LookupError::Ambiguous(m) if m.starts_with("More than 1 security groups")));
}
