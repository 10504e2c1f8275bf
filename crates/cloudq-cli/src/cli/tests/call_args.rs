use crate::cli::commands::{build_args, parse_arg, run_call, CallOptions};
use cloudq_core::config::CloudqConfig;
use serde_json::json;
use std::fs;

#[test]
fn arg_values_are_json_when_possible() {
    assert_eq!(parse_arg("main=true").unwrap(), ("main".to_string(), json!(true)));
    assert_eq!(
        parse_arg(r#"tags={"env":"prod"}"#).unwrap().1,
        json!({"env": "prod"})
    );
    assert_eq!(parse_arg("name=web").unwrap().1, json!("web"));
    assert_eq!(parse_arg("expr=a=b").unwrap(), ("expr".to_string(), json!("a=b")));
    assert!(parse_arg("novalue").is_err());
    assert!(parse_arg("=x").is_err());
}

#[test]
fn args_override_json_object() {
    let opts = CallOptions {
        filter: "get_sg".into(),
        json: Some(r#"{"name": "db", "vpc_id": "vpc-prod"}"#.into()),
        args: vec!["name=web".into()],
        ..Default::default()
    };
    let args = build_args(&opts).unwrap();
    assert_eq!(args.str("name").unwrap(), "web");
    assert_eq!(args.str("vpc_id").unwrap(), "vpc-prod");
}

#[test]
fn bad_json_is_rejected() {
    let opts = CallOptions {
        json: Some("{nope".into()),
        ..Default::default()
    };
    assert!(build_args(&opts).is_err());
    let opts = CallOptions {
        json: Some("[1, 2]".into()),
        ..Default::default()
    };
    assert!(build_args(&opts).is_err());
}

#[test]
fn call_requires_an_inventory() {
    let opts = CallOptions {
        filter: "zones".into(),
        ..Default::default()
    };
    let err = run_call(&CloudqConfig::default(), &opts).unwrap_err();
    assert!(err.to_string().contains("no inventory configured"));
}

#[test]
fn call_runs_against_inventory_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("inventory.json");
    fs::write(
        &path,
        r#"{"regions": {"us-west-2": {"AvailabilityZones": [{"ZoneName": "us-west-2a"}]}}}"#,
    )
    .unwrap();
    let opts = CallOptions {
        filter: "zones".into(),
        region: Some("us-west-2".into()),
        inventory: Some(path),
        ..Default::default()
    };
    run_call(&CloudqConfig::default(), &opts).unwrap();

    let unknown = CallOptions {
        filter: "get_everything".into(),
        ..opts
    };
    let err = run_call(&CloudqConfig::default(), &unknown).unwrap_err();
    assert!(format!("{err:#}").contains("unknown filter"));
}
