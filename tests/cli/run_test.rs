/*!
 * Runner Tests
 * Argument handling and ALLOW/DENY reports against policy files on disk
 */

use pretty_assertions::assert_eq;
use route_rbac::{run, ActionRoute, CheckArgs, RbacConfig, RbacError, Subject};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const POLICY: &str = r#"{
    "items": [
        {"name": "default", "type": "role"},
        {"name": "admin", "type": "role"},
        {"name": "app/site/.*", "type": "permission"},
        {"name": "app/admin/(index|users)", "type": "permission"}
    ],
    "children": [
        {"parent": "default", "child": "app/site/.*"},
        {"parent": "admin", "child": "app/admin/(index|users)"}
    ],
    "assignments": [
        {"subject": "1", "item": "admin", "created_at": 1700000000}
    ],
    "default_roles": []
}"#;

fn config_for(dir: &TempDir, contents: &str) -> RbacConfig {
    let path: PathBuf = dir.path().join("policy.json");
    fs::write(&path, contents).unwrap();
    RbacConfig {
        policy_path: Some(path),
        ..RbacConfig::default()
    }
}

fn routes(list: &[&str]) -> Vec<ActionRoute> {
    list.iter().map(|r| r.parse().unwrap()).collect()
}

#[test]
fn test_guest_with_default_roles_is_allowed() {
    let dir = TempDir::new().unwrap();
    let policy = POLICY.replace(r#""default_roles": []"#, r#""default_roles": ["default"]"#);
    let config = config_for(&dir, &policy);

    let args = CheckArgs::parse(["guest", "app/site/index"]).unwrap();
    let report = run(&args.subject, &args.routes, &config).unwrap();

    assert_eq!(report.lines(), vec!["ALLOW app/site/index".to_string()]);
    assert!(report.all_allowed());
}

#[test]
fn test_denied_route_is_reported() {
    let dir = TempDir::new().unwrap();
    let config = config_for(&dir, POLICY);

    let report = run(
        &Subject::Guest,
        &routes(&["app/site/index", "app/admin/index"]),
        &config,
    )
    .unwrap();

    assert_eq!(
        report.lines(),
        vec![
            "DENY  app/site/index (403 Access denied)".to_string(),
            "DENY  app/admin/index (403 Access denied)".to_string(),
        ]
    );
    assert_eq!(report.denied(), 2);
    assert!(!report.all_allowed());
}

#[test]
fn test_session_bootstrap_grants_default_role() {
    let dir = TempDir::new().unwrap();
    let config = config_for(&dir, POLICY);

    let report = run(
        &Subject::user("7"),
        &routes(&["app/site/about", "app/admin/users"]),
        &config,
    )
    .unwrap();

    assert_eq!(
        report.lines(),
        vec![
            "ALLOW app/site/about".to_string(),
            "DENY  app/admin/users (403 Access denied)".to_string(),
        ]
    );
    assert_eq!(report.denied(), 1);
}

#[test]
fn test_assigned_admin_passes_every_route() {
    let dir = TempDir::new().unwrap();
    let config = config_for(&dir, POLICY);

    let args = CheckArgs::parse(["1", "app/admin/index", "app/admin/users", "app/site/index"]).unwrap();
    let report = run(&args.subject, &args.routes, &config).unwrap();

    assert!(report.all_allowed(), "{:?}", report.lines());
}

#[test]
fn test_missing_policy_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let config = RbacConfig {
        policy_path: Some(dir.path().join("absent.json")),
        ..RbacConfig::default()
    };

    let err = run(&Subject::Guest, &routes(&["app/site/index"]), &config).unwrap_err();
    assert!(matches!(err, RbacError::PolicyIo { .. }));
}

#[test]
fn test_no_routes_given() {
    let err = CheckArgs::parse(["guest"]).unwrap_err();
    assert!(matches!(err, RbacError::InvalidConfig(_)));
    assert_eq!(err.to_string(), "Invalid configuration: no routes given");
}
