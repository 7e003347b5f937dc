/*!
 * Policy File Tests
 * Loading, saving and validating JSON policy documents
 */

use pretty_assertions::assert_eq;
use route_rbac::{
    AccessManager, InlineString, MemoryStore, Params, PolicyDocument, RbacError, StoreError, Subject, SubjectId,
};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

const POLICY: &str = r#"{
    "items": [
        {"name": "default", "type": "role"},
        {"name": "editor", "type": "role", "description": "Content editors"},
        {"name": "app/site/.*", "type": "permission"},
        {"name": "post/(create|update)", "type": "permission"}
    ],
    "children": [
        {"parent": "default", "child": "app/site/.*"},
        {"parent": "editor", "child": "post/(create|update)"}
    ],
    "assignments": [
        {"subject": "12", "item": "editor", "created_at": 1700000000}
    ],
    "default_roles": ["default"]
}"#;

fn write_policy(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("policy.json");
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_load_policy_file() {
    let dir = TempDir::new().unwrap();
    let store = MemoryStore::load(write_policy(&dir, POLICY)).unwrap();

    assert_eq!(store.items().len(), 4);
    assert_eq!(store.default_roles(), vec![InlineString::from("default")]);
    assert_eq!(
        store.item("editor").and_then(|item| item.description),
        Some("Content editors".to_string())
    );

    let manager = AccessManager::new(Arc::new(store));
    let editor = Subject::user(12u64);
    assert!(manager.has_access(&editor, "post/create", &Params::default()));
    assert!(manager.has_access(&editor, "post/update", &Params::default()));
    assert!(!manager.has_access(&editor, "post/delete", &Params::default()));
    // Alternation stays inside the anchors
    assert!(!manager.has_access(&editor, "post/create/extra", &Params::default()));
    // Default role covers the public site for everyone
    assert!(manager.has_access(&Subject::Guest, "app/site/index", &Params::default()));
}

#[test]
fn test_save_and_reload() {
    let dir = TempDir::new().unwrap();
    let store = MemoryStore::load(write_policy(&dir, POLICY)).unwrap();
    store.assign(&SubjectId::from(13u64), "default").unwrap();

    let out = dir.path().join("saved.json");
    store.save(&out).unwrap();
    let reloaded = MemoryStore::load(&out).unwrap();

    assert_eq!(reloaded.to_document(), store.to_document());
    assert!(!dir.path().join("saved.json.tmp").exists());
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = MemoryStore::load(dir.path().join("absent.json")).err().unwrap();
    assert!(matches!(err, RbacError::PolicyIo { .. }));
}

#[test]
fn test_malformed_json() {
    let dir = TempDir::new().unwrap();
    let err = MemoryStore::load(write_policy(&dir, "{\"items\": [")).err().unwrap();
    assert!(matches!(err, RbacError::PolicyParse { .. }));
}

#[test]
fn test_hierarchy_loop_is_rejected() {
    let dir = TempDir::new().unwrap();
    let policy = r#"{
        "items": [{"name": "a", "type": "role"}, {"name": "b", "type": "role"}],
        "children": [{"parent": "a", "child": "b"}, {"parent": "b", "child": "a"}]
    }"#;

    let err = MemoryStore::load(write_policy(&dir, policy)).err().unwrap();
    assert!(matches!(
        err,
        RbacError::Store(StoreError::HierarchyLoop { .. })
    ));
}

#[test]
fn test_assignment_to_unknown_item_is_rejected() {
    let doc = PolicyDocument {
        assignments: vec![route_rbac::Assignment::new(SubjectId::from(1u64), "ghost")],
        ..PolicyDocument::default()
    };

    let err = MemoryStore::from_document(doc).err().unwrap();
    assert!(matches!(err, RbacError::Store(StoreError::ItemNotFound(_))));
}

#[test]
fn test_empty_document() {
    let dir = TempDir::new().unwrap();
    let store = MemoryStore::load(write_policy(&dir, "{}")).unwrap();
    assert!(store.items().is_empty());
    assert_eq!(store.to_document(), PolicyDocument::default());
}
