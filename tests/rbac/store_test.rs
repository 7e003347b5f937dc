/*!
 * Memory Store Tests
 * Item registry, hierarchy rules and assignment bookkeeping
 */

use route_rbac::{
    Item, ItemType, MemoryStore, Params, RbacError, RbacStore, StoreError, Subject, SubjectId,
};
use std::sync::Arc;
use std::thread;

#[test]
fn test_permissions_enumerate_in_registration_order() {
    let store = MemoryStore::new();
    store.add_item(Item::permission("b/.*")).unwrap();
    store.add_item(Item::role("admin")).unwrap();
    store.add_item(Item::permission("a/.*")).unwrap();

    let names: Vec<String> = store
        .permissions()
        .iter()
        .map(|item| item.name().to_string())
        .collect();
    assert_eq!(names, vec!["b/.*", "a/.*"]);
    assert!(store.permissions().iter().all(|item| item.item_type == ItemType::Permission));
}

#[test]
fn test_duplicate_names_rejected_across_kinds() {
    let store = MemoryStore::new();
    store.add_item(Item::role("admin")).unwrap();

    let err = store.add_item(Item::permission("admin")).unwrap_err();
    assert!(matches!(err, RbacError::Store(StoreError::DuplicateItem(_))));
}

#[test]
fn test_permission_cannot_contain_role() {
    let store = MemoryStore::new();
    store.add_item(Item::role("admin")).unwrap();
    store.add_item(Item::permission("app/.*")).unwrap();

    let err = store.add_child("app/.*", "admin").unwrap_err();
    assert!(matches!(err, RbacError::Store(StoreError::InvalidHierarchy { .. })));
}

#[test]
fn test_remove_item_drops_links_and_assignments() {
    let store = MemoryStore::new();
    store.add_item(Item::role("admin")).unwrap();
    store.add_item(Item::permission("app/.*")).unwrap();
    store.add_child("admin", "app/.*").unwrap();
    store.assign(&SubjectId::from(1u64), "admin").unwrap();
    let user = Subject::user(1u64);
    assert!(store.check_grant(&user, "app/.*", &Params::default()));

    store.remove_item("admin").unwrap();
    assert!(!store.check_grant(&user, "app/.*", &Params::default()));
    assert!(store.assignments(&SubjectId::from(1u64)).is_empty());
    assert!(store.children("admin").is_empty());
}

#[test]
fn test_revoke_all() {
    let store = MemoryStore::new();
    store.add_item(Item::role("a")).unwrap();
    store.add_item(Item::role("b")).unwrap();
    let id = SubjectId::from(5u64);
    store.assign(&id, "a").unwrap();
    store.assign(&id, "b").unwrap();

    let err = store.assign(&id, "a").unwrap_err();
    assert!(matches!(err, RbacError::Store(StoreError::DuplicateAssignment { .. })));

    assert_eq!(store.revoke_all(&id), 2);
    assert!(!store.revoke(&id, "a"));
}

#[test]
fn test_readers_during_writes() {
    let store = Arc::new(MemoryStore::new());
    store.add_item(Item::role("base")).unwrap();
    store.assign(&SubjectId::from(1u64), "base").unwrap();

    let writer = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for i in 0..100 {
                store.add_item(Item::permission(format!("mod{}/.*", i))).unwrap();
                store.add_child("base", &format!("mod{}/.*", i)).unwrap();
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for _ in 0..100 {
                    let snapshot = store.permissions();
                    for item in snapshot.iter() {
                        let _ = store.check_grant(&Subject::user(1u64), item.name(), &Params::default());
                    }
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }

    assert_eq!(store.permissions().len(), 100);
    assert!(store.check_grant(&Subject::user(1u64), "mod99/.*", &Params::default()));
}
