/*!
 * Permission Resolver Integration Tests
 * Pattern phase, exact fallback and default roles against the in-memory store
 */

use route_rbac::{
    AccessChecker, AccessManager, AccessRequest, Item, MatchPhase, MemoryStore, Params, Subject,
    SubjectId,
};
use std::sync::Arc;
use std::thread;

fn no_params() -> Params {
    Params::default()
}

/// User 7 holds `member`, which contains the `app/site/.*` pattern
fn site_store() -> MemoryStore {
    let store = MemoryStore::new();
    store.add_item(Item::role("member")).unwrap();
    store.add_item(Item::permission("app/site/.*")).unwrap();
    store.add_child("member", "app/site/.*").unwrap();
    store.assign(&SubjectId::from(7u64), "member").unwrap();
    store
}

#[test]
fn test_site_pattern_covers_every_site_action() {
    let manager = AccessManager::new(Arc::new(site_store()));
    let user = Subject::user(7u64);

    assert!(manager.has_access(&user, "app/site/login", &no_params()));
    assert!(manager.has_access(&user, "app/site/index", &no_params()));
    assert!(!manager.has_access(&user, "app/admin/login", &no_params()));
}

#[test]
fn test_pattern_is_anchored_at_both_ends() {
    let manager = AccessManager::new(Arc::new(site_store()));
    let user = Subject::user(7u64);

    assert!(!manager.has_access(&user, "appsite/index", &no_params()));
    assert!(!manager.has_access(&user, "x/app/site/index", &no_params()));
    assert!(!manager.has_access(&user, "app/sites/index", &no_params()));
}

#[test]
fn test_leading_separator_is_ignored() {
    let manager = AccessManager::new(Arc::new(site_store()));
    let user = Subject::user(7u64);

    assert!(manager.has_access(&user, "/app/site/index", &no_params()));
    // Only one separator is stripped
    assert!(!manager.has_access(&user, "//app/site/index", &no_params()));
}

#[test]
fn test_other_subjects_are_denied() {
    let manager = AccessManager::new(Arc::new(site_store()));

    assert!(!manager.has_access(&Subject::user(8u64), "app/site/index", &no_params()));
    assert!(!manager.has_access(&Subject::Guest, "app/site/index", &no_params()));
}

#[test]
fn test_decision_names_the_granting_pattern() {
    let manager = AccessManager::new(Arc::new(site_store()));

    let decision = manager.check(&AccessRequest::new(Subject::user(7u64), "/app/site/about"));
    assert!(decision.is_allowed());
    assert_eq!(decision.phase, MatchPhase::Pattern);
    assert_eq!(decision.granted_by.as_deref(), Some("app/site/.*"));
}

#[test]
fn test_exact_fallback_grants_names_that_do_not_match_themselves() {
    // `a+b` as a pattern matches `ab`, `aab`, ... but never the literal text `a+b`
    let store = MemoryStore::new();
    store.add_item(Item::permission("app/calc/a+b")).unwrap();
    store.assign(&SubjectId::from(1u64), "app/calc/a+b").unwrap();
    let manager = AccessManager::new(Arc::new(store));
    let user = Subject::user(1u64);

    let decision = manager.check(&AccessRequest::new(user.clone(), "app/calc/a+b"));
    assert!(decision.is_allowed());
    assert_eq!(decision.phase, MatchPhase::Exact);

    let decision = manager.check(&AccessRequest::new(user, "app/calc/aab"));
    assert!(decision.is_allowed());
    assert_eq!(decision.phase, MatchPhase::Pattern);
}

#[test]
fn test_malformed_pattern_does_not_block_others() {
    // The broken pattern is enumerated before the valid one
    let store = MemoryStore::new();
    store.add_item(Item::role("member")).unwrap();
    store.add_item(Item::permission("app/(site")).unwrap();
    store.add_item(Item::permission("app/site/.*")).unwrap();
    store.add_child("member", "app/(site").unwrap();
    store.add_child("member", "app/site/.*").unwrap();
    store.assign(&SubjectId::from(7u64), "member").unwrap();
    let manager = AccessManager::new(Arc::new(store));

    assert!(manager.has_access(&Subject::user(7u64), "app/site/index", &no_params()));
    assert!(manager.has_access(&Subject::user(7u64), "app/site/view", &no_params()));
    assert_eq!(manager.pattern_stats().invalid, 1);
}

#[test]
fn test_roles_are_never_patterns() {
    let store = MemoryStore::new();
    store.add_item(Item::role(".*")).unwrap();
    store.assign(&SubjectId::from(1u64), ".*").unwrap();
    let manager = AccessManager::new(Arc::new(store));

    assert!(!manager.has_access(&Subject::user(1u64), "app/site/index", &no_params()));
    assert_eq!(manager.pattern_stats().size, 0);
}

#[test]
fn test_default_roles_apply_to_guests() {
    let store = MemoryStore::new();
    store.add_item(Item::role("guest")).unwrap();
    store.add_item(Item::permission("app/site/.*")).unwrap();
    store.add_child("guest", "app/site/.*").unwrap();
    store.set_default_roles(["guest"]);
    let manager = AccessManager::new(Arc::new(store));

    assert!(manager.has_access(&Subject::Guest, "app/site/index", &no_params()));
    assert!(manager.has_access(&Subject::user(99u64), "app/site/index", &no_params()));
    assert!(!manager.has_access(&Subject::Guest, "app/admin/index", &no_params()));
}

#[test]
fn test_permission_as_default_role() {
    let store = MemoryStore::new();
    store.add_item(Item::permission("app/site/.*")).unwrap();
    store.set_default_roles(["app/site/.*"]);
    let manager = AccessManager::new(Arc::new(store));

    assert!(manager.has_access(&Subject::Guest, "app/site/error", &no_params()));
}

#[test]
fn test_store_changes_are_seen_immediately() {
    let store = Arc::new(site_store());
    let manager = AccessManager::new(Arc::clone(&store));
    let user = Subject::user(7u64);
    assert!(manager.has_access(&user, "app/site/index", &no_params()));

    assert!(store.revoke(&SubjectId::from(7u64), "member"));
    assert!(!manager.has_access(&user, "app/site/index", &no_params()));

    store.add_item(Item::permission("app/.*")).unwrap();
    store.assign(&SubjectId::from(7u64), "app/.*").unwrap();
    assert!(manager.has_access(&user, "app/admin/index", &no_params()));
}

#[test]
fn test_concurrent_checks() {
    let manager = Arc::new(AccessManager::new(Arc::new(site_store())));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let manager = Arc::clone(&manager);
            thread::spawn(move || {
                for j in 0..200 {
                    let user = Subject::user(7u64);
                    let route = format!("app/site/action{}", (i * 200 + j) % 17);
                    assert!(manager.has_access(&user, &route, &Params::default()));
                    assert!(!manager.has_access(&user, "app/admin/index", &Params::default()));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(manager.pattern_stats().size, 1);
}
