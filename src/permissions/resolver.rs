/*!
 * Permission Resolver
 * Decides access by matching the requested name against stored permission
 * patterns, then falling back to an exact-name grant check
 */

use super::cache::{CacheStats, PatternCache};
use super::policy::{EvaluationContext, ExactPolicy, PatternPolicy, PolicyEngine};
use super::types::{AccessDecision, AccessRequest};
use crate::core::{Params, Subject};
use crate::rbac::RbacStore;
use std::sync::Arc;

/// Stateless resolver over an item store
///
/// Holds no per-request state; the only shared data it touches is the
/// compiled-pattern cache, which never changes outcomes. Safe to call from any
/// number of threads.
pub struct PermissionResolver<S> {
    store: Arc<S>,
    engine: Arc<PolicyEngine>,
    patterns: Arc<PatternCache>,
}

impl<S: RbacStore> PermissionResolver<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self::with_cache(store, PatternCache::default())
    }

    pub fn with_cache(store: Arc<S>, cache: PatternCache) -> Self {
        let patterns = Arc::new(cache);
        let engine = PolicyEngine::new(vec![
            Box::new(PatternPolicy::new(Arc::clone(&patterns))),
            Box::new(ExactPolicy),
        ]);
        Self {
            store,
            engine: Arc::new(engine),
            patterns,
        }
    }

    /// Whether `subject` may access `permission`
    pub fn has_access(&self, subject: &Subject, permission: &str, params: &Params) -> bool {
        let request = AccessRequest::new(subject.clone(), permission).with_params(params.clone());
        self.resolve(&request).is_allowed()
    }

    /// Full decision including which stored name granted and in which phase
    pub fn resolve(&self, request: &AccessRequest) -> AccessDecision {
        let context = EvaluationContext::new(self.store.as_ref());
        self.engine.evaluate(request, &context)
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn pattern_stats(&self) -> CacheStats {
        self.patterns.stats()
    }

    pub fn clear_patterns(&self) {
        self.patterns.clear();
    }

    pub fn policy_names(&self) -> Vec<&str> {
        self.engine.policy_names()
    }
}

impl<S> Clone for PermissionResolver<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            engine: Arc::clone(&self.engine),
            patterns: Arc::clone(&self.patterns),
        }
    }
}
