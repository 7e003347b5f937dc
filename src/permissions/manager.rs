/*!
 * Access Manager
 * Resolver plus audit trail behind the `AccessChecker` interface
 */

use super::audit::{AuditEvent, AuditLogger, AuditStats};
use super::cache::{CacheStats, PatternCache};
use super::resolver::PermissionResolver;
use super::types::{AccessChecker, AccessDecision, AccessRequest};
use crate::config::RbacConfig;
use crate::core::{Params, Subject};
use crate::rbac::RbacStore;
use std::sync::Arc;
use tracing::{debug, warn};

/// Central access manager
pub struct AccessManager<S> {
    resolver: PermissionResolver<S>,
    audit: Arc<AuditLogger>,
    audit_enabled: bool,
}

impl<S: RbacStore> AccessManager<S> {
    pub fn new(store: Arc<S>) -> Self {
        debug!("Initializing access manager");
        Self {
            resolver: PermissionResolver::new(store),
            audit: Arc::new(AuditLogger::new()),
            audit_enabled: true,
        }
    }

    /// Create with cache size and audit switch taken from configuration
    pub fn with_config(store: Arc<S>, config: &RbacConfig) -> Self {
        debug!(
            cache_size = config.pattern_cache_size,
            audit = config.audit,
            "Initializing access manager from config"
        );
        Self {
            resolver: PermissionResolver::with_cache(
                store,
                PatternCache::new(config.pattern_cache_size),
            ),
            audit: Arc::new(AuditLogger::new()),
            audit_enabled: config.audit,
        }
    }

    /// Boolean shortcut over [`AccessChecker::check`]
    pub fn has_access(&self, subject: &Subject, permission: &str, params: &Params) -> bool {
        self.resolver.has_access(subject, permission, params)
    }

    pub fn resolver(&self) -> &PermissionResolver<S> {
        &self.resolver
    }

    pub fn store(&self) -> &Arc<S> {
        self.resolver.store()
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    pub fn pattern_stats(&self) -> CacheStats {
        self.resolver.pattern_stats()
    }

    pub fn audit_stats(&self) -> AuditStats {
        self.audit.stats()
    }

    /// Drop compiled patterns, e.g. after bulk-removing permissions
    pub fn clear_pattern_cache(&self) {
        self.resolver.clear_patterns();
    }
}

impl<S> Clone for AccessManager<S> {
    fn clone(&self) -> Self {
        Self {
            resolver: self.resolver.clone(),
            audit: Arc::clone(&self.audit),
            audit_enabled: self.audit_enabled,
        }
    }
}

impl<S: RbacStore> AccessChecker for AccessManager<S> {
    fn check(&self, request: &AccessRequest) -> AccessDecision {
        self.resolver.resolve(request)
    }

    fn check_and_audit(&self, request: &AccessRequest) -> AccessDecision {
        let decision = self.check(request);

        if !decision.is_allowed() {
            warn!(
                subject = %request.subject,
                permission = request.normalized(),
                "access denied"
            );
        }

        if self.audit_enabled {
            self.audit.log(AuditEvent::new(decision.clone()));
        }

        decision
    }
}
