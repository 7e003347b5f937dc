/*!
 * Permissions Module
 * Route permission resolution, access checks and audit logging
 *
 * Stored permission names may be regular expressions. A request such as
 * `app/site/index` is first matched against every stored permission pattern
 * (anchored at both ends); each match is handed to the store's exact grant
 * check under the stored name. If none grants, the requested name itself is
 * checked literally.
 *
 * ## Usage
 * ```ignore
 * use route_rbac::permissions::{AccessChecker, AccessManager, AccessRequest};
 *
 * let manager = AccessManager::new(store);
 *
 * let request = AccessRequest::new(Subject::user(7u64), "/app/site/index");
 * if manager.check(&request).is_allowed() {
 *     // Run the action
 * }
 *
 * // Check with audit
 * let decision = manager.check_and_audit(&request);
 * if !decision.is_allowed() {
 *     eprintln!("Denied: {}", decision.reason());
 * }
 * ```
 */

pub mod audit;
pub mod cache;
pub mod manager;
pub mod policy;
pub mod resolver;
pub mod types;

// Re-export commonly used items
pub use audit::{AuditEvent, AuditLogger, AuditSeverity, AuditStats};
pub use cache::{CacheStats, CompiledPattern, PatternCache};
pub use manager::AccessManager;
pub use policy::{EvaluationContext, ExactPolicy, PatternPolicy, Policy, PolicyDecision, PolicyEngine};
pub use resolver::PermissionResolver;
pub use types::{normalize_permission, AccessChecker, AccessDecision, AccessRequest, MatchPhase};
