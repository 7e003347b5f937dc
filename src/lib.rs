/*!
 * Route RBAC Library
 * Pattern-aware permission checks for routed controller actions
 */

pub mod cli;
pub mod config;
pub mod core;
pub mod filter;
pub mod monitoring;
pub mod permissions;
pub mod rbac;
pub mod session;

// Re-exports
pub use cli::{run, CheckArgs, CheckReport, RouteOutcome};
pub use config::RbacConfig;
pub use self::core::{
    InlineString, Params, RbacError, RbacResult, StoreError, Subject, SubjectId,
};
pub use filter::{AccessDenied, AccessFilter, ActionDispatcher, ActionFilter, ActionRoute};
pub use monitoring::{init_tracing, init_tracing_with, AccessSpan};
pub use permissions::{
    AccessChecker, AccessDecision, AccessManager, AccessRequest, AuditLogger, MatchPhase,
    PatternCache, PermissionResolver,
};
pub use rbac::{
    Assignment, AssignmentStore, Item, ItemType, MemoryStore, PolicyDocument, RbacStore,
};
pub use session::{DefaultRoleBootstrap, SessionHook};
