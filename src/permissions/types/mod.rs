/*!
 * Access Types Module
 * Core types and traits for access checks
 */

mod core;
mod traits;

pub use self::core::{normalize_permission, AccessDecision, AccessRequest, MatchPhase};
pub use traits::AccessChecker;
