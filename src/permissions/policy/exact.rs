/*!
 * Exact Policy
 * Fallback phase: the requested name itself, checked literally
 */

use super::context::EvaluationContext;
use super::engine::{Policy, PolicyDecision};
use crate::permissions::types::{AccessRequest, MatchPhase};

/// Delegates the normalized requested name to the store's exact grant check
///
/// Never abstains, so it must be the last policy in an engine.
pub struct ExactPolicy;

impl Policy for ExactPolicy {
    fn evaluate(&self, request: &AccessRequest, context: &EvaluationContext<'_>) -> PolicyDecision {
        let requested = request.normalized();
        if context
            .store
            .check_grant(&request.subject, requested, &request.params)
        {
            PolicyDecision::Allow {
                granted_by: requested.into(),
            }
        } else {
            PolicyDecision::Deny
        }
    }

    fn name(&self) -> &str {
        "exact"
    }

    fn phase(&self) -> MatchPhase {
        MatchPhase::Exact
    }
}
