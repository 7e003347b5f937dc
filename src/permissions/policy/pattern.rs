/*!
 * Pattern Policy
 * First lookup phase: stored permission names used as anchored patterns
 */

use super::context::EvaluationContext;
use super::engine::{Policy, PolicyDecision};
use crate::permissions::cache::PatternCache;
use crate::permissions::types::{AccessRequest, MatchPhase};
use std::sync::Arc;
use tracing::trace;

/// Grants when some stored permission pattern matches the request and the
/// store grants that stored name
///
/// Every matching permission is tried in registration order until one grants;
/// role entries are never used as patterns. Abstains when nothing grants so
/// the exact-name phase can run.
pub struct PatternPolicy {
    patterns: Arc<PatternCache>,
}

impl PatternPolicy {
    pub fn new(patterns: Arc<PatternCache>) -> Self {
        Self { patterns }
    }
}

impl Policy for PatternPolicy {
    fn evaluate(&self, request: &AccessRequest, context: &EvaluationContext<'_>) -> PolicyDecision {
        let requested = request.normalized();

        for item in context.permissions.iter() {
            if item.is_role() {
                continue;
            }
            if !self.patterns.matches(item.name(), requested) {
                continue;
            }
            trace!(pattern = item.name(), requested, "permission pattern matched");
            if context
                .store
                .check_grant(&request.subject, item.name(), &request.params)
            {
                return PolicyDecision::Allow {
                    granted_by: item.name.clone(),
                };
            }
        }

        PolicyDecision::Abstain
    }

    fn name(&self) -> &str {
        "pattern"
    }

    fn phase(&self) -> MatchPhase {
        MatchPhase::Pattern
    }
}
