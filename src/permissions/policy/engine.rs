/*!
 * Policy Engine
 * Runs access requests through an ordered list of policies
 */

use super::context::EvaluationContext;
use crate::core::InlineString;
use crate::permissions::types::{AccessDecision, AccessRequest, MatchPhase};
use tracing::debug;

/// Policy decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyDecision {
    /// Granted through the named stored item
    Allow { granted_by: InlineString },
    Deny,
    Abstain,
}

/// Policy that can evaluate access requests
pub trait Policy: Send + Sync {
    fn evaluate(&self, request: &AccessRequest, context: &EvaluationContext<'_>) -> PolicyDecision;

    /// Policy name
    fn name(&self) -> &str;

    /// Lookup phase this policy implements
    fn phase(&self) -> MatchPhase;
}

/// Evaluates requests through policies in order; the first non-abstaining
/// policy decides
pub struct PolicyEngine {
    policies: Vec<Box<dyn Policy>>,
}

impl PolicyEngine {
    pub fn new(policies: Vec<Box<dyn Policy>>) -> Self {
        Self { policies }
    }

    pub fn policy_names(&self) -> Vec<&str> {
        self.policies.iter().map(|p| p.name()).collect()
    }

    pub fn evaluate(&self, request: &AccessRequest, context: &EvaluationContext<'_>) -> AccessDecision {
        debug!(
            subject = %request.subject,
            permission = request.normalized(),
            "evaluating access request"
        );

        for policy in &self.policies {
            match policy.evaluate(request, context) {
                PolicyDecision::Allow { granted_by } => {
                    debug!(policy = policy.name(), granted_by = %granted_by, "policy allowed request");
                    let reason = format!("Granted by '{}' via policy '{}'", granted_by, policy.name());
                    return AccessDecision::allow(request.clone(), granted_by, policy.phase(), reason);
                }
                PolicyDecision::Deny => {
                    debug!(policy = policy.name(), "policy denied request");
                    return AccessDecision::deny(
                        request.clone(),
                        policy.phase(),
                        format!("Denied by policy '{}'", policy.name()),
                    );
                }
                PolicyDecision::Abstain => {
                    debug!(policy = policy.name(), "policy abstained");
                    continue;
                }
            }
        }

        // If all policies abstained, deny by default
        AccessDecision::deny(request.clone(), MatchPhase::None, "No policy allowed this request")
    }
}
