/*!
 * Access Traits
 */

use super::core::{AccessDecision, AccessRequest};

/// Core access checking interface
pub trait AccessChecker: Send + Sync {
    /// Check if a request is allowed
    fn check(&self, request: &AccessRequest) -> AccessDecision;

    /// Check and record the decision in the audit trail
    fn check_and_audit(&self, request: &AccessRequest) -> AccessDecision;

    /// Batch check multiple requests
    fn check_batch(&self, requests: &[AccessRequest]) -> Vec<AccessDecision> {
        requests.iter().map(|req| self.check(req)).collect()
    }
}
