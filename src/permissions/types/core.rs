/*!
 * Access Types
 * Requests, decisions and the phase that produced them
 */

use crate::core::limits::ROUTE_SEPARATOR;
use crate::core::{InlineString, Params, Subject};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, TimestampSeconds};
use std::time::SystemTime;

/// Strip exactly one leading route separator, nothing else
#[inline]
pub fn normalize_permission(requested: &str) -> &str {
    requested.strip_prefix(ROUTE_SEPARATOR).unwrap_or(requested)
}

/// Access request
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AccessRequest {
    /// Who is asking
    pub subject: Subject,
    /// Requested permission as received (may carry a leading `/`)
    pub permission: String,
    /// Forwarded untouched to the store's grant check
    #[serde(default)]
    pub params: Params,
    /// When the request was made
    #[serde_as(as = "TimestampSeconds<i64>")]
    pub timestamp: SystemTime,
}

impl AccessRequest {
    pub fn new(subject: Subject, permission: impl Into<String>) -> Self {
        Self {
            subject,
            permission: permission.into(),
            params: Params::default(),
            timestamp: SystemTime::now(),
        }
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Permission with one leading separator removed
    #[inline]
    pub fn normalized(&self) -> &str {
        normalize_permission(&self.permission)
    }
}

/// Which lookup phase settled the request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPhase {
    /// A stored permission pattern matched and its grant check passed
    Pattern,
    /// The exact-name fallback decided
    Exact,
    /// No policy reached a verdict
    None,
}

/// Access decision
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AccessDecision {
    /// Request that was evaluated
    pub request: AccessRequest,
    /// Whether access is granted
    pub allowed: bool,
    /// Stored name whose grant check passed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub granted_by: Option<InlineString>,
    pub phase: MatchPhase,
    /// Reason for decision
    pub reason: String,
    #[serde_as(as = "TimestampSeconds<i64>")]
    pub decided_at: SystemTime,
}

impl AccessDecision {
    pub fn allow(
        request: AccessRequest,
        granted_by: impl Into<InlineString>,
        phase: MatchPhase,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            request,
            allowed: true,
            granted_by: Some(granted_by.into()),
            phase,
            reason: reason.into(),
            decided_at: SystemTime::now(),
        }
    }

    pub fn deny(request: AccessRequest, phase: MatchPhase, reason: impl Into<String>) -> Self {
        Self {
            request,
            allowed: false,
            granted_by: None,
            phase,
            reason: reason.into(),
            decided_at: SystemTime::now(),
        }
    }

    #[inline]
    pub fn is_allowed(&self) -> bool {
        self.allowed
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn subject(&self) -> &Subject {
        &self.request.subject
    }
}
