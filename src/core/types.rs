/*!
 * Core Types
 * Subject identity and request parameters shared by every layer
 */

use super::data_structures::InlineString;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Free-form parameters passed through to the grant check untouched
pub type Params = ahash::HashMap<String, serde_json::Value>;

/// Common result type for RBAC operations
pub type RbacResult<T> = Result<T, super::errors::RbacError>;

/// Opaque key identifying an authenticated subject (usually a user id)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(InlineString);

impl SubjectId {
    pub fn new(id: impl Into<InlineString>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<u64> for SubjectId {
    fn from(id: u64) -> Self {
        Self(id.to_string().into())
    }
}

impl From<&str> for SubjectId {
    fn from(id: &str) -> Self {
        Self(id.into())
    }
}

impl From<String> for SubjectId {
    fn from(id: String) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whoever is making the request
///
/// Guests hold no assignments, but default roles still apply to them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum Subject {
    Guest,
    User(SubjectId),
}

impl Subject {
    pub fn user(id: impl Into<SubjectId>) -> Self {
        Subject::User(id.into())
    }

    pub fn is_guest(&self) -> bool {
        matches!(self, Subject::Guest)
    }

    /// Id of an authenticated subject, `None` for guests
    pub fn id(&self) -> Option<&SubjectId> {
        match self {
            Subject::Guest => None,
            Subject::User(id) => Some(id),
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Guest => f.write_str("guest"),
            Subject::User(id) => write!(f, "{}", id),
        }
    }
}

impl FromStr for Subject {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s.eq_ignore_ascii_case("guest") {
            Ok(Subject::Guest)
        } else {
            Ok(Subject::user(s))
        }
    }
}
