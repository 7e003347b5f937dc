/*!
 * RBAC Items
 * Roles, permissions, hierarchy links and assignments
 */

use crate::core::{InlineString, SubjectId};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, TimestampSeconds};
use std::time::SystemTime;

/// Kind of a stored item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Role,
    Permission,
}

/// Named role or permission
///
/// Permission names double as patterns: `app/site/.*` covers every action of
/// the `site` controller. Role names are always literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: InlineString,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Item {
    pub fn new(name: impl Into<InlineString>, item_type: ItemType) -> Self {
        Self {
            name: name.into(),
            item_type,
            description: None,
        }
    }

    pub fn role(name: impl Into<InlineString>) -> Self {
        Self::new(name, ItemType::Role)
    }

    pub fn permission(name: impl Into<InlineString>) -> Self {
        Self::new(name, ItemType::Permission)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    #[inline]
    pub fn is_role(&self) -> bool {
        self.item_type == ItemType::Role
    }

    #[inline]
    pub fn is_permission(&self) -> bool {
        self.item_type == ItemType::Permission
    }
}

/// Parent/child edge in the item hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildLink {
    pub parent: InlineString,
    pub child: InlineString,
}

/// Item granted directly to a subject
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub subject: SubjectId,
    pub item: InlineString,
    #[serde_as(as = "TimestampSeconds<i64>")]
    pub created_at: SystemTime,
    /// Session-scoped assignments are never written back to the policy file
    #[serde(skip)]
    pub transient: bool,
}

impl Assignment {
    pub fn new(subject: SubjectId, item: impl Into<InlineString>) -> Self {
        Self {
            subject,
            item: item.into(),
            created_at: SystemTime::now(),
            transient: false,
        }
    }

    pub fn transient(subject: SubjectId, item: impl Into<InlineString>) -> Self {
        Self {
            transient: true,
            ..Self::new(subject, item)
        }
    }
}
