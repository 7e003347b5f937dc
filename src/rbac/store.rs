/*!
 * Store Traits
 * Interfaces the resolver and session hooks consume from the item store
 */

use super::item::{Assignment, Item};
use crate::core::{Params, RbacResult, Subject, SubjectId};
use std::sync::Arc;

/// Read side of the item store used by the resolver
pub trait RbacStore: Send + Sync {
    /// Stored permissions in registration order
    ///
    /// Callers must still skip role-typed entries; implementations are not
    /// required to filter them out.
    fn permissions(&self) -> Arc<[Item]>;

    /// Exact-name grant check
    ///
    /// `name` is compared literally. `params` are accepted for rule-aware
    /// stores and must be forwarded unchanged.
    fn check_grant(&self, subject: &Subject, name: &str, params: &Params) -> bool;
}

/// Write side used by session hooks
pub trait AssignmentStore: Send + Sync {
    /// Whether an item with this name exists
    fn has_item(&self, name: &str) -> bool;

    /// Current assignment of `item` to `subject`, if any
    fn assignment(&self, subject: &SubjectId, item: &str) -> Option<Assignment>;

    /// Assign for the lifetime of the process without persisting it
    fn assign_transient(&self, subject: &SubjectId, item: &str) -> RbacResult<Assignment>;

    /// Drop a transient assignment; persistent ones are left alone
    fn revoke_transient(&self, subject: &SubjectId, item: &str) -> bool;
}
