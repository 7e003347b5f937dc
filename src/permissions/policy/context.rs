/*!
 * Evaluation Context
 * Store handle and permission snapshot shared by every policy in one evaluation
 */

use crate::rbac::{Item, RbacStore};
use std::sync::Arc;

/// Everything a policy needs besides the request itself
///
/// The permission list is loaded once per evaluation so every policy sees the
/// same snapshot even if the store is written concurrently.
pub struct EvaluationContext<'a> {
    pub store: &'a dyn RbacStore,
    pub permissions: Arc<[Item]>,
}

impl<'a> EvaluationContext<'a> {
    pub fn new(store: &'a dyn RbacStore) -> Self {
        Self {
            permissions: store.permissions(),
            store,
        }
    }
}
