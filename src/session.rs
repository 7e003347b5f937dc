/*!
 * Session Bootstrap
 * Login-time hooks, including the implicit default role for authenticated subjects
 */

use crate::config::RbacConfig;
use crate::core::{InlineString, RbacResult, Subject};
use crate::rbac::AssignmentStore;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Invoked once a session has identified its subject
pub trait SessionHook: Send + Sync {
    fn on_login(&self, subject: &Subject) -> RbacResult<()>;

    /// Invoked when the session ends; undoes whatever `on_login` granted
    fn on_logout(&self, _subject: &Subject) -> RbacResult<()> {
        Ok(())
    }
}

/// Gives every authenticated subject a transient assignment of the default role
pub struct DefaultRoleBootstrap<S> {
    store: Arc<S>,
    role: InlineString,
}

impl<S: AssignmentStore> DefaultRoleBootstrap<S> {
    pub fn new(store: Arc<S>, role: impl Into<InlineString>) -> Self {
        Self {
            store,
            role: role.into(),
        }
    }

    pub fn from_config(store: Arc<S>, config: &RbacConfig) -> Self {
        Self::new(store, config.default_role.as_str())
    }

    pub fn role(&self) -> &str {
        &self.role
    }
}

impl<S: AssignmentStore> SessionHook for DefaultRoleBootstrap<S> {
    fn on_login(&self, subject: &Subject) -> RbacResult<()> {
        let Some(id) = subject.id() else {
            return Ok(());
        };

        if !self.store.has_item(&self.role) {
            warn!(role = %self.role, "default role is not defined, skipping bootstrap");
            return Ok(());
        }

        if self.store.assignment(id, &self.role).is_some() {
            debug!(subject = %id, role = %self.role, "default role already assigned");
            return Ok(());
        }

        self.store.assign_transient(id, &self.role)?;
        info!(subject = %id, role = %self.role, "default role assigned for session");
        Ok(())
    }

    fn on_logout(&self, subject: &Subject) -> RbacResult<()> {
        let Some(id) = subject.id() else {
            return Ok(());
        };

        if self.store.revoke_transient(id, &self.role) {
            info!(subject = %id, role = %self.role, "default role released");
        }
        Ok(())
    }
}
