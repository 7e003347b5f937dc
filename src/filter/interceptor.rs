/*!
 * Pre-Action Interceptor
 * Access checks that run before a controller action and abort it on denial
 */

use super::route::ActionRoute;
use crate::core::limits::ACCESS_DENIED_STATUS;
use crate::core::Subject;
use crate::monitoring::AccessSpan;
use crate::permissions::{AccessChecker, AccessRequest};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Authorization failure raised before the action runs (HTTP 403)
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[error("Access denied")]
#[diagnostic(
    code(rbac::access_denied),
    help("Assign a role that grants this route, or a permission pattern matching it.")
)]
pub struct AccessDenied {
    pub subject: Subject,
    pub permission: String,
}

impl AccessDenied {
    pub fn new(subject: Subject, permission: impl Into<String>) -> Self {
        Self {
            subject,
            permission: permission.into(),
        }
    }

    pub fn status_code(&self) -> u16 {
        ACCESS_DENIED_STATUS
    }
}

/// Hook invoked synchronously before every action
pub trait ActionFilter: Send + Sync {
    /// Return an error to stop the action from running
    fn before_action(&self, subject: &Subject, route: &ActionRoute) -> Result<(), AccessDenied>;

    fn name(&self) -> &str;
}

/// Route-based access control backed by an [`AccessChecker`]
pub struct AccessFilter<C> {
    checker: Arc<C>,
}

impl<C: AccessChecker> AccessFilter<C> {
    pub fn new(checker: Arc<C>) -> Self {
        Self { checker }
    }

    pub fn checker(&self) -> &Arc<C> {
        &self.checker
    }
}

impl<C: AccessChecker> ActionFilter for AccessFilter<C> {
    fn before_action(&self, subject: &Subject, route: &ActionRoute) -> Result<(), AccessDenied> {
        let permission = route.permission_name();
        let span = AccessSpan::new(subject, &permission);
        let _entered = span.enter();

        let decision = self
            .checker
            .check_and_audit(&AccessRequest::new(subject.clone(), permission.as_str()));
        span.record_decision(
            decision.is_allowed(),
            decision.granted_by.as_ref().map(|name| name.as_str()),
        );

        if decision.is_allowed() {
            Ok(())
        } else {
            Err(AccessDenied::new(subject.clone(), permission))
        }
    }

    fn name(&self) -> &str {
        "access"
    }
}

/// Runs filters in registration order, then the action handler
#[derive(Default)]
pub struct ActionDispatcher {
    filters: Vec<Box<dyn ActionFilter>>,
}

impl ActionDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, filter: impl ActionFilter + 'static) -> Self {
        self.add_filter(filter);
        self
    }

    pub fn add_filter(&mut self, filter: impl ActionFilter + 'static) {
        info!(filter = filter.name(), "Registered action filter");
        self.filters.push(Box::new(filter));
    }

    pub fn filter_names(&self) -> Vec<&str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    /// Handler runs only if every filter lets the action through
    pub fn dispatch<R>(
        &self,
        subject: &Subject,
        route: &ActionRoute,
        handler: impl FnOnce() -> R,
    ) -> Result<R, AccessDenied> {
        for filter in &self.filters {
            if let Err(denied) = filter.before_action(subject, route) {
                debug!(filter = filter.name(), route = %route, "action aborted");
                return Err(denied);
            }
        }
        Ok(handler())
    }
}
