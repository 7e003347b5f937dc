/*!
 * Access Check Runner
 * Argument parsing and the per-route check loop behind `rbac-check`
 */

use crate::config::RbacConfig;
use crate::core::{RbacError, RbacResult, Subject};
use crate::filter::{AccessDenied, AccessFilter, ActionFilter, ActionRoute};
use crate::permissions::AccessManager;
use crate::rbac::MemoryStore;
use crate::session::{DefaultRoleBootstrap, SessionHook};
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

pub const USAGE: &str = "usage: rbac-check <subject|guest> <route> [<route>...]";

/// Subject and routes named on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckArgs {
    pub subject: Subject,
    pub routes: Vec<ActionRoute>,
}

impl CheckArgs {
    /// Parse arguments without the program name
    pub fn parse<I, T>(args: I) -> RbacResult<Self>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut args = args.into_iter();
        let subject = match args.next() {
            Some(arg) => match arg.as_ref().parse::<Subject>() {
                Ok(subject) => subject,
                Err(never) => match never {},
            },
            None => return Err(RbacError::InvalidConfig(USAGE.into())),
        };
        let routes = args
            .map(|arg| arg.as_ref().parse::<ActionRoute>())
            .collect::<RbacResult<Vec<_>>>()?;
        if routes.is_empty() {
            return Err(RbacError::InvalidConfig("no routes given".into()));
        }
        Ok(Self { subject, routes })
    }
}

/// Filter outcome for one route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteOutcome {
    pub route: ActionRoute,
    pub result: Result<(), AccessDenied>,
}

impl fmt::Display for RouteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.result {
            Ok(()) => write!(f, "ALLOW {}", self.route),
            Err(err) => write!(f, "DENY  {} ({} {})", self.route, err.status_code(), err),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CheckReport {
    pub outcomes: Vec<RouteOutcome>,
}

impl CheckReport {
    pub fn denied(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_err()).count()
    }

    pub fn all_allowed(&self) -> bool {
        self.denied() == 0
    }

    pub fn lines(&self) -> Vec<String> {
        self.outcomes.iter().map(ToString::to_string).collect()
    }
}

/// Open a session for `subject` against the configured policy and filter every route
pub fn run(subject: &Subject, routes: &[ActionRoute], config: &RbacConfig) -> RbacResult<CheckReport> {
    let store = match &config.policy_path {
        Some(path) => {
            info!(path = %path.display(), "Loading policy file");
            Arc::new(MemoryStore::load(path)?)
        }
        None => {
            warn!("RBAC_POLICY_PATH not set, every route will be denied");
            Arc::new(MemoryStore::new())
        }
    };

    DefaultRoleBootstrap::from_config(Arc::clone(&store), config).on_login(subject)?;

    let manager = Arc::new(AccessManager::with_config(store, config));
    let filter = AccessFilter::new(Arc::clone(&manager));

    let outcomes: Vec<RouteOutcome> = routes
        .iter()
        .map(|route| RouteOutcome {
            route: route.clone(),
            result: filter.before_action(subject, route),
        })
        .collect();
    let report = CheckReport { outcomes };

    let stats = manager.pattern_stats();
    info!(
        routes = routes.len(),
        denied = report.denied(),
        patterns_cached = stats.size,
        invalid_patterns = stats.invalid,
        "Access check finished"
    );
    Ok(report)
}
