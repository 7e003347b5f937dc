/*!
 * Action Routes
 * `module/controller/action` identifiers and the permission names built from them
 */

use crate::core::limits::ROUTE_SEPARATOR;
use crate::core::{InlineString, RbacError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Result of routing a request to a controller action
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionRoute {
    pub module: InlineString,
    pub controller: InlineString,
    pub action: InlineString,
}

impl ActionRoute {
    pub fn new(
        module: impl Into<InlineString>,
        controller: impl Into<InlineString>,
        action: impl Into<InlineString>,
    ) -> Self {
        Self {
            module: module.into(),
            controller: controller.into(),
            action: action.into(),
        }
    }

    /// Permission name checked before the action runs
    pub fn permission_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ActionRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{sep}{}{sep}{}",
            self.module,
            self.controller,
            self.action,
            sep = ROUTE_SEPARATOR
        )
    }
}

impl FromStr for ActionRoute {
    type Err = RbacError;

    /// Parse `module/controller/action`, with or without one leading separator
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.strip_prefix(ROUTE_SEPARATOR).unwrap_or(s);
        let parts: Vec<&str> = trimmed.split(ROUTE_SEPARATOR).collect();
        match parts.as_slice() {
            [module, controller, action]
                if !module.is_empty() && !controller.is_empty() && !action.is_empty() =>
            {
                Ok(Self::new(*module, *controller, *action))
            }
            _ => Err(RbacError::InvalidRoute(s.into())),
        }
    }
}
