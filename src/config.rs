/*!
 * Configuration
 * Runtime settings with environment overrides
 *
 * Environment variables:
 * - RBAC_POLICY_PATH: JSON policy file to load
 * - RBAC_DEFAULT_ROLE: role assigned to every authenticated subject (default: `default`)
 * - RBAC_PATTERN_CACHE_SIZE: compiled pattern cache capacity (default: 4096)
 * - RBAC_AUDIT: record decisions in the audit trail (default: true)
 * - RBAC_TRACE_JSON: JSON log output (default: false)
 */

use crate::core::limits::{DEFAULT_PATTERN_CACHE_SIZE, DEFAULT_ROLE};
use crate::core::{RbacError, RbacResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct RbacConfig {
    pub policy_path: Option<PathBuf>,
    pub default_role: String,
    pub pattern_cache_size: usize,
    pub audit: bool,
    pub trace_json: bool,
}

impl Default for RbacConfig {
    fn default() -> Self {
        Self {
            policy_path: None,
            default_role: DEFAULT_ROLE.to_string(),
            pattern_cache_size: DEFAULT_PATTERN_CACHE_SIZE,
            audit: true,
            trace_json: false,
        }
    }
}

impl RbacConfig {
    /// Defaults overridden by whichever `RBAC_*` variables are set
    pub fn from_env() -> RbacResult<Self> {
        let mut config = Self::default();

        if let Ok(path) = env::var("RBAC_POLICY_PATH") {
            if !path.is_empty() {
                config.policy_path = Some(PathBuf::from(path));
            }
        }
        if let Ok(role) = env::var("RBAC_DEFAULT_ROLE") {
            config.default_role = role;
        }
        if let Ok(size) = env::var("RBAC_PATTERN_CACHE_SIZE") {
            config.pattern_cache_size = size.trim().parse().map_err(|_| {
                RbacError::InvalidConfig(
                    format!("RBAC_PATTERN_CACHE_SIZE must be a positive integer, got '{}'", size).into(),
                )
            })?;
        }
        if let Ok(value) = env::var("RBAC_AUDIT") {
            config.audit = parse_flag("RBAC_AUDIT", &value)?;
        }
        if let Ok(value) = env::var("RBAC_TRACE_JSON") {
            config.trace_json = parse_flag("RBAC_TRACE_JSON", &value)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> RbacResult<()> {
        if self.default_role.trim().is_empty() {
            return Err(RbacError::InvalidConfig("default role must not be empty".into()));
        }
        if self.pattern_cache_size == 0 {
            return Err(RbacError::InvalidConfig(
                "pattern cache size must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// Boolean environment value: `1/true/yes/on` or `0/false/no/off`
pub(crate) fn parse_flag(name: &str, value: &str) -> RbacResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(RbacError::InvalidConfig(
            format!("{} must be a boolean, got '{}'", name, value).into(),
        )),
    }
}
