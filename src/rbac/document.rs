/*!
 * Policy Document
 * JSON file format for items, hierarchy, assignments and default roles
 */

use super::item::{Assignment, ChildLink, Item};
use crate::core::{InlineString, RbacError, RbacResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Serializable form of a complete store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyDocument {
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ChildLink>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assignments: Vec<Assignment>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub default_roles: Vec<InlineString>,
}

impl PolicyDocument {
    pub fn load(path: impl AsRef<Path>) -> RbacResult<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| RbacError::PolicyIo {
            path: path.to_path_buf(),
            source,
        })?;
        let doc: PolicyDocument =
            serde_json::from_slice(&bytes).map_err(|source| RbacError::PolicyParse {
                path: path.to_path_buf(),
                source,
            })?;
        debug!(path = %path.display(), items = doc.items.len(), "policy document read");
        Ok(doc)
    }

    /// Write atomically: serialize to a sibling temp file, then rename over the target
    pub fn save(&self, path: impl AsRef<Path>) -> RbacResult<()> {
        let path = path.as_ref();
        let io_err = |source| RbacError::PolicyIo {
            path: path.to_path_buf(),
            source,
        };

        let json = serde_json::to_vec_pretty(self).map_err(|source| RbacError::PolicyParse {
            path: path.to_path_buf(),
            source,
        })?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(io_err)?;
        fs::rename(&tmp, path).map_err(io_err)?;

        debug!(path = %path.display(), items = self.items.len(), "policy document written");
        Ok(())
    }
}
