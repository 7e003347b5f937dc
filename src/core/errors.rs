/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use crate::core::data_structures::InlineString;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

// Re-export the denial raised by the pre-action filter
pub use crate::filter::AccessDenied;

/// Item store mutation errors with serialization support
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum StoreError {
    #[error("Item '{0}' not found")]
    #[diagnostic(
        code(store::item_not_found),
        help("Register the role or permission before linking or assigning it.")
    )]
    ItemNotFound(InlineString),

    #[error("Item '{0}' already exists")]
    #[diagnostic(
        code(store::duplicate_item),
        help("Item names are unique across roles and permissions.")
    )]
    DuplicateItem(InlineString),

    #[error("Cannot add '{child}' as a child of '{parent}': loop detected")]
    #[diagnostic(
        code(store::hierarchy_loop),
        help("The parent is already reachable from the child. Remove the existing link first.")
    )]
    HierarchyLoop {
        parent: InlineString,
        child: InlineString,
    },

    #[error("Cannot add '{child}' as a child of '{parent}': {reason}")]
    #[diagnostic(code(store::invalid_hierarchy))]
    InvalidHierarchy {
        parent: InlineString,
        child: InlineString,
        reason: InlineString,
    },

    #[error("Item '{item}' is already assigned to subject {subject}")]
    #[diagnostic(
        code(store::duplicate_assignment),
        help("Revoke the existing assignment before assigning it again.")
    )]
    DuplicateAssignment {
        subject: InlineString,
        item: InlineString,
    },
}

/// Unified error type with miette diagnostics
#[derive(Error, Debug, Diagnostic)]
pub enum RbacError {
    #[error("Store error: {0}")]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),

    #[error("Cannot access policy file {}: {source}", path.display())]
    #[diagnostic(
        code(rbac::policy_io),
        help("Check that the path exists and is readable/writable by this process.")
    )]
    PolicyIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Policy file {} is malformed: {source}", path.display())]
    #[diagnostic(
        code(rbac::policy_parse),
        help("The policy file must be a JSON object with items, children, assignments and default_roles.")
    )]
    PolicyParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid route: {0}")]
    #[diagnostic(
        code(rbac::invalid_route),
        help("Routes have the form module/controller/action.")
    )]
    InvalidRoute(InlineString),

    #[error("Invalid configuration: {0}")]
    #[diagnostic(code(rbac::invalid_config))]
    InvalidConfig(InlineString),

    #[error(transparent)]
    #[diagnostic(transparent)]
    AccessDenied(#[from] AccessDenied),
}

impl RbacError {
    /// Whether this error is an authorization failure rather than a fault
    pub fn is_denial(&self) -> bool {
        matches!(self, RbacError::AccessDenied(_))
    }
}
