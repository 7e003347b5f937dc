/*!
 * System Limits and Constants
 *
 * Centralized location for limits, thresholds and well-known names.
 */

// =============================================================================
// AUDIT TRAIL
// =============================================================================

/// Global audit ring buffer size
/// Oldest events are dropped once full
pub const MAX_AUDIT_EVENTS: usize = 10_000;

/// Per-subject audit ring buffer size
pub const MAX_AUDIT_EVENTS_PER_SUBJECT: usize = 1_000;

/// Subjects with their own audit history and denial counter
/// An arbitrary subject is forgotten when a new one arrives at the limit
pub const MAX_AUDIT_SUBJECTS: usize = 1_024;

// =============================================================================
// PATTERN MATCHING
// =============================================================================

/// Default number of compiled permission patterns kept in memory
pub const DEFAULT_PATTERN_CACHE_SIZE: usize = 4096;

/// Upper bound on the compiled size of a single permission pattern (1MB)
/// [SECURITY] Oversized patterns are treated as malformed instead of compiled
pub const PATTERN_SIZE_LIMIT: usize = 1024 * 1024;

// =============================================================================
// WELL-KNOWN NAMES
// =============================================================================

/// Role implicitly assigned to every authenticated subject at login
pub const DEFAULT_ROLE: &str = "default";

/// Separator between route segments in a permission name
pub const ROUTE_SEPARATOR: char = '/';

/// Status code carried by an access denial
pub const ACCESS_DENIED_STATUS: u16 = 403;

/// Access requests slower than this are logged at warn level
pub const SLOW_CHECK_THRESHOLD_MS: u128 = 10;
