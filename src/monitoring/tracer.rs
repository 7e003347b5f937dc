/*!
 * Tracing
 * Subscriber setup and per-check spans using the tracing crate
 *
 * Features:
 * - Trace ID per access check for log correlation
 * - JSON-formatted logs for structured parsing
 * - Slow check warnings with elapsed time
 */

use crate::config::{parse_flag, RbacConfig};
use crate::core::limits::SLOW_CHECK_THRESHOLD_MS;
use crate::core::Subject;
use std::time::Instant;
use tracing::{debug, info, span, warn, Level};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};
use uuid::Uuid;

/// Initialize structured tracing from the environment
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - RBAC_TRACE_JSON: Enable JSON output (default: false)
pub fn init_tracing() {
    install(json_requested());
}

/// `RBAC_TRACE_JSON` read with the same rules as `RbacConfig::from_env`
fn json_requested() -> bool {
    std::env::var("RBAC_TRACE_JSON")
        .ok()
        .and_then(|value| parse_flag("RBAC_TRACE_JSON", &value).ok())
        .unwrap_or(false)
}

/// Initialize structured tracing with the output format taken from configuration
pub fn init_tracing_with(config: &RbacConfig) {
    install(config.trace_json);
}

fn install(use_json: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(env_filter);

    // A subscriber may already be installed by the host application
    let installed = if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .is_ok()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
            .is_ok()
    };

    if installed {
        info!(json = use_json, "Structured tracing initialized");
    }
}

/// Generate a unique trace ID for request correlation
pub fn generate_trace_id() -> String {
    Uuid::new_v4().to_string()
}

/// Span covering one access check
pub struct AccessSpan {
    span: tracing::Span,
    start: Instant,
    permission: String,
    trace_id: String,
}

impl AccessSpan {
    pub fn new(subject: &Subject, permission: &str) -> Self {
        let trace_id = generate_trace_id();

        let span = span!(
            Level::DEBUG,
            "access_check",
            trace_id = %trace_id,
            subject = %subject,
            permission = permission,
            allowed = tracing::field::Empty,
            granted_by = tracing::field::Empty,
            duration_us = tracing::field::Empty,
        );

        Self {
            span,
            start: Instant::now(),
            permission: permission.to_string(),
            trace_id,
        }
    }

    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    /// Record the outcome and the stored name that granted it, if any
    pub fn record_decision(&self, allowed: bool, granted_by: Option<&str>) {
        self.span.record("allowed", allowed);
        if let Some(name) = granted_by {
            self.span.record("granted_by", name);
        }
    }

    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }
}

impl Drop for AccessSpan {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        let _entered = self.span.enter();
        self.span.record("duration_us", duration.as_micros() as u64);

        if duration.as_millis() > SLOW_CHECK_THRESHOLD_MS {
            warn!(
                trace_id = %self.trace_id,
                permission = %self.permission,
                duration_ms = duration.as_millis() as u64,
                slow = true,
                "slow access check"
            );
        } else {
            debug!(
                trace_id = %self.trace_id,
                permission = %self.permission,
                duration_us = duration.as_micros() as u64,
                "access check completed"
            );
        }
    }
}

#[inline]
pub fn span_access(subject: &Subject, permission: &str) -> AccessSpan {
    AccessSpan::new(subject, permission)
}
