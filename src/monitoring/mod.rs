/*!
 * Monitoring
 * Structured tracing for access checks
 */

pub mod tracer;

pub use tracer::{generate_trace_id, init_tracing, init_tracing_with, span_access, AccessSpan};
