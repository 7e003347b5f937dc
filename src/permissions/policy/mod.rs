/*!
 * Policy Module
 * Policy engine, evaluation context and the two lookup phases
 */

mod context;
mod engine;
mod exact;
mod pattern;

pub use context::EvaluationContext;
pub use engine::{Policy, PolicyDecision, PolicyEngine};
pub use exact::ExactPolicy;
pub use pattern::PatternPolicy;
