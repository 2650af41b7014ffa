//! Domain types for sequence event trees.
//!
//! This module contains the core data structures:
//! - Trace: One reported event and its nested sub-events
//! - Event types: Wire type names and lifecycle phases
//! - Results: Closed enums over result and state strings

pub mod event_types;
pub mod results;
pub mod trace;

// Re-export commonly used types
pub use event_types::EventPhase;
pub use results::{ApprovalResult, EventResult, Outcome, ProblemState};
pub use trace::{ApprovalData, DeploymentData, EvaluationData, EventData, TestData, Trace};
