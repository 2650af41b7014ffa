//! Status derivation over trace trees.
//!
//! This module contains:
//! - TreeQuery: Predicate lookups within a tree
//! - Classifier: Outcome flags for tasks and sequences
//! - Evaluation: Three-way classification of one evaluation
//! - Score: Truncation of evaluation scores
//! - Badge: Render-facing badge state
//! - Assemble: Flat event lists into trees

pub mod assemble;
pub mod badge;
pub mod classifier;
pub mod evaluation;
pub mod score;
pub mod tree_query;

// Re-export commonly used types
pub use assemble::{assemble, parse_events, AssembleError};
pub use badge::{
    build_from_evaluation_node, build_from_evaluation_result, BadgeState, BadgeStateBuilder,
    EvaluationResult, FillState,
};
pub use classifier::{classify, Classification};
pub use evaluation::EvaluationBearing;
pub use score::normalize;
