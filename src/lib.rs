//! seqstatus - Status derivation for delivery sequence event trees
//!
//! A continuous-delivery sequence reports its progress as a tree of
//! timestamped events. This crate interprets an already-received tree and
//! derives what a dashboard shows for it.
//!
//! # Architecture
//!
//! Data flows one way:
//! - Events are parsed and nested into a `Trace` tree
//! - Tree queries and classifiers derive outcome flags
//! - Scores are truncated for display
//! - Badge state combines the flags, score and a caller-chosen fill
//!
//! Every derivation is a pure function of the tree. Missing data yields
//! `false` or `None`, never an error.
//!
//! # Modules
//!
//! - `domain`: Data structures (Trace, EventData, result enums)
//! - `core`: Derivation logic (TreeQuery, Classifier, Score, Badge)
//! - `config`: Defaults for score precision, fill and stage filter
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Badge for the evaluation in a sequence
//! seqstatus badge events.json --fill border
//!
//! # Every classifier flag, gated on a stage
//! cat events.json | seqstatus inspect --stage staging
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;

// Re-export main types at crate root for convenience
pub use crate::core::{
    build_from_evaluation_node, build_from_evaluation_result, BadgeState, BadgeStateBuilder,
    EvaluationBearing, EvaluationResult, FillState,
};
pub use crate::domain::{EventData, EventPhase, EventResult, Outcome, Trace};
