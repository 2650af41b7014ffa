//! Classification of a single evaluation outcome.
//!
//! Unlike the tree classifiers, these answer for one evaluation: the
//! evaluation finished event reachable from the bearer. The three flags are
//! driven by that event's result and at most one of them is set.

use super::tree_query::find_trace;
use crate::domain::event_types::EVALUATION_FINISHED;
use crate::domain::{EventResult, Trace};

/// Anything that can expose a finished evaluation
pub trait EvaluationBearing {
    /// The finished evaluation event, if one has arrived
    fn evaluation_finished_event(&self) -> Option<&Trace>;

    /// Result of the evaluation, `Unset` if it has not finished.
    ///
    /// Prefers the event's own `result` and falls back to the result inside
    /// the evaluation sub-record.
    fn evaluation_result(&self) -> EventResult {
        let Some(finished) = self.evaluation_finished_event() else {
            return EventResult::Unset;
        };

        match finished.result() {
            EventResult::Unset => finished
                .as_evaluation()
                .map(|evaluation| evaluation.result)
                .unwrap_or_default(),
            result => result,
        }
    }

    /// Raw evaluation score, before truncation
    fn evaluation_score(&self) -> Option<f64> {
        self.evaluation_finished_event()?.as_evaluation()?.score
    }

    fn is_faulty(&self) -> bool {
        self.evaluation_result() == EventResult::Fail
    }

    fn is_warning(&self) -> bool {
        self.evaluation_result() == EventResult::Warning
    }

    fn is_successful(&self) -> bool {
        self.evaluation_result() == EventResult::Pass
    }
}

impl EvaluationBearing for Trace {
    /// `self` if it is the finished evaluation, else the first one found
    /// depth-first below it
    fn evaluation_finished_event(&self) -> Option<&Trace> {
        find_trace(self, |t| t.event_type == EVALUATION_FINISHED)
    }
}
