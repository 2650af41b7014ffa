//! Outcome flags for a task or sequence, derived from its trace subtree.
//!
//! Every classifier is total: a missing payload, a missing result or an
//! empty subtree yields `false` rather than an error. Trees are only read.

use serde::Serialize;
use tracing::trace;

use super::tree_query::{
    find_finished_event, find_problem_resolution, is_problem_event,
};
use crate::domain::event_types::{
    APPROVAL_FINISHED, APPROVAL_TRIGGERED, REMEDIATION_FINISHED_SUFFIX,
};
use crate::domain::{ApprovalResult, EventResult, Outcome, Trace};

/// The task's own finished event failed, or it is a declined approval
pub fn is_failed(trace: &Trace) -> bool {
    let finished_failed = find_finished_event(trace)
        .map(|finished| finished.result() == EventResult::Fail)
        .unwrap_or(false);

    finished_failed || (is_approval_finished(trace) && is_declined(trace))
}

/// Whether anything in the subtree failed.
///
/// With a stage filter the answer is additionally gated on `trace`'s own
/// stage. Only this top-level call is gated: a fault found in a descendant
/// of another stage still counts when the root's stage matches.
pub fn is_faulty(trace: &Trace, stage: Option<&str>) -> bool {
    if trace.data.is_none() {
        return false;
    }

    let faulty = is_failed(trace) || trace.traces.iter().any(|t| is_faulty(t, None));

    faulty && stage_matches(trace, stage)
}

/// Whether a finished event in the subtree reported a warning.
///
/// Gated on stage the same way as [`is_faulty`].
pub fn is_warning(trace: &Trace, stage: Option<&str>) -> bool {
    let warning = has_warning(trace);
    warning && stage_matches(trace, stage)
}

fn has_warning(trace: &Trace) -> bool {
    let finished_warning = find_finished_event(trace)
        .map(|finished| finished.result() == EventResult::Warning)
        .unwrap_or(false);

    finished_warning || trace.traces.iter().any(has_warning)
}

/// The task finished and nothing below it failed or warned
pub fn is_successful(trace: &Trace, stage: Option<&str>) -> bool {
    let successful = find_finished_event(trace).is_some()
        && !is_faulty(trace, None)
        && !has_warning(trace);

    successful && stage_matches(trace, stage)
}

pub fn is_approval_finished(trace: &Trace) -> bool {
    trace.event_type == APPROVAL_FINISHED
}

/// An approval was requested and has not been answered yet
pub fn is_approval_pending(trace: &Trace) -> bool {
    trace.event_type == APPROVAL_TRIGGERED && find_finished_event(trace).is_none()
}

pub fn is_declined(trace: &Trace) -> bool {
    trace
        .as_approval()
        .map(|approval| approval.result == ApprovalResult::Declined)
        .unwrap_or(false)
}

/// Whether some remediation in the subtree finished without failing.
///
/// Only leaves are inspected; inner nodes defer to their children.
pub fn is_successful_remediation(trace: &Trace) -> bool {
    if trace.traces.is_empty() {
        return trace.event_type.ends_with(REMEDIATION_FINISHED_SUFFIX)
            && trace.result() != EventResult::Fail;
    }

    trace.traces.iter().any(is_successful_remediation)
}

/// Three-way outcome combining the stage-gated tree predicates
pub fn outcome(trace: &Trace, stage: Option<&str>) -> Outcome {
    Outcome::from_flags(
        is_faulty(trace, stage),
        is_warning(trace, stage),
        is_successful(trace, stage),
    )
}

fn stage_matches(trace: &Trace, stage: Option<&str>) -> bool {
    match stage {
        None => true,
        Some(wanted) => {
            let matches = trace.stage() == Some(wanted);
            if !matches {
                trace!(
                    trace_id = %trace.id,
                    stage = ?trace.stage(),
                    wanted,
                    "stage filter suppressed result"
                );
            }
            matches
        }
    }
}

/// Snapshot of every flag for one trace
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub id: String,
    pub label: String,
    pub stage: Option<String>,
    pub outcome: Outcome,
    pub is_failed: bool,
    pub is_faulty: bool,
    pub is_warning: bool,
    pub is_successful: bool,
    pub is_approval_pending: bool,
    pub is_declined: bool,
    pub is_successful_remediation: bool,
    pub is_problem: bool,
    pub is_problem_resolved: bool,
}

/// Evaluate all classifiers against `trace`
pub fn classify(trace: &Trace, stage: Option<&str>) -> Classification {
    let is_faulty = is_faulty(trace, stage);
    let is_warning = is_warning(trace, stage);
    let is_successful = is_successful(trace, stage);

    Classification {
        id: trace.id.clone(),
        label: trace.label().to_string(),
        stage: trace.stage().map(str::to_string),
        outcome: Outcome::from_flags(is_faulty, is_warning, is_successful),
        is_failed: is_failed(trace),
        is_faulty,
        is_warning,
        is_successful,
        is_approval_pending: is_approval_pending(trace),
        is_declined: is_declined(trace),
        is_successful_remediation: is_successful_remediation(trace),
        is_problem: is_problem_event(trace),
        is_problem_resolved: find_problem_resolution(trace),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EventData;

    fn finished(id: &str, task: &str, stage: &str, result: EventResult) -> Trace {
        Trace::new(id, format!("sh.keptn.event.{}.finished", task))
            .with_data(EventData::new().with_stage(stage).with_result(result))
    }

    fn triggered(id: &str, task: &str, stage: &str) -> Trace {
        Trace::new(id, format!("sh.keptn.event.{}.triggered", task))
            .with_data(EventData::new().with_stage(stage))
    }

    #[test]
    fn test_is_failed_from_finished_child() {
        let task = triggered("t", "test", "dev").with_child(finished("f", "test", "dev", EventResult::Fail));
        assert!(is_failed(&task));

        let passed = triggered("t", "test", "dev").with_child(finished("f", "test", "dev", EventResult::Pass));
        assert!(!is_failed(&passed));
    }

    #[test]
    fn test_declined_approval_is_failed() {
        let declined = Trace::new("a", APPROVAL_FINISHED)
            .with_data(EventData::new().with_approval(ApprovalResult::Declined));
        assert!(is_approval_finished(&declined));
        assert!(is_declined(&declined));
        assert!(is_failed(&declined));

        let approved = Trace::new("a", APPROVAL_FINISHED)
            .with_data(EventData::new().with_approval(ApprovalResult::Approved));
        assert!(!is_failed(&approved));
    }

    #[test]
    fn test_declined_outside_approval_finished_is_not_failed() {
        let odd = Trace::new("a", "sh.keptn.event.approval.started")
            .with_data(EventData::new().with_approval(ApprovalResult::Declined));
        assert!(is_declined(&odd));
        assert!(!is_failed(&odd));
    }

    #[test]
    fn test_is_faulty_recurses_full_depth() {
        let tree = triggered("root", "delivery", "dev").with_child(
            triggered("deploy", "deployment", "dev").with_child(
                triggered("test", "test", "dev").with_child(finished("f", "test", "dev", EventResult::Fail)),
            ),
        );

        assert!(is_faulty(&tree, None));
        assert!(is_faulty(&tree, Some("dev")));
        assert!(!is_faulty(&tree, Some("staging")));
    }

    #[test]
    fn test_is_faulty_requires_data() {
        let bare = Trace::new("t", "sh.keptn.event.test.triggered")
            .with_child(finished("f", "test", "dev", EventResult::Fail));
        assert!(!is_faulty(&bare, None));
    }

    #[test]
    fn test_stage_gate_applies_only_at_top() {
        // Root in staging, failing descendant in dev
        let tree = triggered("root", "delivery", "staging")
            .with_child(triggered("t", "test", "dev").with_child(finished("f", "test", "dev", EventResult::Fail)));

        assert!(is_faulty(&tree, Some("staging")));
        assert!(!is_faulty(&tree, Some("dev")));
    }

    #[test]
    fn test_warning_and_success() {
        let warned = triggered("t", "evaluation", "dev")
            .with_child(finished("f", "evaluation", "dev", EventResult::Warning));
        assert!(is_warning(&warned, None));
        assert!(!is_successful(&warned, None));
        assert_eq!(outcome(&warned, None), Outcome::Warning);

        let passed = triggered("t", "evaluation", "dev")
            .with_child(finished("f", "evaluation", "dev", EventResult::Pass));
        assert!(!is_warning(&passed, None));
        assert!(is_successful(&passed, None));
        assert!(!is_successful(&passed, Some("prod")));
        assert_eq!(outcome(&passed, Some("dev")), Outcome::Success);

        let running = triggered("t", "evaluation", "dev")
            .with_child(Trace::new("s", "sh.keptn.event.evaluation.started"));
        assert!(!is_successful(&running, None));
        assert_eq!(outcome(&running, None), Outcome::Unknown);
    }

    #[test]
    fn test_approval_pending() {
        let pending = Trace::new("a", APPROVAL_TRIGGERED)
            .with_child(Trace::new("s", "sh.keptn.event.approval.started"));
        assert!(is_approval_pending(&pending));

        let answered = pending.clone().with_child(Trace::new("f", APPROVAL_FINISHED));
        assert!(!is_approval_pending(&answered));
    }

    #[test]
    fn test_successful_remediation_leaf_rules() {
        let ok = Trace::new("r", "sh.keptn.event.remediation.finished");
        assert!(is_successful_remediation(&ok));

        let failed = Trace::new("r", "sh.keptn.event.remediation.finished")
            .with_data(EventData::new().with_result(EventResult::Fail));
        assert!(!is_successful_remediation(&failed));

        // Inner nodes are judged only by their children
        let inner = Trace::new("r", "sh.keptn.event.remediation.finished")
            .with_child(Trace::new("x", "sh.keptn.event.action.finished"));
        assert!(!is_successful_remediation(&inner));
    }

    #[test]
    fn test_classify_snapshot() {
        let tree = triggered("t", "test", "dev").with_child(finished("f", "test", "dev", EventResult::Fail));
        let classification = classify(&tree, None);

        assert_eq!(classification.id, "t");
        assert_eq!(classification.label, "test");
        assert_eq!(classification.stage.as_deref(), Some("dev"));
        assert_eq!(classification.outcome, Outcome::Error);
        assert!(classification.is_failed);
        assert!(classification.is_faulty);
        assert!(!classification.is_successful);
        assert!(!classification.is_problem);
    }

    #[test]
    fn test_classifiers_are_idempotent() {
        let tree = triggered("t", "test", "dev").with_child(finished("f", "test", "dev", EventResult::Warning));
        assert_eq!(classify(&tree, Some("dev")), classify(&tree, Some("dev")));
    }
}
