//! Predicate lookups over a trace tree.
//!
//! Searches are depth-first with a node checked before its children, so the
//! first match is the one closest to the root in arrival order. Search depth
//! differs per query and is part of each query's contract.

use crate::domain::event_types::{PROBLEM_DETECTED, PROBLEM_OPEN};
use crate::domain::{EventPhase, Trace};

pub fn is_finished_event(trace: &Trace) -> bool {
    trace.phase() == Some(EventPhase::Finished)
}

pub fn is_started_event(trace: &Trace) -> bool {
    trace.phase() == Some(EventPhase::Started)
}

pub fn is_triggered_event(trace: &Trace) -> bool {
    trace.phase() == Some(EventPhase::Triggered)
}

/// Problem opened or problem detected
pub fn is_problem_event(trace: &Trace) -> bool {
    trace.event_type == PROBLEM_OPEN || trace.event_type == PROBLEM_DETECTED
}

/// The finished counterpart of a task.
///
/// Returns `trace` itself if it is a finished event, otherwise the first
/// direct child that is. Grandchildren are never searched.
pub fn find_finished_event(trace: &Trace) -> Option<&Trace> {
    if is_finished_event(trace) {
        return Some(trace);
    }
    trace.traces.iter().find(|t| is_finished_event(t))
}

/// Whether the problem tracked by `trace` has been resolved or closed.
///
/// A leaf answers from its own `State`. An inner node is resolved if any
/// child is a problem event whose own subtree is resolved.
pub fn find_problem_resolution(trace: &Trace) -> bool {
    if trace.traces.is_empty() {
        return trace.problem_state().is_resolved_or_closed();
    }

    trace
        .traces
        .iter()
        .any(|t| is_problem_event(t) && find_problem_resolution(t))
}

/// First node in depth-first order matching `predicate`
pub fn find_trace<F>(trace: &Trace, predicate: F) -> Option<&Trace>
where
    F: Fn(&Trace) -> bool,
{
    find_first(trace, &predicate)
}

fn find_first<'a, F>(trace: &'a Trace, predicate: &F) -> Option<&'a Trace>
where
    F: Fn(&Trace) -> bool,
{
    if predicate(trace) {
        return Some(trace);
    }
    trace.traces.iter().find_map(|t| find_first(t, predicate))
}

/// Last node in depth-first order matching `predicate`
pub fn find_last_trace<F>(trace: &Trace, predicate: F) -> Option<&Trace>
where
    F: Fn(&Trace) -> bool,
{
    find_last(trace, &predicate)
}

fn find_last<'a, F>(trace: &'a Trace, predicate: &F) -> Option<&'a Trace>
where
    F: Fn(&Trace) -> bool,
{
    trace
        .traces
        .iter()
        .rev()
        .find_map(|t| find_last(t, predicate))
        .or_else(|| predicate(trace).then_some(trace))
}

/// Number of nodes in the tree, including `trace`
pub fn count_traces(trace: &Trace) -> usize {
    1 + trace.traces.iter().map(count_traces).sum::<usize>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EventData, ProblemState};

    fn deployment_tree() -> Trace {
        Trace::new("t1", "sh.keptn.event.deployment.triggered")
            .with_child(Trace::new("s1", "sh.keptn.event.deployment.started"))
            .with_child(
                Trace::new("f1", "sh.keptn.event.deployment.finished").with_child(Trace::new(
                    "t2",
                    "sh.keptn.event.test.triggered",
                )),
            )
            .with_child(Trace::new("f2", "sh.keptn.event.deployment.finished"))
    }

    #[test]
    fn test_find_finished_self_first() {
        let finished = Trace::new("f", "sh.keptn.event.test.finished")
            .with_child(Trace::new("f-child", "sh.keptn.event.test.finished"));

        assert_eq!(find_finished_event(&finished).map(|t| t.id.as_str()), Some("f"));
    }

    #[test]
    fn test_find_finished_first_direct_child() {
        let tree = deployment_tree();
        assert_eq!(find_finished_event(&tree).map(|t| t.id.as_str()), Some("f1"));
    }

    #[test]
    fn test_find_finished_does_not_search_grandchildren() {
        let tree = Trace::new("t1", "sh.keptn.event.deployment.triggered").with_child(
            Trace::new("s1", "sh.keptn.event.deployment.started")
                .with_child(Trace::new("f1", "sh.keptn.event.deployment.finished")),
        );

        assert!(find_finished_event(&tree).is_none());
    }

    #[test]
    fn test_phase_predicates() {
        let started = Trace::new("s", "sh.keptn.event.test.started");
        assert!(is_started_event(&started));
        assert!(!is_finished_event(&started));
        assert!(!is_triggered_event(&started));
        assert!(is_problem_event(&Trace::new("p", PROBLEM_OPEN)));
        assert!(is_problem_event(&Trace::new("p", PROBLEM_DETECTED)));
        assert!(!is_problem_event(&Trace::new("p", "sh.keptn.event.problem.close")));
    }

    #[test]
    fn test_problem_resolution_leaf() {
        let resolved = Trace::new("p", PROBLEM_OPEN)
            .with_data(EventData::new().with_problem_state(ProblemState::Resolved));
        let closed = Trace::new("p", PROBLEM_OPEN)
            .with_data(EventData::new().with_problem_state(ProblemState::Closed));
        let open = Trace::new("p", PROBLEM_OPEN)
            .with_data(EventData::new().with_problem_state(ProblemState::Open));

        assert!(find_problem_resolution(&resolved));
        assert!(find_problem_resolution(&closed));
        assert!(!find_problem_resolution(&open));
        assert!(!find_problem_resolution(&Trace::new("p", PROBLEM_OPEN)));
    }

    #[test]
    fn test_problem_resolution_requires_problem_child() {
        let resolved_child = |event_type: &str| {
            Trace::new("c", event_type)
                .with_data(EventData::new().with_problem_state(ProblemState::Resolved))
        };

        let via_problem = Trace::new("root", PROBLEM_OPEN)
            .with_data(EventData::new().with_problem_state(ProblemState::Open))
            .with_child(resolved_child(PROBLEM_DETECTED));
        let via_other = Trace::new("root", PROBLEM_OPEN)
            .with_child(resolved_child("sh.keptn.event.remediation.finished"));

        assert!(find_problem_resolution(&via_problem));
        assert!(!find_problem_resolution(&via_other));
    }

    #[test]
    fn test_find_trace_depth_first_order() {
        let tree = deployment_tree();

        let first = find_trace(&tree, |t| t.id.starts_with('f') || t.id == "t2");
        assert_eq!(first.map(|t| t.id.as_str()), Some("f1"));

        let nested = find_trace(&tree, |t| is_triggered_event(t) && t.id != "t1");
        assert_eq!(nested.map(|t| t.id.as_str()), Some("t2"));

        let last = find_last_trace(&tree, is_finished_event);
        assert_eq!(last.map(|t| t.id.as_str()), Some("f2"));

        let last_triggered = find_last_trace(&tree, is_triggered_event);
        assert_eq!(last_triggered.map(|t| t.id.as_str()), Some("t2"));

        assert!(find_trace(&tree, |t| t.id == "missing").is_none());
    }

    #[test]
    fn test_count_traces() {
        assert_eq!(count_traces(&deployment_tree()), 5);
    }
}
