//! Event type names and lifecycle phases.
//!
//! Event types are dotted strings of the form
//! `sh.keptn.event.<task>.<phase>`. The suffix carries the lifecycle phase
//! and is what classification keys on, so all suffix and constant handling
//! lives here.

use serde::{Deserialize, Serialize};

/// Approval task has finished (approved or declined)
pub const APPROVAL_FINISHED: &str = "sh.keptn.event.approval.finished";

/// Approval task has been requested
pub const APPROVAL_TRIGGERED: &str = "sh.keptn.event.approval.triggered";

/// Evaluation (quality gate) has finished
pub const EVALUATION_FINISHED: &str = "sh.keptn.event.evaluation.finished";

/// Problem reported by a monitoring integration (legacy type name)
pub const PROBLEM_DETECTED: &str = "sh.keptn.events.problem";

/// Problem opened
pub const PROBLEM_OPEN: &str = "sh.keptn.event.problem.open";

/// Suffix shared by all remediation finished events
pub const REMEDIATION_FINISHED_SUFFIX: &str = "remediation.finished";

const TRIGGERED_SUFFIX: &str = ".triggered";
const STARTED_SUFFIX: &str = ".started";
const FINISHED_SUFFIX: &str = ".finished";

const EVENT_PREFIX: &str = "sh.keptn.event.";

/// Lifecycle phase of one logical task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventPhase {
    /// Task was requested
    Triggered,

    /// Task execution began
    Started,

    /// Task execution ended (with a result)
    Finished,
}

impl EventPhase {
    /// Derive the phase from an event type, if it has a lifecycle suffix
    pub fn of(event_type: &str) -> Option<Self> {
        if event_type.ends_with(FINISHED_SUFFIX) {
            Some(Self::Finished)
        } else if event_type.ends_with(STARTED_SUFFIX) {
            Some(Self::Started)
        } else if event_type.ends_with(TRIGGERED_SUFFIX) {
            Some(Self::Triggered)
        } else {
            None
        }
    }

    /// Wire suffix for this phase, including the leading dot
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Triggered => TRIGGERED_SUFFIX,
            Self::Started => STARTED_SUFFIX,
            Self::Finished => FINISHED_SUFFIX,
        }
    }
}

/// Extract the task segment from a lifecycle event type.
///
/// `sh.keptn.event.deployment.finished` yields `deployment`. Sequence-scoped
/// types such as `sh.keptn.event.dev.delivery.triggered` yield the last
/// segment before the phase (`delivery`). Types without a lifecycle suffix
/// yield `None`.
pub fn task_name(event_type: &str) -> Option<&str> {
    let phase = EventPhase::of(event_type)?;
    let stem = event_type.strip_suffix(phase.suffix())?;
    let stem = stem.strip_prefix(EVENT_PREFIX).unwrap_or(stem);

    match stem.rsplit('.').next() {
        Some(task) if !task.is_empty() => Some(task),
        _ => None,
    }
}
