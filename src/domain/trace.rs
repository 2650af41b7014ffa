//! Event tree for one sequence execution.
//!
//! A `Trace` is one reported event with the events nested beneath it. The
//! tree is rooted at a `.triggered` event; its `.started`/`.finished`
//! counterparts and any tasks they triggered hang below it in arrival order.
//! All nodes of one tree share the same `shkeptncontext`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::event_types::{self, EventPhase};
use super::results::{ApprovalResult, EventResult, ProblemState};

/// One event and its nested sub-events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    /// Opaque unique identifier
    pub id: String,

    /// Dotted event type, e.g. `sh.keptn.event.deployment.finished`
    #[serde(rename = "type")]
    pub event_type: String,

    /// When the event was reported (ISO 8601)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<DateTime<Utc>>,

    /// Component that reported the event
    #[serde(default)]
    pub source: String,

    /// Correlation id shared by every event of the sequence
    #[serde(default)]
    pub shkeptncontext: String,

    /// Id of the event that caused this one (absent for the root)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triggeredid: Option<String>,

    /// Payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<EventData>,

    /// Nested events in arrival order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub traces: Vec<Trace>,
}

impl Trace {
    /// Create a trace with no payload and no children
    pub fn new(id: impl Into<String>, event_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            event_type: event_type.into(),
            time: None,
            source: String::new(),
            shkeptncontext: String::new(),
            triggeredid: None,
            data: None,
            traces: Vec::new(),
        }
    }

    pub fn with_context(mut self, shkeptncontext: impl Into<String>) -> Self {
        self.shkeptncontext = shkeptncontext.into();
        self
    }

    pub fn with_triggered_id(mut self, triggeredid: impl Into<String>) -> Self {
        self.triggeredid = Some(triggeredid.into());
        self
    }

    pub fn with_time(mut self, time: DateTime<Utc>) -> Self {
        self.time = Some(time);
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_data(mut self, data: EventData) -> Self {
        self.data = Some(data);
        self
    }

    /// Append a child, keeping insertion order
    pub fn with_child(mut self, child: Trace) -> Self {
        self.traces.push(child);
        self
    }

    /// Lifecycle phase from the type suffix
    pub fn phase(&self) -> Option<EventPhase> {
        EventPhase::of(&self.event_type)
    }

    /// Short display label: the task name, or the full type for
    /// non-lifecycle events
    pub fn label(&self) -> &str {
        event_types::task_name(&self.event_type).unwrap_or(&self.event_type)
    }

    /// Reported result, `Unset` when there is no payload or no result
    pub fn result(&self) -> EventResult {
        self.data.as_ref().map(|d| d.result).unwrap_or_default()
    }

    pub fn project(&self) -> Option<&str> {
        self.data.as_ref()?.project.as_deref()
    }

    pub fn service(&self) -> Option<&str> {
        self.data.as_ref()?.service.as_deref()
    }

    pub fn stage(&self) -> Option<&str> {
        self.data.as_ref()?.stage.as_deref()
    }

    pub fn as_evaluation(&self) -> Option<&EvaluationData> {
        self.data.as_ref()?.evaluation.as_ref()
    }

    pub fn as_approval(&self) -> Option<&ApprovalData> {
        self.data.as_ref()?.approval.as_ref()
    }

    pub fn as_test(&self) -> Option<&TestData> {
        self.data.as_ref()?.test.as_ref()
    }

    pub fn as_deployment(&self) -> Option<&DeploymentData> {
        self.data.as_ref()?.deployment.as_ref()
    }

    /// Problem state, `Unset` when the payload carries none
    pub fn problem_state(&self) -> ProblemState {
        self.data.as_ref().map(|d| d.problem_state).unwrap_or_default()
    }
}

/// Event payload.
///
/// Known fields are typed; everything else is kept in `extra` so a trace
/// can be re-serialised without losing data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,

    #[serde(default, skip_serializing_if = "is_unset_result")]
    pub result: EventResult,

    /// Free-text progress indicator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<EvaluationData>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approval: Option<ApprovalData>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test: Option<TestData>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment: Option<DeploymentData>,

    #[serde(rename = "State", default, skip_serializing_if = "is_unset_problem")]
    pub problem_state: ProblemState,

    #[serde(rename = "ProblemTitle", default, skip_serializing_if = "Option::is_none")]
    pub problem_title: Option<String>,

    #[serde(rename = "ProblemID", default, skip_serializing_if = "Option::is_none")]
    pub problem_id: Option<String>,

    /// Fields not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EventData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stage(mut self, stage: impl Into<String>) -> Self {
        self.stage = Some(stage.into());
        self
    }

    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }

    pub fn with_result(mut self, result: EventResult) -> Self {
        self.result = result;
        self
    }

    pub fn with_evaluation(mut self, evaluation: EvaluationData) -> Self {
        self.evaluation = Some(evaluation);
        self
    }

    pub fn with_approval(mut self, result: ApprovalResult) -> Self {
        self.approval = Some(ApprovalData {
            result,
            status: None,
        });
        self
    }

    pub fn with_problem_state(mut self, state: ProblemState) -> Self {
        self.problem_state = state;
        self
    }
}

/// Quality gate result carried by evaluation events
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationData {
    /// Score, typically 0-100. Non-numeric values parse as NaN.
    #[serde(
        default,
        deserialize_with = "lenient_score",
        skip_serializing_if = "Option::is_none"
    )]
    pub score: Option<f64>,

    #[serde(default, skip_serializing_if = "is_unset_result")]
    pub result: EventResult,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_start: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_end: Option<String>,
}

impl EvaluationData {
    pub fn with_score(score: f64) -> Self {
        Self {
            score: Some(score),
            ..Default::default()
        }
    }
}

/// Manual approval outcome
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApprovalData {
    #[serde(default, skip_serializing_if = "is_unset_approval")]
    pub result: ApprovalResult,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Test execution window
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

/// Deployment details
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeploymentData {
    #[serde(rename = "deploymentURIsPublic", default, skip_serializing_if = "Vec::is_empty")]
    pub deployment_uris_public: Vec<String>,

    #[serde(rename = "deploymentURIsLocal", default, skip_serializing_if = "Vec::is_empty")]
    pub deployment_uris_local: Vec<String>,

    #[serde(rename = "deploymentstrategy", default, skip_serializing_if = "Option::is_none")]
    pub deployment_strategy: Option<String>,

    #[serde(rename = "deploymentNames", default, skip_serializing_if = "Vec::is_empty")]
    pub deployment_names: Vec<String>,
}

fn is_unset_result(result: &EventResult) -> bool {
    *result == EventResult::Unset
}

fn is_unset_approval(result: &ApprovalResult) -> bool {
    *result == ApprovalResult::Unset
}

fn is_unset_problem(state: &ProblemState) -> bool {
    *state == ProblemState::Unset
}

/// Accept numbers, numeric strings and null; anything else becomes NaN
pub(crate) fn lenient_score<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;

    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => Some(n.as_f64().unwrap_or(f64::NAN)),
        Some(Value::String(s)) => Some(s.trim().parse().unwrap_or(f64::NAN)),
        Some(_) => Some(f64::NAN),
    })
}
