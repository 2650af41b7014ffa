//! Closed enums over the result and state strings found in event payloads.
//!
//! The wire strings are the only contract with the upstream event store.
//! Each enum converts from its wire string in exactly one place; anything
//! missing or unrecognised maps to `Unset` instead of failing.

use serde::{Deserialize, Serialize};

/// Result reported by a finished task or an evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum EventResult {
    /// "pass"
    Pass,

    /// "warning"
    Warning,

    /// "fail"
    Fail,

    /// Missing or unrecognised
    #[default]
    Unset,
}

impl EventResult {
    /// Wire representation, `None` for `Unset`
    pub fn as_str(self) -> Option<&'static str> {
        match self {
            Self::Pass => Some("pass"),
            Self::Warning => Some("warning"),
            Self::Fail => Some("fail"),
            Self::Unset => None,
        }
    }
}

impl From<&str> for EventResult {
    fn from(value: &str) -> Self {
        match value {
            "pass" => Self::Pass,
            "warning" => Self::Warning,
            "fail" => Self::Fail,
            _ => Self::Unset,
        }
    }
}

impl From<Option<String>> for EventResult {
    fn from(value: Option<String>) -> Self {
        value.as_deref().map(Self::from).unwrap_or_default()
    }
}

impl From<EventResult> for Option<String> {
    fn from(value: EventResult) -> Self {
        value.as_str().map(str::to_string)
    }
}

/// Outcome of a manual approval gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum ApprovalResult {
    /// "pass"
    Approved,

    /// "failed"
    Declined,

    /// Missing or unrecognised
    #[default]
    Unset,
}

impl ApprovalResult {
    /// Wire representation, `None` for `Unset`
    pub fn as_str(self) -> Option<&'static str> {
        match self {
            Self::Approved => Some("pass"),
            Self::Declined => Some("failed"),
            Self::Unset => None,
        }
    }
}

impl From<&str> for ApprovalResult {
    fn from(value: &str) -> Self {
        match value {
            "pass" => Self::Approved,
            "failed" => Self::Declined,
            _ => Self::Unset,
        }
    }
}

impl From<Option<String>> for ApprovalResult {
    fn from(value: Option<String>) -> Self {
        value.as_deref().map(Self::from).unwrap_or_default()
    }
}

impl From<ApprovalResult> for Option<String> {
    fn from(value: ApprovalResult) -> Self {
        value.as_str().map(str::to_string)
    }
}

/// State of a reported problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum ProblemState {
    /// "OPEN"
    Open,

    /// "RESOLVED"
    Resolved,

    /// "CLOSED"
    Closed,

    /// Missing or unrecognised
    #[default]
    Unset,
}

impl ProblemState {
    /// Wire representation, `None` for `Unset`
    pub fn as_str(self) -> Option<&'static str> {
        match self {
            Self::Open => Some("OPEN"),
            Self::Resolved => Some("RESOLVED"),
            Self::Closed => Some("CLOSED"),
            Self::Unset => None,
        }
    }

    /// Resolved and closed both count as no longer open
    pub fn is_resolved_or_closed(self) -> bool {
        matches!(self, Self::Resolved | Self::Closed)
    }
}

impl From<&str> for ProblemState {
    fn from(value: &str) -> Self {
        match value {
            "OPEN" => Self::Open,
            "RESOLVED" => Self::Resolved,
            "CLOSED" => Self::Closed,
            _ => Self::Unset,
        }
    }
}

impl From<Option<String>> for ProblemState {
    fn from(value: Option<String>) -> Self {
        value.as_deref().map(Self::from).unwrap_or_default()
    }
}

impl From<ProblemState> for Option<String> {
    fn from(value: ProblemState) -> Self {
        value.as_str().map(str::to_string)
    }
}

/// Three-way outcome of a task, sequence or evaluation.
///
/// Consumers receive the three booleans separately and nothing stops two of
/// them being set when upstream data is inconsistent. `Outcome` collapses
/// them with precedence Error > Warning > Success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Error,
    Warning,
    Success,
    Unknown,
}

impl Outcome {
    /// Collapse the boolean triple into one outcome
    pub fn from_flags(is_error: bool, is_warning: bool, is_success: bool) -> Self {
        if is_error {
            Self::Error
        } else if is_warning {
            Self::Warning
        } else if is_success {
            Self::Success
        } else {
            Self::Unknown
        }
    }

    /// Expand back into `(is_error, is_warning, is_success)`
    pub fn flags(self) -> (bool, bool, bool) {
        match self {
            Self::Error => (true, false, false),
            Self::Warning => (false, true, false),
            Self::Success => (false, false, true),
            Self::Unknown => (false, false, false),
        }
    }
}

impl From<EventResult> for Outcome {
    fn from(result: EventResult) -> Self {
        match result {
            EventResult::Fail => Self::Error,
            EventResult::Warning => Self::Warning,
            EventResult::Pass => Self::Success,
            EventResult::Unset => Self::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_result_from_wire() {
        assert_eq!(EventResult::from("pass"), EventResult::Pass);
        assert_eq!(EventResult::from("warning"), EventResult::Warning);
        assert_eq!(EventResult::from("fail"), EventResult::Fail);
        assert_eq!(EventResult::from("FAIL"), EventResult::Unset);
        assert_eq!(EventResult::from(None), EventResult::Unset);
    }

    #[test]
    fn test_event_result_null_and_unknown_in_json() {
        let parsed: Vec<EventResult> =
            serde_json::from_str(r#"["fail", null, "something-else"]"#).unwrap();
        assert_eq!(
            parsed,
            vec![EventResult::Fail, EventResult::Unset, EventResult::Unset]
        );
    }

    #[test]
    fn test_approval_declined_is_failed_string() {
        assert_eq!(ApprovalResult::from("failed"), ApprovalResult::Declined);
        assert_eq!(ApprovalResult::from("fail"), ApprovalResult::Unset);
        assert_eq!(ApprovalResult::from("pass"), ApprovalResult::Approved);
    }

    #[test]
    fn test_problem_state_resolution() {
        assert!(ProblemState::from("RESOLVED").is_resolved_or_closed());
        assert!(ProblemState::from("CLOSED").is_resolved_or_closed());
        assert!(!ProblemState::from("OPEN").is_resolved_or_closed());
        assert!(!ProblemState::Unset.is_resolved_or_closed());
    }

    #[test]
    fn test_outcome_precedence() {
        assert_eq!(Outcome::from_flags(true, false, true), Outcome::Error);
        assert_eq!(Outcome::from_flags(false, true, true), Outcome::Warning);
        assert_eq!(Outcome::from_flags(false, false, true), Outcome::Success);
        assert_eq!(Outcome::from_flags(false, false, false), Outcome::Unknown);
        assert_eq!(Outcome::Warning.flags(), (false, true, false));
    }
}
