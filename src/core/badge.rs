//! Badge state composition.
//!
//! A badge shows one evaluation outcome plus an optional score. The fill
//! variant is chosen by the caller and carried through untouched, so the
//! display space is the three outcomes times the three fill variants.

use serde::{Deserialize, Serialize};

use super::evaluation::EvaluationBearing;
use super::score::{normalize, DEFAULT_DECIMALS};
use crate::domain::trace::lenient_score;
use crate::domain::{EventResult, Outcome};

/// Rendering intent for a badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FillState {
    Fill,
    Border,
    #[default]
    None,
}

/// Render-facing snapshot for one badge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeState {
    pub is_error: bool,
    pub is_warning: bool,
    pub is_success: bool,

    /// Truncated score, `None` when no score applies
    pub score: Option<f64>,

    pub fill_state: FillState,
}

impl BadgeState {
    /// Collapse the flags into one outcome (Error > Warning > Success)
    pub fn outcome(&self) -> Outcome {
        Outcome::from_flags(self.is_error, self.is_warning, self.is_success)
    }
}

/// An evaluation already reduced to result and score
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EvaluationResult {
    #[serde(default)]
    pub result: EventResult,

    #[serde(default, deserialize_with = "lenient_score")]
    pub score: Option<f64>,
}

impl EvaluationResult {
    pub fn new(result: EventResult, score: f64) -> Self {
        Self {
            result,
            score: Some(score),
        }
    }
}

/// Builds badge states with a fixed score precision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeStateBuilder {
    decimals: u32,
}

impl Default for BadgeStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BadgeStateBuilder {
    pub fn new() -> Self {
        Self {
            decimals: DEFAULT_DECIMALS,
        }
    }

    /// Keep `decimals` places of the score instead of none
    pub fn with_decimals(mut self, decimals: u32) -> Self {
        self.decimals = decimals;
        self
    }

    pub fn decimals(&self) -> u32 {
        self.decimals
    }

    /// Badge for an evaluation-bearing node
    pub fn from_evaluation_node<E>(&self, node: &E, fill_state: FillState) -> BadgeState
    where
        E: EvaluationBearing + ?Sized,
    {
        BadgeState {
            is_error: node.is_faulty(),
            is_warning: node.is_warning(),
            is_success: node.is_successful(),
            score: normalize(node.evaluation_score(), self.decimals),
            fill_state,
        }
    }

    /// Badge for a summarised evaluation. A missing summary gives a
    /// neutral badge: all flags false and no score.
    pub fn from_evaluation_result(
        &self,
        result: Option<&EvaluationResult>,
        fill_state: FillState,
    ) -> BadgeState {
        let outcome = result.map(|r| r.result).unwrap_or_default();

        BadgeState {
            is_error: outcome == EventResult::Fail,
            is_warning: outcome == EventResult::Warning,
            is_success: outcome == EventResult::Pass,
            score: normalize(result.and_then(|r| r.score), self.decimals),
            fill_state,
        }
    }
}

/// [`BadgeStateBuilder::from_evaluation_node`] with whole-number scores
pub fn build_from_evaluation_node<E>(node: &E, fill_state: FillState) -> BadgeState
where
    E: EvaluationBearing + ?Sized,
{
    BadgeStateBuilder::new().from_evaluation_node(node, fill_state)
}

/// [`BadgeStateBuilder::from_evaluation_result`] with whole-number scores
pub fn build_from_evaluation_result(
    result: Option<&EvaluationResult>,
    fill_state: FillState,
) -> BadgeState {
    BadgeStateBuilder::new().from_evaluation_result(result, fill_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Trace;

    /// Stand-in bearer with fixed answers
    struct Fixed {
        result: EventResult,
        score: Option<f64>,
    }

    impl EvaluationBearing for Fixed {
        fn evaluation_finished_event(&self) -> Option<&Trace> {
            None
        }

        fn evaluation_result(&self) -> EventResult {
            self.result
        }

        fn evaluation_score(&self) -> Option<f64> {
            self.score
        }
    }

    #[test]
    fn test_node_badge_without_score() {
        let node = Fixed {
            result: EventResult::Pass,
            score: None,
        };

        let badge = build_from_evaluation_node(&node, FillState::None);
        assert_eq!(
            badge,
            BadgeState {
                is_error: false,
                is_warning: false,
                is_success: true,
                score: None,
                fill_state: FillState::None,
            }
        );
    }

    #[test]
    fn test_result_badge_failed_truncates_score() {
        let result = EvaluationResult::new(EventResult::Fail, 0.56);
        let badge = build_from_evaluation_result(Some(&result), FillState::Fill);

        assert!(badge.is_error);
        assert!(!badge.is_warning);
        assert!(!badge.is_success);
        assert_eq!(badge.score, Some(0.0));
        assert_eq!(badge.fill_state, FillState::Fill);
        assert_eq!(badge.outcome(), Outcome::Error);
    }

    #[test]
    fn test_missing_result_is_neutral() {
        let badge = build_from_evaluation_result(None, FillState::Border);
        assert_eq!(badge.outcome(), Outcome::Unknown);
        assert_eq!(badge.score, None);
        assert_eq!(badge.fill_state, FillState::Border);
    }

    #[test]
    fn test_builder_decimals() {
        let builder = BadgeStateBuilder::new().with_decimals(1);
        let result = EvaluationResult::new(EventResult::Warning, 72.89);
        assert_eq!(
            builder.from_evaluation_result(Some(&result), FillState::None).score,
            Some(72.8)
        );
        assert_eq!(BadgeStateBuilder::default().decimals(), 0);
    }

    #[test]
    fn test_wire_format() {
        let result = EvaluationResult::new(EventResult::Pass, 98.7);
        let badge = build_from_evaluation_result(Some(&result), FillState::Border);
        let json = serde_json::to_value(badge).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "isError": false,
                "isWarning": false,
                "isSuccess": true,
                "score": 98.0,
                "fillState": "BORDER"
            })
        );

        let parsed: EvaluationResult =
            serde_json::from_str(r#"{"result": "warning", "score": "61.2"}"#).unwrap();
        assert_eq!(parsed.result, EventResult::Warning);
        assert_eq!(parsed.score, Some(61.2));
    }
}
