//! Assembly of received events into trace trees.
//!
//! The event store returns events as a flat list. Each event names its cause
//! through `triggeredid`; an event becomes a child of the event it names and
//! children keep their input order. Events whose cause is missing from the
//! input become roots.

use std::collections::{HashMap, HashSet};

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::domain::Trace;

/// Reasons a set of events cannot form one sequence
#[derive(Debug, Error)]
pub enum AssembleError {
    #[error("Event {event_id} belongs to sequence {found}, expected {expected}")]
    MixedContext {
        expected: String,
        found: String,
        event_id: String,
    },

    #[error("Duplicate event id: {0}")]
    DuplicateId(String),

    #[error("Events form a cycle and have no root: {}", .ids.join(", "))]
    Cycle { ids: Vec<String> },

    #[error("Invalid event JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Nest `events` by `triggeredid`.
///
/// Events may already carry nested `traces`; those are kept in place and
/// assembled children are appended after them. Only top-level events are
/// candidates for parents.
pub fn assemble(events: Vec<Trace>) -> Result<Vec<Trace>, AssembleError> {
    check_sequence(&events)?;

    let index: HashMap<&str, usize> = events
        .iter()
        .enumerate()
        .map(|(pos, event)| (event.id.as_str(), pos))
        .collect();

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); events.len()];
    let mut roots = Vec::new();

    for (pos, event) in events.iter().enumerate() {
        let parent = event
            .triggeredid
            .as_deref()
            .and_then(|id| index.get(id).copied());

        match parent {
            Some(parent) if parent != pos => children[parent].push(pos),
            _ => {
                if let Some(ref cause) = event.triggeredid {
                    debug!(event_id = %event.id, cause = %cause, "cause not in input, treating as root");
                }
                roots.push(pos);
            }
        }
    }

    let mut slots: Vec<Option<Trace>> = events.into_iter().map(Some).collect();
    let trees: Vec<Trace> = roots
        .into_iter()
        .filter_map(|pos| attach(pos, &mut slots, &children))
        .collect();

    let unattached: Vec<String> = slots.iter().flatten().map(|t| t.id.clone()).collect();
    if !unattached.is_empty() {
        return Err(AssembleError::Cycle { ids: unattached });
    }

    debug!(roots = trees.len(), "assembled event trees");
    Ok(trees)
}

fn attach(pos: usize, slots: &mut [Option<Trace>], children: &[Vec<usize>]) -> Option<Trace> {
    let mut trace = slots[pos].take()?;
    for &child in &children[pos] {
        if let Some(child) = attach(child, slots, children) {
            trace.traces.push(child);
        }
    }
    Some(trace)
}

/// All ids unique and all nodes on one `shkeptncontext`.
///
/// Nodes without a context are not checked against the others.
fn check_sequence(events: &[Trace]) -> Result<(), AssembleError> {
    let mut seen = HashSet::new();
    let mut context: Option<&str> = None;

    let mut stack: Vec<&Trace> = events.iter().rev().collect();
    while let Some(trace) = stack.pop() {
        if !seen.insert(trace.id.as_str()) {
            return Err(AssembleError::DuplicateId(trace.id.clone()));
        }

        if !trace.shkeptncontext.is_empty() {
            match context {
                None => context = Some(trace.shkeptncontext.as_str()),
                Some(expected) if expected != trace.shkeptncontext => {
                    return Err(AssembleError::MixedContext {
                        expected: expected.to_string(),
                        found: trace.shkeptncontext.clone(),
                        event_id: trace.id.clone(),
                    });
                }
                Some(_) => {}
            }
        }

        stack.extend(trace.traces.iter().rev());
    }

    Ok(())
}

/// Parse events as received from the event store.
///
/// Accepts a single (possibly nested) trace object, an array of events, or
/// an event store page `{"events": [...]}`. Arrays and pages are assembled.
pub fn parse_events(json: &str) -> Result<Vec<Trace>, AssembleError> {
    let value: Value = serde_json::from_str(json)?;

    match value {
        Value::Array(_) => assemble(serde_json::from_value(value)?),
        Value::Object(ref object) if !object.contains_key("type") && object.contains_key("events") => {
            let events = object.get("events").cloned().unwrap_or(Value::Null);
            assemble(serde_json::from_value(events)?)
        }
        _ => {
            let trace: Trace = serde_json::from_value(value)?;
            check_sequence(std::slice::from_ref(&trace))?;
            Ok(vec![trace])
        }
    }
}
