//! Normalizes the runtime's raw event vocabulary into the canonical event
//! algebra consumed by the task state machine.
//!
//! Both streaming regimes land here: fine-grained execution events map to
//! `Token`/`ToolStart`/`ToolEnd`/`RunError`, coarse state snapshots map to
//! `Snapshot`. Everything else is suppressed so unknown event kinds can
//! never abort a stream.

use crate::runtime::{RunEvent, StateSnapshot, ThreadRole};

const UNKNOWN_TOOL: &str = "unknown";
const UNKNOWN_ERROR: &str = "Unknown error";

/// Canonical representation of one raw execution event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanonicalEvent {
    Token(String),
    ToolStart(String),
    ToolEnd(String),
    RunError(String),
    Snapshot(SnapshotKind),
}

/// What a coarse state snapshot says about the run. The snapshot regime
/// does not expose per-call tool identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotKind {
    ToolCallPending,
    ToolResult,
}

/// Maps raw events to canonical events, remembering the most recently
/// started tool so an end event that omits the name can still be narrated.
#[derive(Debug, Default)]
pub struct EventNormalizer {
    active_tool: Option<String>,
}

impl EventNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce zero or one canonical event for a raw event.
    pub fn normalize(&mut self, raw: RunEvent) -> Option<CanonicalEvent> {
        match raw {
            RunEvent::TokenChunk { text } => {
                if text.is_empty() {
                    None
                } else {
                    Some(CanonicalEvent::Token(text))
                }
            }
            RunEvent::ToolStart { name } => {
                let name = name.unwrap_or_else(|| UNKNOWN_TOOL.to_string());
                self.active_tool = Some(name.clone());
                Some(CanonicalEvent::ToolStart(name))
            }
            RunEvent::ToolEnd { name } => {
                let name = name
                    .or_else(|| self.active_tool.take())
                    .unwrap_or_else(|| UNKNOWN_TOOL.to_string());
                self.active_tool = None;
                Some(CanonicalEvent::ToolEnd(name))
            }
            RunEvent::ChainError { message } => Some(CanonicalEvent::RunError(
                message.unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
            )),
            RunEvent::StateSnapshot { snapshot } => self.normalize_snapshot(&snapshot),
            RunEvent::Other => None,
        }
    }

    fn normalize_snapshot(&self, snapshot: &StateSnapshot) -> Option<CanonicalEvent> {
        let message = snapshot.last_message.as_ref()?;
        if message.role == ThreadRole::Assistant && message.has_function_calls() {
            Some(CanonicalEvent::Snapshot(SnapshotKind::ToolCallPending))
        } else if message.has_function_responses() {
            Some(CanonicalEvent::Snapshot(SnapshotKind::ToolResult))
        } else {
            // Plain text snapshots would duplicate the token stream; drop
            // them rather than emit spurious transitions.
            None
        }
    }
}
