//! Classifies the runtime's persisted structured verdict into exactly one
//! task outcome.
//!
//! Classification is total: any shape the runtime persists — including no
//! verdict at all — maps to one of the four outcomes, never a panic.

use serde_json::Value;

use crate::runtime::{StructuredVerdict, VerdictStatus};

/// Caller-facing message used when no usable verdict was persisted.
pub const UNAVAILABLE_FALLBACK: &str =
    "We are unable to process your request at the moment. Please try again.";

/// The terminal outcome of one reasoning run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerdictOutcome {
    Completed(String),
    NeedsInput(String),
    Failed(String),
    Unavailable,
}

/// Classify the raw persisted state into a task outcome.
///
/// `raw` is whatever the runtime persisted for the conversation, if
/// anything; a missing or malformed verdict is an expected degraded case,
/// not an error.
pub fn classify(raw: Option<&Value>) -> VerdictOutcome {
    let Some(raw) = raw else {
        return VerdictOutcome::Unavailable;
    };

    let verdict: StructuredVerdict = match serde_json::from_value(raw.clone()) {
        Ok(verdict) => verdict,
        Err(err) => {
            tracing::debug!("unusable structured verdict: {err}");
            return VerdictOutcome::Unavailable;
        }
    };

    match verdict.status {
        VerdictStatus::Completed => VerdictOutcome::Completed(verdict.message),
        VerdictStatus::InputRequired => VerdictOutcome::NeedsInput(verdict.message),
        VerdictStatus::Error => error_status_outcome(verdict.message),
    }
}

/// Policy point: how an `error` verdict surfaces to the caller.
///
/// Today an error verdict asks the caller for clarification instead of
/// failing the task, matching the upstream agent contract. Change the
/// mapping here if that contract changes; the state machine handles every
/// [`VerdictOutcome`] arm either way.
fn error_status_outcome(message: String) -> VerdictOutcome {
    VerdictOutcome::NeedsInput(message)
}
