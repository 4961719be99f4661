//! Boundary to the external reasoning runtime.
//!
//! The runtime owns the reasoning graph, the language model, the tools, and
//! the per-conversation checkpointed memory. The bridge only consumes its
//! event stream and reads its persisted final state; nothing here executes
//! reasoning. The runtime must be fully constructed before the first task is
//! accepted — initialization failures are startup errors, never per-task
//! errors.

pub mod scripted;

pub use scripted::ScriptedRuntime;

use crate::errors::AgentResult;
use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw events pulled from the reasoning runtime.
///
/// This is a closed tagged union over the two streaming regimes the runtime
/// may operate in: fine-grained execution events (token chunks, tool
/// start/end, chain errors) and coarse full-state snapshots. Unknown event
/// kinds deserialize into [`RunEvent::Other`] so a runtime upgrade can never
/// abort an in-flight stream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RunEvent {
    /// A partial text chunk produced by the language model.
    TokenChunk {
        #[serde(default)]
        text: String,
    },
    /// A tool invocation has begun. The name may be absent.
    ToolStart {
        #[serde(default)]
        name: Option<String>,
    },
    /// A tool invocation has finished. The name may be absent.
    ToolEnd {
        #[serde(default)]
        name: Option<String>,
    },
    /// The reasoning chain reported a mid-run failure.
    ChainError {
        #[serde(default)]
        message: Option<String>,
    },
    /// A coarse full-state snapshot (the runtime's "values" regime).
    StateSnapshot { snapshot: StateSnapshot },
    /// Any event kind this bridge does not understand.
    #[serde(other)]
    Other,
}

/// A coarse snapshot of the conversation state, carrying only the latest
/// message. The snapshot regime does not expose per-call tool identity.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StateSnapshot {
    #[serde(default, rename = "lastMessage")]
    pub last_message: Option<ThreadMessage>,
}

/// Who authored a conversation-thread message inside the runtime.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ThreadRole {
    User,
    Assistant,
    Tool,
}

/// A message in the runtime's conversation thread. Unlike protocol-level
/// messages, thread messages can carry pending tool calls and tool results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ThreadMessage {
    pub role: ThreadRole,
    pub parts: Vec<ThreadPart>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ThreadPart {
    Text {
        text: String,
    },
    /// A tool call the runtime has requested but not yet resolved.
    FunctionCall {
        name: String,
        #[serde(default)]
        arguments: Value,
        #[serde(skip_serializing_if = "Option::is_none")]
        tool_use_id: Option<String>,
    },
    /// The result of a resolved tool call.
    FunctionResponse {
        name: String,
        #[serde(default)]
        result: Value,
        #[serde(skip_serializing_if = "Option::is_none")]
        tool_use_id: Option<String>,
    },
}

impl ThreadMessage {
    pub fn assistant_text(text: impl Into<String>) -> Self {
        Self {
            role: ThreadRole::Assistant,
            parts: vec![ThreadPart::Text { text: text.into() }],
        }
    }

    pub fn assistant_tool_call(name: impl Into<String>) -> Self {
        Self {
            role: ThreadRole::Assistant,
            parts: vec![ThreadPart::FunctionCall {
                name: name.into(),
                arguments: Value::Null,
                tool_use_id: None,
            }],
        }
    }

    pub fn tool_result(name: impl Into<String>, result: Value) -> Self {
        Self {
            role: ThreadRole::Tool,
            parts: vec![ThreadPart::FunctionResponse {
                name: name.into(),
                result,
                tool_use_id: None,
            }],
        }
    }

    /// True if any part is a pending tool call.
    pub fn has_function_calls(&self) -> bool {
        self.parts
            .iter()
            .any(|part| matches!(part, ThreadPart::FunctionCall { .. }))
    }

    /// True if any part is a tool result.
    pub fn has_function_responses(&self) -> bool {
        self.parts
            .iter()
            .any(|part| matches!(part, ThreadPart::FunctionResponse { .. }))
    }
}

/// The runtime's self-reported final status for a conversation turn.
///
/// Persisted by the runtime in its per-conversation state; read once per
/// task after stream exhaustion. Absence or a malformed shape is an
/// expected condition, handled by the classifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StructuredVerdict {
    pub status: VerdictStatus,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VerdictStatus {
    InputRequired,
    Completed,
    Error,
}

/// Ordered, pull-based event source for one reasoning run.
pub type EventStream = BoxStream<'static, AgentResult<RunEvent>>;

/// Boundary trait for the external reasoning runtime.
///
/// Conversation memory is keyed and serialized by `context_id` inside the
/// runtime; the bridge never writes to it.
#[async_trait]
pub trait ReasoningRuntime: Send + Sync {
    /// Start one reasoning run for `query` and return its event stream.
    ///
    /// The stream is pulled sequentially by a single consumer; a pull may
    /// suspend for the duration of a model call or tool invocation.
    async fn run_stream(&self, query: &str, context_id: &str) -> AgentResult<EventStream>;

    /// The last persisted state for a conversation, if any. The returned
    /// JSON may or may not contain a well-formed [`StructuredVerdict`].
    async fn latest_state(&self, context_id: &str) -> AgentResult<Option<Value>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_event_kind_folds_to_other() {
        let event: RunEvent =
            serde_json::from_value(json!({"event": "on_prompt_cache_hit", "tokens": 512}))
                .unwrap();
        assert_eq!(event, RunEvent::Other);
    }

    #[test]
    fn test_token_chunk_round_trip() {
        let event: RunEvent =
            serde_json::from_value(json!({"event": "token_chunk", "text": "Paris"})).unwrap();
        assert_eq!(
            event,
            RunEvent::TokenChunk {
                text: "Paris".to_string()
            }
        );
    }

    #[test]
    fn test_tool_start_without_name() {
        let event: RunEvent = serde_json::from_value(json!({"event": "tool_start"})).unwrap();
        assert_eq!(event, RunEvent::ToolStart { name: None });
    }

    #[test]
    fn test_thread_message_helpers() {
        let pending = ThreadMessage::assistant_tool_call("duckduckgo_search");
        assert!(pending.has_function_calls());
        assert!(!pending.has_function_responses());

        let resolved = ThreadMessage::tool_result("duckduckgo_search", json!("three results"));
        assert!(resolved.has_function_responses());
        assert!(!resolved.has_function_calls());

        let plain = ThreadMessage::assistant_text("Paris");
        assert!(!plain.has_function_calls());
        assert!(!plain.has_function_responses());
    }

    #[test]
    fn test_verdict_status_serde() {
        let verdict: StructuredVerdict =
            serde_json::from_value(json!({"status": "input_required", "message": "Which city?"}))
                .unwrap();
        assert_eq!(verdict.status, VerdictStatus::InputRequired);
        assert_eq!(verdict.message, "Which city?");
    }
}
