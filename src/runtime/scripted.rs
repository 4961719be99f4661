//! Scripted reasoning runtime for tests and local development.
//!
//! Replays a fixed event script and serves a fixed final state, mirroring
//! how a real runtime streams one run and then persists its verdict.

use async_trait::async_trait;
use serde_json::Value;

use super::{EventStream, ReasoningRuntime, RunEvent};
use crate::errors::{AgentError, AgentResult};

/// A reasoning runtime that replays a canned script.
///
/// Every `run_stream` call replays the same events regardless of query or
/// context id. An optional trailing stream failure and a canned final state
/// let tests exercise the bridge's error and classification paths.
#[derive(Debug, Default)]
pub struct ScriptedRuntime {
    events: Vec<RunEvent>,
    stream_failure: Option<String>,
    final_state: Option<Value>,
}

impl ScriptedRuntime {
    pub fn new(events: impl Into<Vec<RunEvent>>) -> Self {
        Self {
            events: events.into(),
            stream_failure: None,
            final_state: None,
        }
    }

    /// Persisted final state served by `latest_state`.
    pub fn with_final_state(mut self, state: Value) -> Self {
        self.final_state = Some(state);
        self
    }

    /// Yield an `Err` after the scripted events, simulating a transport
    /// failure while pulling from the runtime.
    pub fn with_stream_failure(mut self, reason: impl Into<String>) -> Self {
        self.stream_failure = Some(reason.into());
        self
    }
}

#[async_trait]
impl ReasoningRuntime for ScriptedRuntime {
    async fn run_stream(&self, _query: &str, context_id: &str) -> AgentResult<EventStream> {
        tracing::debug!(context_id, events = self.events.len(), "replaying scripted run");

        let mut items: Vec<AgentResult<RunEvent>> =
            self.events.iter().cloned().map(Ok).collect();
        if let Some(reason) = &self.stream_failure {
            items.push(Err(AgentError::Streaming {
                reason: reason.clone(),
            }));
        }

        Ok(Box::pin(futures::stream::iter(items)))
    }

    async fn latest_state(&self, _context_id: &str) -> AgentResult<Option<Value>> {
        Ok(self.final_state.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use serde_json::json;

    #[tokio::test]
    async fn test_scripted_runtime_replays_events_in_order() {
        let runtime = ScriptedRuntime::new(vec![
            RunEvent::TokenChunk {
                text: "Pa".to_string(),
            },
            RunEvent::TokenChunk {
                text: "ris".to_string(),
            },
        ]);

        let mut stream = runtime.run_stream("capital of France", "c1").await.unwrap();
        let first = stream.next().await.unwrap().unwrap();
        let second = stream.next().await.unwrap().unwrap();
        assert_eq!(first, RunEvent::TokenChunk { text: "Pa".to_string() });
        assert_eq!(second, RunEvent::TokenChunk { text: "ris".to_string() });
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_scripted_runtime_trailing_failure() {
        let runtime = ScriptedRuntime::new(vec![]).with_stream_failure("connection reset");
        let mut stream = runtime.run_stream("q", "c1").await.unwrap();
        let item = stream.next().await.unwrap();
        assert!(matches!(item, Err(AgentError::Streaming { .. })));
    }

    #[tokio::test]
    async fn test_scripted_runtime_final_state() {
        let runtime = ScriptedRuntime::new(vec![])
            .with_final_state(json!({"status": "completed", "message": "Paris"}));
        let state = runtime.latest_state("c1").await.unwrap().unwrap();
        assert_eq!(state["status"], "completed");

        let empty = ScriptedRuntime::default();
        assert!(empty.latest_state("c1").await.unwrap().is_none());
    }
}
