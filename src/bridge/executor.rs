//! Drives one task through its lifecycle against the reasoning runtime.
//!
//! The executor owns the only non-trivial control logic in the system: it
//! validates the request, performs the Submitted→Working bootstrap, pulls
//! the run's event stream sequentially, routes each raw event through the
//! normalizer and the dedup window, and — once the stream is exhausted —
//! classifies the runtime's persisted verdict into the single terminal
//! transition. Mid-stream failures are absorbed into a terminal Failed
//! state rather than propagated; every accepted task reaches exactly one
//! terminal status.

use std::sync::Arc;

use futures::StreamExt;

use crate::a2a::{Message, Task, TaskState};
use crate::bridge::classifier::{classify, VerdictOutcome, UNAVAILABLE_FALLBACK};
use crate::bridge::dedup::DedupWindow;
use crate::bridge::normalizer::{CanonicalEvent, EventNormalizer, SnapshotKind};
use crate::bridge::updater::TaskUpdater;
use crate::config::BridgeConfig;
use crate::errors::{AgentError, AgentResult};
use crate::runtime::ReasoningRuntime;

/// Caller-safe message for failures while pulling run events. Full detail
/// goes to the log, never to the caller.
const STREAMING_FAILURE_MESSAGE: &str =
    "Streaming error: the agent run was interrupted before it could finish. Please try again.";

/// One inbound request, resolved against existing task state.
#[derive(Debug)]
pub struct RequestContext {
    pub task_id: String,
    pub context_id: String,
    pub message: Message,
    /// The stored task if the caller addressed an existing one; None for a
    /// fresh task (which still needs its Submitted bootstrap).
    pub current_task: Option<Task>,
}

impl RequestContext {
    /// Fail fast on requests the state machine must never see: missing
    /// identifiers or an empty query.
    pub fn validate(&self) -> AgentResult<()> {
        if self.task_id.is_empty() {
            return Err(AgentError::Validation {
                field: "taskId".to_string(),
                reason: "request must carry a task id".to_string(),
            });
        }
        if self.context_id.is_empty() {
            return Err(AgentError::Validation {
                field: "contextId".to_string(),
                reason: "request must carry a context id".to_string(),
            });
        }
        if self.user_input().trim().is_empty() {
            return Err(AgentError::Validation {
                field: "message".to_string(),
                reason: "query text must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// The natural-language query: all text parts of the inbound message.
    pub fn user_input(&self) -> String {
        self.message.text_content()
    }
}

/// Task state machine for the research agent.
///
/// The runtime is constructed before the executor ever runs — a runtime
/// that fails to initialize is a startup error, not a per-task one.
pub struct ResearchExecutor {
    runtime: Arc<dyn ReasoningRuntime>,
    config: BridgeConfig,
}

impl ResearchExecutor {
    pub fn new(runtime: Arc<dyn ReasoningRuntime>) -> Self {
        Self::with_config(runtime, BridgeConfig::default())
    }

    pub fn with_config(runtime: Arc<dyn ReasoningRuntime>, config: BridgeConfig) -> Self {
        Self { runtime, config }
    }

    /// Run one task to its terminal state.
    ///
    /// Emission order follows raw-event arrival order exactly; there is no
    /// reordering or batching. Returns Ok even when the task Failed — an
    /// Err means the lifecycle itself could not be driven (validation,
    /// storage).
    pub async fn execute(
        &self,
        context: &RequestContext,
        updater: &mut TaskUpdater,
    ) -> AgentResult<()> {
        context.validate()?;

        if context.current_task.is_none() {
            updater.submit().await?;
        }
        updater.start_work().await?;

        let query = context.user_input();
        let mut stream = match self.runtime.run_stream(&query, &context.context_id).await {
            Ok(stream) => stream,
            Err(err) => {
                tracing::error!(
                    task_id = %context.task_id,
                    "failed to open reasoning stream: {err}"
                );
                return updater.fail(STREAMING_FAILURE_MESSAGE.to_string()).await;
            }
        };

        let mut normalizer = EventNormalizer::new();
        let mut window = DedupWindow::new();

        while let Some(item) = stream.next().await {
            let raw = match item {
                Ok(raw) => raw,
                Err(err) => {
                    tracing::error!(
                        task_id = %context.task_id,
                        "error while pulling run events: {err}"
                    );
                    return updater.fail(STREAMING_FAILURE_MESSAGE.to_string()).await;
                }
            };

            let Some(event) = normalizer.normalize(raw) else {
                continue;
            };

            match event {
                CanonicalEvent::Token(text) => {
                    if window.should_emit(&text) {
                        updater.update_status(TaskState::Working, Some(text)).await?;
                    }
                }
                CanonicalEvent::ToolStart(name) => {
                    updater
                        .update_status(
                            TaskState::Working,
                            Some(format!("🔧 Using tool: {name}")),
                        )
                        .await?;
                }
                CanonicalEvent::ToolEnd(name) => {
                    updater
                        .update_status(
                            TaskState::Working,
                            Some(format!("✅ Tool {name} completed")),
                        )
                        .await?;
                }
                CanonicalEvent::Snapshot(kind) => {
                    let narration = match kind {
                        SnapshotKind::ToolCallPending => "🔧 Using tool",
                        SnapshotKind::ToolResult => "✅ Tool completed",
                    };
                    updater
                        .update_status(TaskState::Working, Some(narration.to_string()))
                        .await?;
                }
                CanonicalEvent::RunError(message) => {
                    // Treat the stream as exhausted; the persisted verdict
                    // is not consulted after a run error.
                    return updater.fail(message).await;
                }
            }
        }

        let raw_state = match self.runtime.latest_state(&context.context_id).await {
            Ok(state) => state,
            Err(err) => {
                tracing::warn!(
                    context_id = %context.context_id,
                    "could not read persisted state, treating verdict as absent: {err}"
                );
                None
            }
        };

        match classify(raw_state.as_ref()) {
            VerdictOutcome::Completed(message) => {
                updater
                    .add_artifact(message, &self.config.artifact_name)
                    .await?;
                updater.complete().await
            }
            VerdictOutcome::NeedsInput(message) => updater.input_required(message).await,
            VerdictOutcome::Failed(message) => updater.fail(message).await,
            VerdictOutcome::Unavailable => {
                updater.input_required(UNAVAILABLE_FALLBACK.to_string()).await
            }
        }
    }

    /// Cancellation is not supported for in-flight research runs; reject
    /// loudly rather than accept silently.
    pub async fn cancel(&self, context: &RequestContext) -> AgentResult<()> {
        tracing::info!(task_id = %context.task_id, "rejecting cancellation request");
        Err(AgentError::UnsupportedOperation {
            operation: "tasks/cancel".to_string(),
        })
    }
}
