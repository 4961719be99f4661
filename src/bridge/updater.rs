//! Per-task lifecycle emitter.
//!
//! A `TaskUpdater` owns the status emissions for exactly one task: each
//! update is persisted through the [`TaskManager`] and then mirrored as an
//! A2A event into the task's outbound channel. The updater enforces the
//! lifecycle invariants: states never regress, and at most one terminal
//! transition is emitted — anything after that is silently dropped.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc;

use crate::a2a::{
    Artifact, Message, SendStreamingMessageResult, TaskState, TaskStatus,
};
use crate::errors::{AgentError, AgentResult};
use crate::task::TaskManager;

/// Relative ordering of lifecycle states; a task only ever moves to an
/// equal or higher rank.
fn state_rank(state: &TaskState) -> u8 {
    match state {
        TaskState::Submitted => 1,
        TaskState::Working | TaskState::AuthRequired | TaskState::Unknown => 2,
        TaskState::InputRequired
        | TaskState::Completed
        | TaskState::Failed
        | TaskState::Canceled
        | TaskState::Rejected => 3,
    }
}

pub struct TaskUpdater {
    manager: Arc<TaskManager>,
    sink: mpsc::Sender<SendStreamingMessageResult>,
    task_id: String,
    context_id: String,
    rank: u8,
    terminal: bool,
}

impl TaskUpdater {
    pub fn new(
        manager: Arc<TaskManager>,
        sink: mpsc::Sender<SendStreamingMessageResult>,
        task_id: String,
        context_id: String,
    ) -> Self {
        Self {
            manager,
            sink,
            task_id,
            context_id,
            rank: 0,
            terminal: false,
        }
    }

    /// Whether a terminal transition has already been emitted.
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// Emit the Submitted bootstrap transition.
    pub async fn submit(&mut self) -> AgentResult<()> {
        self.update_status(TaskState::Submitted, None).await
    }

    /// Enter the Working state.
    pub async fn start_work(&mut self) -> AgentResult<()> {
        self.update_status(TaskState::Working, None).await
    }

    /// Terminal: the task produced its final answer. Call `add_artifact`
    /// first to attach the answer.
    pub async fn complete(&mut self) -> AgentResult<()> {
        self.update_status(TaskState::Completed, None).await
    }

    /// Terminal: the agent needs more input from the caller.
    pub async fn input_required(&mut self, text: String) -> AgentResult<()> {
        self.update_status(TaskState::InputRequired, Some(text)).await
    }

    /// Terminal: the run failed.
    pub async fn fail(&mut self, text: String) -> AgentResult<()> {
        self.update_status(TaskState::Failed, Some(text)).await
    }

    /// Persist a status change and emit the matching A2A event.
    ///
    /// After a terminal transition this is a silent no-op (the defensive
    /// stop); a regression to a lower-ranked state is an error.
    pub async fn update_status(
        &mut self,
        state: TaskState,
        text: Option<String>,
    ) -> AgentResult<()> {
        if self.terminal {
            tracing::debug!(
                task_id = %self.task_id,
                ?state,
                "dropping status update after terminal transition"
            );
            return Ok(());
        }

        let rank = state_rank(&state);
        if rank < self.rank {
            return Err(AgentError::InvalidTaskStateTransition {
                from: format!("rank {}", self.rank),
                to: format!("{state:?}"),
            });
        }

        let message = text.map(|t| Message::agent_text(t, &self.task_id, &self.context_id));
        let status = TaskStatus {
            state,
            timestamp: Some(Utc::now().to_rfc3339()),
            message,
        };

        let event = self.manager.update_status(&self.task_id, status).await?;
        if event.is_final {
            self.terminal = true;
        }
        self.rank = rank;

        self.send(SendStreamingMessageResult::TaskStatusUpdate(event))
            .await;
        Ok(())
    }

    /// Attach a named text artifact to the task and emit the matching A2A
    /// event. Dropped silently after a terminal transition.
    pub async fn add_artifact(&mut self, content: String, name: &str) -> AgentResult<()> {
        if self.terminal {
            tracing::debug!(
                task_id = %self.task_id,
                "dropping artifact after terminal transition"
            );
            return Ok(());
        }

        let artifact = Artifact::text(name, content);
        let event = self.manager.add_artifact(&self.task_id, artifact).await?;
        self.send(SendStreamingMessageResult::TaskArtifactUpdate(event))
            .await;
        Ok(())
    }

    async fn send(&self, result: SendStreamingMessageResult) {
        // The store already holds the change; a caller that went away only
        // loses the live notification.
        if self.sink.send(result).await.is_err() {
            tracing::warn!(
                task_id = %self.task_id,
                "stream receiver dropped; status update not delivered"
            );
        }
    }
}
