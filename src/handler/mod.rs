//! The task-oriented RPC surface, independent of any HTTP transport.
//!
//! `RequestHandler` is what a transport layer mounts: `message/stream`
//! opens a task and returns its live update stream, `tasks/get` reads
//! stored task state, and `tasks/cancel` is rejected explicitly.

pub mod error_mapper;

pub use error_mapper::to_jsonrpc_error;

use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::a2a::{
    MessageSendParams, SendStreamingMessageResult, Task, TaskIdParams, TaskQueryParams,
    MESSAGE_KIND,
};
use crate::bridge::{RequestContext, ResearchExecutor, TaskUpdater};
use crate::config::BridgeConfig;
use crate::errors::{AgentError, AgentResult};
use crate::runtime::ReasoningRuntime;
use crate::task::task_manager::is_final_state;
use crate::task::{TaskManager, TaskStore};

/// A task opened by `message/stream`: its identifiers plus the live
/// stream of status and artifact updates.
pub struct StreamingTaskResult {
    pub task_id: String,
    pub context_id: String,
    pub stream: Pin<Box<ReceiverStream<SendStreamingMessageResult>>>,
}

pub struct RequestHandler {
    executor: Arc<ResearchExecutor>,
    manager: Arc<TaskManager>,
    config: BridgeConfig,
}

impl RequestHandler {
    pub fn new(runtime: Arc<dyn ReasoningRuntime>, store: Arc<dyn TaskStore>) -> Self {
        Self::with_config(runtime, store, BridgeConfig::default())
    }

    pub fn with_config(
        runtime: Arc<dyn ReasoningRuntime>,
        store: Arc<dyn TaskStore>,
        config: BridgeConfig,
    ) -> Self {
        Self {
            executor: Arc::new(ResearchExecutor::with_config(runtime, config.clone())),
            manager: Arc::new(TaskManager::new(store)),
            config,
        }
    }

    /// A2A Protocol: message/stream — open a task for the inbound message
    /// and stream its lifecycle.
    ///
    /// Validation failures surface synchronously, before any task exists.
    /// Once the stream is returned, every failure is absorbed into a
    /// terminal Failed update on the stream instead.
    pub async fn send_streaming_message(
        &self,
        params: MessageSendParams,
    ) -> AgentResult<StreamingTaskResult> {
        let query = params.message.text_content();
        if query.trim().is_empty() {
            return Err(AgentError::Validation {
                field: "message".to_string(),
                reason: "query text must not be empty".to_string(),
            });
        }

        let context_id = params
            .message
            .context_id
            .clone()
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let task_id = params
            .message
            .task_id
            .clone()
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        let current_task = self.manager.get_task(&task_id).await?;
        if let Some(existing) = &current_task {
            if is_final_state(&existing.status.state) {
                return Err(AgentError::Validation {
                    field: "taskId".to_string(),
                    reason: format!("task {task_id} already reached a terminal state"),
                });
            }
        }

        let task = match current_task.clone() {
            Some(task) => task,
            None => {
                self.manager
                    .create_task(task_id.clone(), context_id.clone())
                    .await?
            }
        };

        // Record the inbound user message in the task's history, with its
        // ids pinned to the task we resolved.
        let mut user_message = params.message.clone();
        user_message.kind = MESSAGE_KIND.to_string();
        user_message.task_id = Some(task_id.clone());
        user_message.context_id = Some(context_id.clone());
        self.manager.add_message(&task_id, user_message).await?;

        let (tx, rx) = mpsc::channel(self.config.channel_capacity);

        // The first stream item is the task snapshot, then live updates.
        tx.send(SendStreamingMessageResult::Task(task))
            .await
            .map_err(|_| AgentError::Internal {
                component: "handler".to_string(),
                reason: "stream closed before first event".to_string(),
            })?;

        let context = RequestContext {
            task_id: task_id.clone(),
            context_id: context_id.clone(),
            message: params.message,
            current_task,
        };
        let mut updater = TaskUpdater::new(
            Arc::clone(&self.manager),
            tx,
            task_id.clone(),
            context_id.clone(),
        );

        let executor = Arc::clone(&self.executor);
        tokio::spawn(async move {
            if let Err(err) = executor.execute(&context, &mut updater).await {
                tracing::error!(task_id = %context.task_id, "executor failed: {err}");
                if !updater.is_terminal() {
                    if let Err(fail_err) = updater
                        .fail("The agent could not process this task. Please try again.".to_string())
                        .await
                    {
                        tracing::error!(
                            task_id = %context.task_id,
                            "could not emit failure transition: {fail_err}"
                        );
                    }
                }
            }
        });

        Ok(StreamingTaskResult {
            task_id,
            context_id,
            stream: Box::pin(ReceiverStream::new(rx)),
        })
    }

    /// A2A Protocol: tasks/get — read a task with history and artifacts.
    pub async fn get_task(&self, params: TaskQueryParams) -> AgentResult<Task> {
        self.manager
            .get_task(&params.id)
            .await?
            .ok_or(AgentError::TaskNotFound { task_id: params.id })
    }

    /// A2A Protocol: tasks/cancel — always rejected; in-flight research
    /// runs cannot be canceled.
    pub async fn cancel_task(&self, params: TaskIdParams) -> AgentResult<Task> {
        tracing::info!(task_id = %params.id, "rejecting cancellation request");
        Err(AgentError::UnsupportedOperation {
            operation: "tasks/cancel".to_string(),
        })
    }
}
