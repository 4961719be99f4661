use crate::errors::{AgentError, AgentResult};
use chrono::Utc;
use std::sync::Arc;

use super::task_store::TaskStore;
use crate::a2a::{
    Artifact, Message, Task, TaskArtifactUpdateEvent, TaskState, TaskStatus,
    TaskStatusUpdateEvent, ARTIFACT_UPDATE_KIND, STATUS_UPDATE_KIND, TASK_KIND,
};

/// High-level task management operations.
///
/// TaskManager provides the task lifecycle API on top of a TaskStore and
/// generates the A2A events (`TaskStatusUpdateEvent`,
/// `TaskArtifactUpdateEvent`) that mirror each mutation.
pub struct TaskManager {
    store: Arc<dyn TaskStore>,
}

impl TaskManager {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    /// Create a new task with the caller-supplied id.
    ///
    /// The task starts in the Submitted state with empty history and
    /// artifacts. Fails with `TaskAlreadyExists` if the id is taken.
    pub async fn create_task(&self, task_id: String, context_id: String) -> AgentResult<Task> {
        if self.store.task_exists(&task_id).await? {
            return Err(AgentError::TaskAlreadyExists { task_id });
        }

        let task = Task {
            kind: TASK_KIND.to_string(),
            id: task_id,
            context_id,
            status: TaskStatus {
                state: TaskState::Submitted,
                timestamp: Some(Utc::now().to_rfc3339()),
                message: None,
            },
            history: Vec::new(),
            artifacts: Vec::new(),
            metadata: None,
        };

        self.store.save_task(&task).await?;
        Ok(task)
    }

    /// Retrieve a task by id, with history and artifacts included.
    pub async fn get_task(&self, task_id: &str) -> AgentResult<Option<Task>> {
        self.store.get_task(task_id).await
    }

    /// Add a message to a task's history (atomic append).
    pub async fn add_message(&self, task_id: &str, message: Message) -> AgentResult<()> {
        self.store.append_message(task_id, message).await
    }

    /// Add an artifact to a task and generate the matching A2A event.
    pub async fn add_artifact(
        &self,
        task_id: &str,
        artifact: Artifact,
    ) -> AgentResult<TaskArtifactUpdateEvent> {
        self.store.append_artifact(task_id, artifact.clone()).await?;

        let task = self
            .get_task(task_id)
            .await?
            .ok_or_else(|| AgentError::TaskNotFound {
                task_id: task_id.to_string(),
            })?;

        Ok(TaskArtifactUpdateEvent {
            kind: ARTIFACT_UPDATE_KIND.to_string(),
            task_id: task_id.to_string(),
            context_id: task.context_id,
            artifact,
            append: None,
            last_chunk: Some(true),
            metadata: None,
        })
    }

    /// Update a task's status and generate the matching A2A event.
    ///
    /// The event's `final` flag is set for terminal states. This agent
    /// ends its turn when it asks for input, so InputRequired is terminal
    /// here alongside Completed/Failed/Canceled/Rejected.
    pub async fn update_status(
        &self,
        task_id: &str,
        status: TaskStatus,
    ) -> AgentResult<TaskStatusUpdateEvent> {
        self.store.update_task_status(task_id, status.clone()).await?;

        let task = self
            .get_task(task_id)
            .await?
            .ok_or_else(|| AgentError::TaskNotFound {
                task_id: task_id.to_string(),
            })?;

        let is_final = is_final_state(&status.state);

        Ok(TaskStatusUpdateEvent {
            kind: STATUS_UPDATE_KIND.to_string(),
            task_id: task_id.to_string(),
            context_id: task.context_id,
            status,
            is_final,
            metadata: None,
        })
    }

    /// List tasks, optionally filtered by conversation context.
    pub async fn list_tasks(&self, context_id: Option<&str>) -> AgentResult<Vec<Task>> {
        self.store.list_tasks(context_id).await
    }

    /// Delete a task from storage (idempotent).
    pub async fn delete_task(&self, task_id: &str) -> AgentResult<()> {
        self.store.delete_task(task_id).await
    }

    /// Check if a task exists without retrieving it.
    pub async fn task_exists(&self, task_id: &str) -> AgentResult<bool> {
        self.store.task_exists(task_id).await
    }
}

/// Whether a state ends the task's lifecycle on the stream.
pub fn is_final_state(state: &TaskState) -> bool {
    matches!(
        state,
        TaskState::InputRequired
            | TaskState::Completed
            | TaskState::Failed
            | TaskState::Canceled
            | TaskState::Rejected
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::InMemoryTaskStore;
    use std::sync::Arc;
    use tokio::task::JoinSet;

    fn create_test_task_manager() -> TaskManager {
        let store = Arc::new(InMemoryTaskStore::new());
        TaskManager::new(store)
    }

    #[tokio::test]
    async fn test_create_task() {
        let manager = create_test_task_manager();
        let task = manager
            .create_task("t1".to_string(), "c1".to_string())
            .await
            .unwrap();

        assert_eq!(task.status.state, TaskState::Submitted);
        assert_eq!(task.context_id, "c1");
        assert!(task.status.timestamp.is_some());

        let retrieved = manager.get_task("t1").await.unwrap().unwrap();
        assert_eq!(retrieved.id, "t1");
    }

    #[tokio::test]
    async fn test_create_duplicate_task_fails() {
        let manager = create_test_task_manager();
        manager
            .create_task("t1".to_string(), "c1".to_string())
            .await
            .unwrap();

        let err = manager.create_task("t1".to_string(), "c2".to_string()).await;
        assert!(matches!(
            err,
            Err(AgentError::TaskAlreadyExists { task_id }) if task_id == "t1"
        ));
    }

    #[tokio::test]
    async fn test_add_message() {
        let manager = create_test_task_manager();
        manager
            .create_task("t1".to_string(), "c1".to_string())
            .await
            .unwrap();

        manager
            .add_message("t1", Message::user_text("Hello"))
            .await
            .unwrap();

        let task = manager.get_task("t1").await.unwrap().unwrap();
        assert_eq!(task.history.len(), 1);
        assert_eq!(task.history[0].text_content(), "Hello");
    }

    #[tokio::test]
    async fn test_add_artifact() {
        let manager = create_test_task_manager();
        manager
            .create_task("t1".to_string(), "c1".to_string())
            .await
            .unwrap();

        let artifact = Artifact::text("search result", "Paris");
        let event = manager.add_artifact("t1", artifact.clone()).await.unwrap();

        assert_eq!(event.kind, "artifact-update");
        assert_eq!(event.task_id, "t1");
        assert_eq!(event.context_id, "c1");
        assert_eq!(event.artifact.artifact_id, artifact.artifact_id);
        assert_eq!(event.last_chunk, Some(true));

        let task = manager.get_task("t1").await.unwrap().unwrap();
        assert_eq!(task.artifacts.len(), 1);
    }

    #[tokio::test]
    async fn test_update_status_final_flag() {
        let manager = create_test_task_manager();
        manager
            .create_task("t1".to_string(), "c1".to_string())
            .await
            .unwrap();

        let working = manager
            .update_status(
                "t1",
                TaskStatus {
                    state: TaskState::Working,
                    timestamp: Some(Utc::now().to_rfc3339()),
                    message: None,
                },
            )
            .await
            .unwrap();
        assert!(!working.is_final);

        let input_required = manager
            .update_status(
                "t1",
                TaskStatus {
                    state: TaskState::InputRequired,
                    timestamp: Some(Utc::now().to_rfc3339()),
                    message: Some(Message::agent_text("Which city?", "t1", "c1")),
                },
            )
            .await
            .unwrap();
        assert!(input_required.is_final);

        let task = manager.get_task("t1").await.unwrap().unwrap();
        assert_eq!(task.status.state, TaskState::InputRequired);
    }

    #[tokio::test]
    async fn test_update_status_missing_task() {
        let manager = create_test_task_manager();
        let err = manager
            .update_status(
                "missing",
                TaskStatus {
                    state: TaskState::Working,
                    timestamp: None,
                    message: None,
                },
            )
            .await;
        assert!(matches!(err, Err(AgentError::TaskNotFound { .. })));
    }

    #[tokio::test]
    async fn test_concurrency_no_lost_updates() {
        let manager = Arc::new(create_test_task_manager());
        manager
            .create_task("t1".to_string(), "c1".to_string())
            .await
            .unwrap();

        let mut join_set = JoinSet::new();

        let num_messages = 50;
        let num_artifacts = 50;

        for i in 0..num_messages {
            let manager = Arc::clone(&manager);
            join_set.spawn(async move {
                let mut message = Message::user_text(format!("message {i}"));
                message.message_id = format!("msg_{i}");
                manager.add_message("t1", message).await
            });
        }

        for i in 0..num_artifacts {
            let manager = Arc::clone(&manager);
            join_set.spawn(async move {
                let mut artifact = Artifact::text("search result", format!("artifact {i}"));
                artifact.artifact_id = format!("art_{i}");
                manager.add_artifact("t1", artifact).await.map(|_| ())
            });
        }

        while let Some(result) = join_set.join_next().await {
            assert!(result.unwrap().is_ok());
        }

        let task = manager.get_task("t1").await.unwrap().unwrap();
        assert_eq!(task.history.len(), num_messages);
        assert_eq!(task.artifacts.len(), num_artifacts);

        let message_ids: std::collections::HashSet<_> =
            task.history.iter().map(|m| &m.message_id).collect();
        assert_eq!(message_ids.len(), num_messages);

        let artifact_ids: std::collections::HashSet<_> =
            task.artifacts.iter().map(|a| &a.artifact_id).collect();
        assert_eq!(artifact_ids.len(), num_artifacts);
    }

    #[test]
    fn test_is_final_state() {
        assert!(is_final_state(&TaskState::InputRequired));
        assert!(is_final_state(&TaskState::Completed));
        assert!(is_final_state(&TaskState::Failed));
        assert!(is_final_state(&TaskState::Canceled));
        assert!(is_final_state(&TaskState::Rejected));

        assert!(!is_final_state(&TaskState::Submitted));
        assert!(!is_final_state(&TaskState::Working));
        assert!(!is_final_state(&TaskState::AuthRequired));
        assert!(!is_final_state(&TaskState::Unknown));
    }
}
