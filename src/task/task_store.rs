use crate::errors::AgentResult;
use async_trait::async_trait;

use crate::a2a::{Artifact, Message, Task, TaskStatus};

/// Database-ready abstraction for task persistence.
///
/// Tasks are keyed by their caller-supplied task id. Mutating operations
/// must be atomic so concurrent updates to the same task lose nothing.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Retrieve a task by id. Returns None if the task doesn't exist.
    async fn get_task(&self, task_id: &str) -> AgentResult<Option<Task>>;

    /// Save a task (create or update).
    async fn save_task(&self, task: &Task) -> AgentResult<()>;

    /// Delete a task by id. Succeeds silently if it doesn't exist
    /// (idempotent).
    async fn delete_task(&self, task_id: &str) -> AgentResult<()>;

    /// Check if a task exists without retrieving it.
    async fn task_exists(&self, task_id: &str) -> AgentResult<bool>;

    /// List tasks, optionally filtered to one conversation's context id.
    async fn list_tasks(&self, context_id: Option<&str>) -> AgentResult<Vec<Task>>;

    // ===== Atomic Update Methods =====

    /// Atomically append a message to a task's history.
    /// Fails with `TaskNotFound` if the task doesn't exist.
    async fn append_message(&self, task_id: &str, message: Message) -> AgentResult<()>;

    /// Atomically append an artifact to a task.
    /// Fails with `TaskNotFound` if the task doesn't exist.
    async fn append_artifact(&self, task_id: &str, artifact: Artifact) -> AgentResult<()>;

    /// Atomically update a task's status.
    /// Fails with `TaskNotFound` if the task doesn't exist.
    async fn update_task_status(&self, task_id: &str, status: TaskStatus) -> AgentResult<()>;
}
