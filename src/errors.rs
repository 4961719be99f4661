/// Main error type for the research-agent bridge
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    // === Request Validation Errors ===
    #[error("Validation error: {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("Operation not supported: {operation}")]
    UnsupportedOperation { operation: String },

    // === Task Management Errors ===
    #[error("Task not found: {task_id}")]
    TaskNotFound { task_id: String },

    #[error("Task already exists: {task_id}")]
    TaskAlreadyExists { task_id: String },

    #[error("Invalid task state transition: {from} -> {to}")]
    InvalidTaskStateTransition { from: String, to: String },

    // === Reasoning Runtime Errors ===
    #[error("Reasoning runtime error: {reason}")]
    Runtime { reason: String },

    #[error("Reasoning runtime initialization failed: {reason}")]
    RuntimeInit { reason: String },

    #[error("Streaming error: {reason}")]
    Streaming { reason: String },

    // === Network/IO Errors ===
    #[error("Serialization error: {format}: {reason}")]
    Serialization { format: String, reason: String },

    // === General System Errors ===
    #[error("Internal error: {component}: {reason}")]
    Internal { component: String, reason: String },
}

impl AgentError {
    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Runtime { .. } | Self::Streaming { .. } => true,

            Self::Validation { .. }
            | Self::UnsupportedOperation { .. }
            | Self::TaskNotFound { .. }
            | Self::TaskAlreadyExists { .. }
            | Self::InvalidTaskStateTransition { .. }
            | Self::RuntimeInit { .. }
            | Self::Serialization { .. }
            | Self::Internal { .. } => false,
        }
    }

    /// Get error category for metrics/logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::Validation { .. } | Self::UnsupportedOperation { .. } => "request",

            Self::TaskNotFound { .. }
            | Self::TaskAlreadyExists { .. }
            | Self::InvalidTaskStateTransition { .. } => "task",

            Self::Runtime { .. } | Self::RuntimeInit { .. } | Self::Streaming { .. } => "runtime",

            Self::Serialization { .. } => "io",

            Self::Internal { .. } => "system",
        }
    }
}

/// Convenience type alias
pub type AgentResult<T> = std::result::Result<T, AgentError>;

/// Convert common std errors to AgentError
impl From<serde_json::Error> for AgentError {
    fn from(error: serde_json::Error) -> Self {
        AgentError::Serialization {
            format: "json".to_string(),
            reason: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        let task_err = AgentError::TaskNotFound {
            task_id: "test".to_string(),
        };
        assert_eq!(task_err.category(), "task");
        assert!(!task_err.is_retryable());

        let stream_err = AgentError::Streaming {
            reason: "connection reset".to_string(),
        };
        assert_eq!(stream_err.category(), "runtime");
        assert!(stream_err.is_retryable());

        let validation_err = AgentError::Validation {
            field: "query".to_string(),
            reason: "must not be empty".to_string(),
        };
        assert_eq!(validation_err.category(), "request");
        assert!(!validation_err.is_retryable());
    }

    #[test]
    fn test_error_conversions() {
        let json_err: AgentError = serde_json::from_str::<serde_json::Value>("invalid json")
            .unwrap_err()
            .into();
        assert_eq!(json_err.category(), "io");
    }

    #[test]
    fn test_error_display() {
        let err = AgentError::UnsupportedOperation {
            operation: "tasks/cancel".to_string(),
        };
        assert_eq!(err.to_string(), "Operation not supported: tasks/cancel");
    }
}
