//! Helpers for translating internal errors into protocol-specific payloads.

use crate::a2a::{
    InternalError, InvalidParamsError, JSONRPCError, TaskNotFoundError,
    UnsupportedOperationError,
};
use crate::errors::AgentError;
use serde_json::json;

/// Map an [`AgentError`] into an A2A-compliant [`JSONRPCError`].
///
/// Keeps protocol wiring outside of the executor and handler so lifecycle
/// logic only deals with domain errors.
pub fn to_jsonrpc_error(error: AgentError) -> JSONRPCError {
    match error {
        AgentError::Validation { field, reason } => invalid_params_error(
            Some(format!("Validation failed for {field}: {reason}")),
            Some(json!({ "field": field, "reason": reason })),
        ),
        AgentError::TaskNotFound { task_id } => task_not_found_error(
            Some(format!("Task not found: {task_id}")),
            Some(json!({ "taskId": task_id })),
        ),
        AgentError::TaskAlreadyExists { task_id } => invalid_params_error(
            Some(format!("Task already exists: {task_id}")),
            Some(json!({ "taskId": task_id })),
        ),
        AgentError::UnsupportedOperation { operation } => unsupported_operation_error(
            Some(format!("Operation not supported: {operation}")),
            Some(json!({ "operation": operation })),
        ),
        other => internal_error(
            None,
            Some(json!({
                "details": other.to_string(),
            })),
        ),
    }
}

fn invalid_params_error(message: Option<String>, data: Option<serde_json::Value>) -> JSONRPCError {
    let defaults = InvalidParamsError::default();
    JSONRPCError {
        code: defaults.code,
        message: message.unwrap_or(defaults.message),
        data,
    }
}

fn unsupported_operation_error(
    message: Option<String>,
    data: Option<serde_json::Value>,
) -> JSONRPCError {
    let defaults = UnsupportedOperationError::default();
    JSONRPCError {
        code: defaults.code,
        message: message.unwrap_or(defaults.message),
        data,
    }
}

fn internal_error(message: Option<String>, data: Option<serde_json::Value>) -> JSONRPCError {
    let defaults = InternalError::default();
    JSONRPCError {
        code: defaults.code,
        message: message.unwrap_or(defaults.message),
        data,
    }
}

fn task_not_found_error(message: Option<String>, data: Option<serde_json::Value>) -> JSONRPCError {
    let defaults = TaskNotFoundError::default();
    JSONRPCError {
        code: defaults.code,
        message: message.unwrap_or(defaults.message),
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_invalid_params() {
        let err = to_jsonrpc_error(AgentError::Validation {
            field: "message".into(),
            reason: "query text must not be empty".into(),
        });
        assert_eq!(err.code, InvalidParamsError::default().code);
        assert!(err.message.contains("message"));
    }

    #[test]
    fn task_not_found_maps_correctly() {
        let err = to_jsonrpc_error(AgentError::TaskNotFound {
            task_id: "missing".into(),
        });
        assert_eq!(err.code, TaskNotFoundError::default().code);
        assert!(err.message.contains("missing"));
    }

    #[test]
    fn unsupported_operation_maps_correctly() {
        let err = to_jsonrpc_error(AgentError::UnsupportedOperation {
            operation: "tasks/cancel".into(),
        });
        assert_eq!(err.code, UnsupportedOperationError::default().code);
    }

    #[test]
    fn other_errors_map_to_internal() {
        let err = to_jsonrpc_error(AgentError::Streaming {
            reason: "boom".into(),
        });
        assert_eq!(err.code, InternalError::default().code);
        assert_eq!(err.message, InternalError::default().message);
    }
}
