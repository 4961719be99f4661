//! A2A protocol types for the task-oriented RPC surface.
//!
//! Only the subset of the protocol this agent speaks is modeled here:
//! tasks, messages, artifacts, the streaming update events, the method
//! parameter types, JSON-RPC error payloads, and the agent card.

pub mod types;

pub use types::*;
