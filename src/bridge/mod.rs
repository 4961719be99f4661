//! The task-lifecycle streaming bridge.
//!
//! Consumes the reasoning runtime's raw event stream and drives the A2A
//! task state machine: normalize raw events into a canonical algebra,
//! deduplicate re-rendered content, emit monotonic status updates, and
//! classify the persisted verdict into exactly one terminal transition.

pub mod classifier;
pub mod dedup;
pub mod executor;
pub mod normalizer;
pub mod updater;

pub use classifier::{classify, VerdictOutcome, UNAVAILABLE_FALLBACK};
pub use dedup::DedupWindow;
pub use executor::{RequestContext, ResearchExecutor};
pub use normalizer::{CanonicalEvent, EventNormalizer, SnapshotKind};
pub use updater::TaskUpdater;
