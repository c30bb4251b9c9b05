//! Error taxonomy for node resolution.

use thiserror::Error;

/// Structured errors surfaced by node resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    /// No explicit node id was given and the surrounding context supplied
    /// none either.
    #[error("no node id provided and none available from the surrounding context")]
    MissingIdentifier,

    /// The resolved id does not match any node in the store.
    #[error("no node found for id {id:?}")]
    NodeNotFound { id: String },
}

impl FlowError {
    /// The offending node id, when the error carries one.
    pub fn node_id(&self) -> Option<&str> {
        match self {
            FlowError::MissingIdentifier => None,
            FlowError::NodeNotFound { id } => Some(id),
        }
    }
}

/// How node resolution reports failures.
///
/// The policy is fixed when an accessor is constructed and applies uniformly
/// to both error kinds; the two modes are never mixed within one accessor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Emit the error on the store's notification channel and keep going:
    /// reads degrade to an empty id / absent node.
    #[default]
    Notify,

    /// Return the error from the read; nothing is emitted.
    Fail,
}
