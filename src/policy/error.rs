//! Transition errors.

use crate::core::CatalogError;
use thiserror::Error;

/// Errors that can occur when attempting a transition.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Illegal transition in '{catalog}' from '{from}' to '{to}'")]
    IllegalTransition {
        catalog: String,
        from: String,
        to: String,
    },

    /// The entity was tracked under another catalog instance, which may
    /// carry the same name.
    #[error("Entity is tracked under another catalog '{found}', policy uses '{expected}'")]
    CatalogMismatch { expected: String, found: String },

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl TransitionError {
    /// Source code observed under the entity lock, when the attempt got
    /// that far.
    pub fn observed_from(&self) -> Option<&str> {
        match self {
            TransitionError::IllegalTransition { from, .. } => Some(from),
            _ => None,
        }
    }
}

/// Failure of a transition guarded by a caller-supplied action.
#[derive(Debug, Error)]
pub enum AttemptError<E> {
    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error("Transition action failed: {0}")]
    Action(#[source] E),
}
