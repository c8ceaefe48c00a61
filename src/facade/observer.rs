//! Optional reporting of transition outcomes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What happened to one requested transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransitionOutcome {
    Applied,
    /// The policy refused the transition.
    Rejected { reason: String },
    /// The transition was legal but the capability call failed.
    ActionFailed { reason: String },
}

/// Report sent to a [`TransitionObserver`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionEvent {
    pub entity: Uuid,
    pub catalog: String,
    /// Variant the entity occupied when the request was handled.
    pub from: String,
    /// Requested target code.
    pub to: String,
    pub outcome: TransitionOutcome,
    pub at: DateTime<Utc>,
}

impl TransitionEvent {
    pub fn is_applied(&self) -> bool {
        matches!(self.outcome, TransitionOutcome::Applied)
    }
}

/// Receives every transition outcome handled by a facade.
pub trait TransitionObserver: Send + Sync {
    fn on_transition(&self, event: &TransitionEvent);
}

/// Observer forwarding events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl TransitionObserver for TracingObserver {
    fn on_transition(&self, event: &TransitionEvent) {
        match &event.outcome {
            TransitionOutcome::Applied => tracing::info!(
                entity = %event.entity,
                catalog = %event.catalog,
                from = %event.from,
                to = %event.to,
                "transition applied"
            ),
            TransitionOutcome::Rejected { reason } => tracing::warn!(
                entity = %event.entity,
                catalog = %event.catalog,
                from = %event.from,
                to = %event.to,
                %reason,
                "transition rejected"
            ),
            TransitionOutcome::ActionFailed { reason } => tracing::warn!(
                entity = %event.entity,
                catalog = %event.catalog,
                from = %event.from,
                to = %event.to,
                %reason,
                "transition action failed"
            ),
        }
    }
}
