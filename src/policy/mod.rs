//! Transition policy: declared legal edges and their enforcement.
//!
//! A [`TransitionPolicy`] pairs a catalog with its rule set. Each tracked
//! entity is a [`CurrentState`]; every change to it goes through
//! [`TransitionPolicy::attempt`] as one atomic check-then-set.

mod error;
mod rules;
mod state;

pub use error::{AttemptError, TransitionError};
pub use rules::{TransitionPolicy, TransitionRule};
pub use state::CurrentState;
