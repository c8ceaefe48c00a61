//! Client facade: resolve capabilities, validate transitions, invoke.

mod client;
mod observer;

pub use client::{Facade, FacadeError};
pub use observer::{TracingObserver, TransitionEvent, TransitionObserver, TransitionOutcome};
