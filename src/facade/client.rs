//! Use-case driver combining a transition policy with capability bindings.

use crate::core::{TransitionRecord, Variant};
use crate::facade::observer::{TransitionEvent, TransitionObserver, TransitionOutcome};
use crate::policy::{AttemptError, CurrentState, TransitionError, TransitionPolicy};
use crate::registry::{BindingRegistry, Contract, RegistryError};
use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;

/// Failure of a facade use case.
#[derive(Debug, Error)]
pub enum FacadeError<E> {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error("Capability call failed: {0}")]
    Capability(#[source] E),
}

/// Drives use cases through a policy and a registry.
///
/// The facade never inspects concrete variant or implementation types:
/// legality comes from the policy, behavior from whatever the registry
/// currently has bound.
pub struct Facade<V: Variant> {
    policy: Arc<TransitionPolicy<V>>,
    registry: Arc<BindingRegistry>,
    observer: Option<Arc<dyn TransitionObserver>>,
}

impl<V: Variant> Facade<V> {
    pub fn new(policy: Arc<TransitionPolicy<V>>, registry: Arc<BindingRegistry>) -> Self {
        Self {
            policy,
            registry,
            observer: None,
        }
    }

    /// Report every transition outcome to `observer`.
    pub fn with_observer(mut self, observer: Arc<dyn TransitionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn policy(&self) -> &TransitionPolicy<V> {
        &self.policy
    }

    pub fn registry(&self) -> &BindingRegistry {
        &self.registry
    }

    /// Start tracking an entity at `code`.
    pub fn track(&self, code: &str) -> Result<CurrentState<V>, TransitionError> {
        self.policy.track(code)
    }

    /// Move `entity` to the variant with code `to`.
    pub fn advance(
        &self,
        entity: &CurrentState<V>,
        to: &str,
    ) -> Result<TransitionRecord, TransitionError> {
        let result = self.policy.attempt_code(entity, to);
        match &result {
            Ok(record) => self.notify(entity, &record.from, to, TransitionOutcome::Applied),
            Err(err) => self.notify(
                entity,
                &Self::source_of(entity, err.observed_from()),
                to,
                TransitionOutcome::Rejected {
                    reason: err.to_string(),
                },
            ),
        }
        result
    }

    /// Call the implementation currently bound to `C`.
    pub fn invoke<C, R>(&self, call: impl FnOnce(&C::Object) -> R) -> Result<R, RegistryError>
    where
        C: Contract,
    {
        let implementation = self.registry.resolve::<C>()?;
        Ok(call(&*implementation))
    }

    /// Call the implementation bound to the named slot of `C`.
    pub fn invoke_named<C, R>(
        &self,
        name: &str,
        call: impl FnOnce(&C::Object) -> R,
    ) -> Result<R, RegistryError>
    where
        C: Contract,
    {
        let implementation = self.registry.resolve_named::<C>(name)?;
        Ok(call(&*implementation))
    }

    /// Resolve `C`, validate the move to `to`, run `call`, then commit.
    ///
    /// The entity stays where it was unless resolution, validation and the
    /// capability call all succeed.
    ///
    /// `call` runs while the entity lock is held and receives the source
    /// variant. It must not read `entity` (`current`, `log`, or its `Debug`
    /// output): the lock is not reentrant and the call would deadlock.
    pub fn perform<C, R, E>(
        &self,
        entity: &CurrentState<V>,
        to: &str,
        call: impl FnOnce(&C::Object, &V) -> Result<R, E>,
    ) -> Result<(TransitionRecord, R), FacadeError<E>>
    where
        C: Contract,
        E: std::fmt::Display,
    {
        let implementation = self.registry.resolve::<C>()?;
        self.perform_with(entity, to, implementation, call)
    }

    /// Like [`perform`](Self::perform), using a named slot of `C`.
    ///
    /// The same locking rule applies: `call` must not read `entity`.
    pub fn perform_named<C, R, E>(
        &self,
        name: &str,
        entity: &CurrentState<V>,
        to: &str,
        call: impl FnOnce(&C::Object, &V) -> Result<R, E>,
    ) -> Result<(TransitionRecord, R), FacadeError<E>>
    where
        C: Contract,
        E: std::fmt::Display,
    {
        let implementation = self.registry.resolve_named::<C>(name)?;
        self.perform_with(entity, to, implementation, call)
    }

    fn perform_with<O, R, E>(
        &self,
        entity: &CurrentState<V>,
        to: &str,
        implementation: Arc<O>,
        call: impl FnOnce(&O, &V) -> Result<R, E>,
    ) -> Result<(TransitionRecord, R), FacadeError<E>>
    where
        O: ?Sized,
        E: std::fmt::Display,
    {
        let mut observed: Option<String> = None;
        let result = self
            .policy
            .catalog()
            .variant(to)
            .map_err(|err| AttemptError::Transition(err.into()))
            .and_then(|target| {
                self.policy.attempt_with(entity, target, |from| {
                    observed = Some(from.code().to_string());
                    call(&*implementation, from)
                })
            });

        match result {
            Ok((record, output)) => {
                self.notify(entity, &record.from, to, TransitionOutcome::Applied);
                Ok((record, output))
            }
            Err(AttemptError::Transition(err)) => {
                self.notify(
                    entity,
                    &Self::source_of(entity, err.observed_from()),
                    to,
                    TransitionOutcome::Rejected {
                        reason: err.to_string(),
                    },
                );
                Err(FacadeError::Transition(err))
            }
            Err(AttemptError::Action(err)) => {
                self.notify(
                    entity,
                    &Self::source_of(entity, observed.as_deref()),
                    to,
                    TransitionOutcome::ActionFailed {
                        reason: err.to_string(),
                    },
                );
                Err(FacadeError::Capability(err))
            }
        }
    }

    /// Prefer the source seen under the entity lock. Errors raised before
    /// the lock was taken never looked at the entity, so fall back to a
    /// fresh read.
    fn source_of(entity: &CurrentState<V>, observed: Option<&str>) -> String {
        observed.map_or_else(|| entity.current_code(), str::to_string)
    }

    fn notify(&self, entity: &CurrentState<V>, from: &str, to: &str, outcome: TransitionOutcome) {
        let Some(observer) = &self.observer else {
            return;
        };
        observer.on_transition(&TransitionEvent {
            entity: entity.id(),
            catalog: entity.catalog().to_string(),
            from: from.to_string(),
            to: to.to_string(),
            outcome,
            at: Utc::now(),
        });
    }
}
