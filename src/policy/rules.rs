//! Declared transition rules and the policy that enforces them.

use crate::core::{Catalog, TransitionLog, TransitionRecord, Variant};
use crate::policy::error::{AttemptError, TransitionError};
use crate::policy::state::CurrentState;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;
use uuid::Uuid;

/// A directed edge between two variant codes.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransitionRule {
    pub from: String,
    pub to: String,
}

impl TransitionRule {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

/// Legal-transition graph over one catalog.
///
/// Legality is decided by the declared rules alone. Terminal metadata on a
/// variant is never consulted, and a self-transition is legal only when a
/// rule for it was declared.
///
/// Built with [`PolicyBuilder`](crate::builder::PolicyBuilder), which
/// validates the rule set against the catalog.
#[derive(Debug)]
pub struct TransitionPolicy<V: Variant> {
    catalog: Arc<Catalog<V>>,
    initial: Option<String>,
    rules: Vec<TransitionRule>,
    exits: HashMap<String, Vec<String>>,
}

impl<V: Variant> TransitionPolicy<V> {
    pub(crate) fn from_parts(
        catalog: Arc<Catalog<V>>,
        initial: Option<String>,
        rules: Vec<TransitionRule>,
    ) -> Self {
        let mut exits: HashMap<String, Vec<String>> = HashMap::new();
        for rule in &rules {
            exits
                .entry(rule.from.clone())
                .or_default()
                .push(rule.to.clone());
        }

        Self {
            catalog,
            initial,
            rules,
            exits,
        }
    }

    pub fn catalog(&self) -> &Catalog<V> {
        &self.catalog
    }

    pub fn shared_catalog(&self) -> Arc<Catalog<V>> {
        Arc::clone(&self.catalog)
    }

    /// Declared starting variant, if the configuration named one.
    pub fn initial(&self) -> Option<&V> {
        self.initial
            .as_deref()
            .and_then(|code| self.catalog.variant(code).ok())
    }

    /// Declared rules in declaration order, wildcard expansions included.
    pub fn rules(&self) -> &[TransitionRule] {
        &self.rules
    }

    /// Whether `(from, to)` is a declared edge.
    pub fn is_legal(&self, from: &V, to: &V) -> bool {
        self.is_legal_code(from.code(), to.code())
    }

    pub fn is_legal_code(&self, from: &str, to: &str) -> bool {
        self.exits
            .get(from)
            .is_some_and(|targets| targets.iter().any(|t| t == to))
    }

    /// Variants reachable from `from` in one legal step.
    pub fn targets(&self, from: &V) -> Vec<&V> {
        self.exits
            .get(from.code())
            .map(|targets| {
                targets
                    .iter()
                    .filter_map(|code| self.catalog.variant(code).ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Start tracking a new entity at the variant with `code`.
    pub fn track(&self, code: &str) -> Result<CurrentState<V>, TransitionError> {
        self.track_with_id(Uuid::new_v4(), code)
    }

    pub fn track_with_id(&self, id: Uuid, code: &str) -> Result<CurrentState<V>, TransitionError> {
        let variant = self.catalog.variant(code)?.clone();
        Ok(self.restore(id, variant, TransitionLog::new()))
    }

    /// Rebuild an entity whose variant and log were already checked
    /// against this policy.
    pub(crate) fn restore(&self, id: Uuid, current: V, log: TransitionLog) -> CurrentState<V> {
        CurrentState::new(id, Arc::clone(&self.catalog), current, log)
    }

    /// Move `state` to `to` if the edge is declared.
    ///
    /// On any error the state is left exactly as it was.
    pub fn attempt(
        &self,
        state: &CurrentState<V>,
        to: &V,
    ) -> Result<TransitionRecord, TransitionError> {
        self.attempt_with(state, to, |_| Ok::<_, Infallible>(()))
            .map(|(record, ())| record)
            .map_err(|err| match err {
                AttemptError::Transition(err) => err,
                AttemptError::Action(never) => match never {},
            })
    }

    /// Same as [`attempt`](Self::attempt), looking the target up by code.
    pub fn attempt_code(
        &self,
        state: &CurrentState<V>,
        to: &str,
    ) -> Result<TransitionRecord, TransitionError> {
        let target = self.catalog.variant(to)?;
        self.attempt(state, target)
    }

    /// Validate the transition, run `action` with the source variant, and
    /// commit only if the action succeeds.
    ///
    /// The entity lock is held from the legality check through the commit,
    /// so no other writer can move the entity while `action` runs. The
    /// action must not read `state` itself; the lock is not reentrant.
    ///
    /// An entity tracked under a different catalog instance is rejected
    /// with [`TransitionError::CatalogMismatch`], even when the names match.
    pub fn attempt_with<R, E, F>(
        &self,
        state: &CurrentState<V>,
        to: &V,
        action: F,
    ) -> Result<(TransitionRecord, R), AttemptError<E>>
    where
        F: FnOnce(&V) -> Result<R, E>,
    {
        if !state.belongs_to(&self.catalog) {
            return Err(TransitionError::CatalogMismatch {
                expected: self.catalog.name().to_string(),
                found: state.catalog().to_string(),
            }
            .into());
        }

        let target = self
            .catalog
            .variant(to.code())
            .map_err(TransitionError::from)?;

        let mut tracked = state.lock();
        if !self.is_legal(&tracked.current, target) {
            tracing::warn!(
                entity = %state.id(),
                catalog = self.catalog.name(),
                from = tracked.current.code(),
                to = target.code(),
                "transition rejected"
            );
            return Err(TransitionError::IllegalTransition {
                catalog: self.catalog.name().to_string(),
                from: tracked.current.code().to_string(),
                to: target.code().to_string(),
            }
            .into());
        }

        let output = action(&tracked.current).map_err(AttemptError::Action)?;

        let record = TransitionRecord {
            from: tracked.current.code().to_string(),
            to: target.code().to_string(),
            timestamp: Utc::now(),
        };
        tracked.log.push(record.clone());
        tracked.current = target.clone();

        tracing::debug!(
            entity = %state.id(),
            catalog = self.catalog.name(),
            from = %record.from,
            to = %record.to,
            "transition applied"
        );

        Ok((record, output))
    }
}
