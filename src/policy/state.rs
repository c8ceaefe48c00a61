//! Per-entity current variant.

use crate::core::{Catalog, TransitionLog, Variant};
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;
use uuid::Uuid;

pub(crate) struct Tracked<V: Variant> {
    pub(crate) current: V,
    pub(crate) log: TransitionLog,
}

/// The variant currently occupied by one tracked entity.
///
/// Created by [`TransitionPolicy::track`](crate::policy::TransitionPolicy::track),
/// so the held variant always belongs to the policy's catalog. The entity
/// keeps a handle to that exact catalog instance, and only policies built
/// over the same instance may move it. All mutation
/// goes through the policy while holding the entity lock, which makes each
/// check-then-set atomic with respect to other threads.
pub struct CurrentState<V: Variant> {
    id: Uuid,
    catalog: Arc<Catalog<V>>,
    inner: Mutex<Tracked<V>>,
}

impl<V: Variant> CurrentState<V> {
    pub(crate) fn new(
        id: Uuid,
        catalog: Arc<Catalog<V>>,
        current: V,
        log: TransitionLog,
    ) -> Self {
        Self {
            id,
            catalog,
            inner: Mutex::new(Tracked { current, log }),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Name of the catalog this entity is tracked under.
    pub fn catalog(&self) -> &str {
        self.catalog.name()
    }

    /// Whether this entity was tracked under exactly `catalog`.
    ///
    /// Compares catalog instances, so two catalogs sharing a name are
    /// still distinct.
    pub fn belongs_to(&self, catalog: &Arc<Catalog<V>>) -> bool {
        Arc::ptr_eq(&self.catalog, catalog)
    }

    /// Copy of the current variant.
    pub fn current(&self) -> V {
        self.inner.lock().current.clone()
    }

    pub fn current_code(&self) -> String {
        self.inner.lock().current.code().to_string()
    }

    pub fn is_final(&self) -> bool {
        self.inner.lock().current.is_final()
    }

    /// Copy of the transitions applied so far.
    pub fn log(&self) -> TransitionLog {
        self.inner.lock().log.clone()
    }

    /// Read variant and log together under one lock acquisition.
    pub fn read<R>(&self, f: impl FnOnce(&V, &TransitionLog) -> R) -> R {
        let guard = self.inner.lock();
        f(&guard.current, &guard.log)
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, Tracked<V>> {
        self.inner.lock()
    }
}

impl<V: Variant> std::fmt::Debug for CurrentState<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let guard = self.inner.lock();
        f.debug_struct("CurrentState")
            .field("id", &self.id)
            .field("catalog", &self.catalog.name())
            .field("current", &guard.current.code())
            .field("transitions", &guard.log.len())
            .finish()
    }
}
