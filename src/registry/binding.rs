//! Binding registry: one active implementation per contract slot.

use crate::registry::contract::Contract;
use crate::registry::error::RegistryError;
use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct BindingKey {
    contract: TypeId,
    name: Option<String>,
}

impl BindingKey {
    fn of<C: Contract>(name: Option<&str>) -> Self {
        Self {
            contract: TypeId::of::<C>(),
            name: name.map(str::to_string),
        }
    }
}

/// Registry-owned record of one binding.
///
/// `implementation` holds an `Arc<C::Object>`; the object itself is shared
/// with whoever constructed it.
#[derive(Clone)]
struct Binding {
    contract: &'static str,
    name: Option<String>,
    generation: u64,
    bound_at: DateTime<Utc>,
    implementation: Arc<dyn Any + Send + Sync>,
}

impl Binding {
    fn new<C: Contract>(name: Option<&str>, implementation: Arc<C::Object>, generation: u64) -> Self {
        Self {
            contract: C::NAME,
            name: name.map(str::to_string),
            generation,
            bound_at: Utc::now(),
            implementation: Arc::new(implementation),
        }
    }

    fn implementation<C: Contract>(&self) -> Option<Arc<C::Object>> {
        self.implementation
            .downcast_ref::<Arc<C::Object>>()
            .map(Arc::clone)
    }
}

/// Public description of an active binding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BindingInfo {
    pub contract: &'static str,
    pub name: Option<String>,
    /// 1 on first bind, incremented by every rebind.
    pub generation: u64,
    pub bound_at: DateTime<Utc>,
}

#[derive(Clone, Default)]
struct RegistrySnapshot {
    bindings: HashMap<BindingKey, Binding>,
}

/// Associates each contract slot with exactly one active implementation.
///
/// Reads load an immutable snapshot; writers publish a new snapshot with a
/// compare-and-swap loop. A `resolve` therefore sees either the old or the
/// new binding, never a mix, and handles resolved before a `rebind` keep
/// pointing at the implementation they were given.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use switchyard::declare_contract;
/// use switchyard::registry::BindingRegistry;
///
/// pub trait Gateway: Send + Sync {
///     fn name(&self) -> &'static str;
/// }
///
/// struct Stripe;
/// impl Gateway for Stripe {
///     fn name(&self) -> &'static str { "stripe" }
/// }
///
/// struct Razorpay;
/// impl Gateway for Razorpay {
///     fn name(&self) -> &'static str { "razorpay" }
/// }
///
/// declare_contract!(pub Payment => dyn Gateway, "payment");
///
/// let registry = BindingRegistry::new();
/// registry.bind::<Payment>(Arc::new(Stripe)).unwrap();
/// let before = registry.resolve::<Payment>().unwrap();
///
/// registry.rebind::<Payment>(Arc::new(Razorpay)).unwrap();
///
/// assert_eq!(before.name(), "stripe");
/// assert_eq!(registry.resolve::<Payment>().unwrap().name(), "razorpay");
/// ```
pub struct BindingRegistry {
    snap: ArcSwap<RegistrySnapshot>,
}

impl BindingRegistry {
    pub fn new() -> Self {
        Self {
            snap: ArcSwap::from_pointee(RegistrySnapshot::default()),
        }
    }

    /// Bind the default slot of `C`. Fails if it is already bound.
    pub fn bind<C: Contract>(&self, implementation: Arc<C::Object>) -> Result<(), RegistryError> {
        self.bind_slot::<C>(None, implementation)
    }

    /// Bind a named slot of `C`, for callers needing several implementations at once.
    pub fn bind_named<C: Contract>(
        &self,
        name: &str,
        implementation: Arc<C::Object>,
    ) -> Result<(), RegistryError> {
        self.bind_slot::<C>(Some(name), implementation)
    }

    /// Currently active implementation of the default slot.
    pub fn resolve<C: Contract>(&self) -> Result<Arc<C::Object>, RegistryError> {
        self.resolve_slot::<C>(None)
    }

    pub fn resolve_named<C: Contract>(&self, name: &str) -> Result<Arc<C::Object>, RegistryError> {
        self.resolve_slot::<C>(Some(name))
    }

    /// Replace the default slot's implementation, returning the previous one.
    pub fn rebind<C: Contract>(
        &self,
        implementation: Arc<C::Object>,
    ) -> Result<Arc<C::Object>, RegistryError> {
        self.rebind_slot::<C>(None, implementation)
    }

    pub fn rebind_named<C: Contract>(
        &self,
        name: &str,
        implementation: Arc<C::Object>,
    ) -> Result<Arc<C::Object>, RegistryError> {
        self.rebind_slot::<C>(Some(name), implementation)
    }

    /// Release the default slot, returning the implementation it held.
    pub fn unbind<C: Contract>(&self) -> Result<Arc<C::Object>, RegistryError> {
        self.unbind_slot::<C>(None)
    }

    pub fn unbind_named<C: Contract>(&self, name: &str) -> Result<Arc<C::Object>, RegistryError> {
        self.unbind_slot::<C>(Some(name))
    }

    pub fn is_bound<C: Contract>(&self) -> bool {
        self.snap
            .load()
            .bindings
            .contains_key(&BindingKey::of::<C>(None))
    }

    pub fn generation<C: Contract>(&self) -> Option<u64> {
        self.snap
            .load()
            .bindings
            .get(&BindingKey::of::<C>(None))
            .map(|b| b.generation)
    }

    /// Active bindings sorted by contract name, then slot name.
    pub fn bindings(&self) -> Vec<BindingInfo> {
        let snap = self.snap.load();
        let mut infos: Vec<BindingInfo> = snap
            .bindings
            .values()
            .map(|b| BindingInfo {
                contract: b.contract,
                name: b.name.clone(),
                generation: b.generation,
                bound_at: b.bound_at,
            })
            .collect();
        infos.sort_by(|a, b| (a.contract, &a.name).cmp(&(b.contract, &b.name)));
        infos
    }

    pub fn len(&self) -> usize {
        self.snap.load().bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snap.load().bindings.is_empty()
    }

    fn bind_slot<C: Contract>(
        &self,
        name: Option<&str>,
        implementation: Arc<C::Object>,
    ) -> Result<(), RegistryError> {
        let key = BindingKey::of::<C>(name);
        self.update(|snap| {
            if snap.bindings.contains_key(&key) {
                return Err(RegistryError::AlreadyBound {
                    contract: C::NAME,
                    name: key.name.clone(),
                });
            }
            let mut next = snap.clone();
            next.bindings.insert(
                key.clone(),
                Binding::new::<C>(name, Arc::clone(&implementation), 1),
            );
            Ok((next, ()))
        })?;

        tracing::debug!(contract = C::NAME, slot = ?name, "contract bound");
        Ok(())
    }

    fn resolve_slot<C: Contract>(&self, name: Option<&str>) -> Result<Arc<C::Object>, RegistryError> {
        let key = BindingKey::of::<C>(name);
        let found = self
            .snap
            .load()
            .bindings
            .get(&key)
            .and_then(Binding::implementation::<C>);
        match found {
            Some(implementation) => Ok(implementation),
            None => {
                tracing::warn!(contract = C::NAME, slot = ?name, "resolve on unbound contract");
                Err(RegistryError::Unbound {
                    contract: C::NAME,
                    name: key.name,
                })
            }
        }
    }

    fn rebind_slot<C: Contract>(
        &self,
        name: Option<&str>,
        implementation: Arc<C::Object>,
    ) -> Result<Arc<C::Object>, RegistryError> {
        let key = BindingKey::of::<C>(name);
        let (previous, generation) = self.update(|snap| {
            let Some((old, generation)) = snap
                .bindings
                .get(&key)
                .and_then(|b| Some((b.implementation::<C>()?, b.generation)))
            else {
                return Err(RegistryError::Unbound {
                    contract: C::NAME,
                    name: key.name.clone(),
                });
            };
            let mut next = snap.clone();
            next.bindings.insert(
                key.clone(),
                Binding::new::<C>(name, Arc::clone(&implementation), generation + 1),
            );
            Ok((next, (old, generation + 1)))
        })?;

        tracing::debug!(contract = C::NAME, slot = ?name, generation, "contract rebound");
        Ok(previous)
    }

    fn unbind_slot<C: Contract>(&self, name: Option<&str>) -> Result<Arc<C::Object>, RegistryError> {
        let key = BindingKey::of::<C>(name);
        let previous = self.update(|snap| {
            let Some(old) = snap.bindings.get(&key).and_then(Binding::implementation::<C>) else {
                return Err(RegistryError::Unbound {
                    contract: C::NAME,
                    name: key.name.clone(),
                });
            };
            let mut next = snap.clone();
            next.bindings.remove(&key);
            Ok((next, old))
        })?;

        tracing::debug!(contract = C::NAME, slot = ?name, "contract unbound");
        Ok(previous)
    }

    /// Publish a snapshot derived from the current one, retrying if another
    /// writer got there first.
    fn update<T, F>(&self, mut f: F) -> Result<T, RegistryError>
    where
        F: FnMut(&RegistrySnapshot) -> Result<(RegistrySnapshot, T), RegistryError>,
    {
        loop {
            let cur = self.snap.load_full();
            let (next, out) = f(&cur)?;

            let prev = self.snap.compare_and_swap(&cur, Arc::new(next));
            if Arc::ptr_eq(&prev, &cur) {
                return Ok(out);
            }
        }
    }
}

impl Default for BindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BindingRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BindingRegistry")
            .field("bindings", &self.bindings())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    trait Notifier: Send + Sync {
        fn channel(&self) -> &'static str;
    }

    struct Email;
    impl Notifier for Email {
        fn channel(&self) -> &'static str {
            "email"
        }
    }

    struct Sms;
    impl Notifier for Sms {
        fn channel(&self) -> &'static str {
            "sms"
        }
    }

    crate::declare_contract!(Notification => dyn Notifier, "notification");

    trait Counter: Send + Sync {
        fn bump(&self) -> usize;
    }

    #[derive(Default)]
    struct Hits(AtomicUsize);
    impl Counter for Hits {
        fn bump(&self) -> usize {
            self.0.fetch_add(1, Ordering::SeqCst) + 1
        }
    }

    crate::declare_contract!(Counting => dyn Counter, "counting");

    #[test]
    fn resolve_returns_bound_implementation() {
        let registry = BindingRegistry::new();
        registry.bind::<Notification>(Arc::new(Email)).unwrap();

        assert_eq!(registry.resolve::<Notification>().unwrap().channel(), "email");
        assert_eq!(registry.resolve::<Notification>().unwrap().channel(), "email");
        assert!(registry.is_bound::<Notification>());
        assert_eq!(registry.generation::<Notification>(), Some(1));
    }

    #[test]
    fn resolve_unbound_fails() {
        let registry = BindingRegistry::new();

        let err = registry.resolve::<Notification>().err().unwrap();

        assert_eq!(
            err,
            RegistryError::Unbound {
                contract: "notification",
                name: None,
            }
        );
    }

    #[test]
    fn bind_twice_is_rejected() {
        let registry = BindingRegistry::new();
        registry.bind::<Notification>(Arc::new(Email)).unwrap();

        let err = registry.bind::<Notification>(Arc::new(Sms)).unwrap_err();

        assert!(matches!(err, RegistryError::AlreadyBound { .. }));
        assert_eq!(registry.resolve::<Notification>().unwrap().channel(), "email");
    }

    #[test]
    fn rebind_swaps_and_returns_previous() {
        let registry = BindingRegistry::new();
        registry.bind::<Notification>(Arc::new(Email)).unwrap();
        let held = registry.resolve::<Notification>().unwrap();

        let previous = registry.rebind::<Notification>(Arc::new(Sms)).unwrap();

        assert_eq!(previous.channel(), "email");
        assert_eq!(held.channel(), "email");
        assert_eq!(registry.resolve::<Notification>().unwrap().channel(), "sms");
        assert_eq!(registry.generation::<Notification>(), Some(2));
    }

    #[test]
    fn rebind_unbound_fails() {
        let registry = BindingRegistry::new();

        let err = registry.rebind::<Notification>(Arc::new(Sms)).err().unwrap();

        assert!(matches!(err, RegistryError::Unbound { .. }));
        assert!(!registry.is_bound::<Notification>());
    }

    #[test]
    fn named_slots_are_independent() {
        let registry = BindingRegistry::new();
        registry.bind_named::<Notification>("primary", Arc::new(Email)).unwrap();
        registry.bind_named::<Notification>("fallback", Arc::new(Sms)).unwrap();

        assert_eq!(
            registry.resolve_named::<Notification>("primary").unwrap().channel(),
            "email"
        );
        assert_eq!(
            registry.resolve_named::<Notification>("fallback").unwrap().channel(),
            "sms"
        );
        assert!(registry.resolve::<Notification>().is_err());

        let err = registry.resolve_named::<Notification>("tertiary").err().unwrap();
        assert_eq!(err.to_string(), "No implementation bound for contract 'notification' (binding 'tertiary')");
    }

    #[test]
    fn unbind_releases_slot() {
        let registry = BindingRegistry::new();
        registry.bind::<Notification>(Arc::new(Email)).unwrap();

        let released = registry.unbind::<Notification>().unwrap();

        assert_eq!(released.channel(), "email");
        assert!(registry.is_empty());
        assert!(registry.unbind::<Notification>().is_err());
    }

    #[test]
    fn implementation_is_shared_with_constructor() {
        let registry = BindingRegistry::new();
        let hits = Arc::new(Hits::default());
        registry.bind::<Counting>(hits.clone()).unwrap();

        registry.resolve::<Counting>().unwrap().bump();
        registry.resolve::<Counting>().unwrap().bump();

        assert_eq!(hits.0.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn bindings_lists_active_slots() {
        let registry = BindingRegistry::new();
        registry.bind::<Notification>(Arc::new(Email)).unwrap();
        registry.bind_named::<Notification>("backup", Arc::new(Sms)).unwrap();
        registry.bind::<Counting>(Arc::new(Hits::default())).unwrap();

        let listed: Vec<(&str, Option<String>)> = registry
            .bindings()
            .into_iter()
            .map(|info| (info.contract, info.name))
            .collect();

        assert_eq!(
            listed,
            vec![
                ("counting", None),
                ("notification", None),
                ("notification", Some("backup".to_string())),
            ]
        );
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn concurrent_binds_of_distinct_slots_all_land() {
        let registry = BindingRegistry::new();
        let names: Vec<String> = (0..16).map(|i| format!("slot-{i}")).collect();

        std::thread::scope(|scope| {
            for name in &names {
                let registry = &registry;
                scope.spawn(move || {
                    registry
                        .bind_named::<Notification>(name, Arc::new(Email))
                        .unwrap();
                });
            }
        });

        assert_eq!(registry.len(), 16);
    }
}
