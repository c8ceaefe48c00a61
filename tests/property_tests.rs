//! Property-based tests for catalogs, policies and the registry.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated catalogs and rule sets.

use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use switchyard::builder::PolicyBuilder;
use switchyard::core::{Catalog, Variant, VariantRecord};
use switchyard::declare_contract;
use switchyard::policy::TransitionPolicy;
use switchyard::registry::{BindingRegistry, RegistryError};

const CODES: [&str; 5] = ["A", "B", "C", "D", "E"];

fn catalog() -> Catalog<VariantRecord> {
    Catalog::new(
        "props",
        CODES.iter().map(|code| VariantRecord::new(*code, "Same label")),
    )
    .unwrap()
}

prop_compose! {
    fn arbitrary_rules()(edges in prop::collection::hash_set((0..5usize, 0..5usize), 0..15))
        -> HashSet<(usize, usize)> {
        edges
    }
}

fn policy_for(edges: &HashSet<(usize, usize)>) -> TransitionPolicy<VariantRecord> {
    edges
        .iter()
        .fold(PolicyBuilder::new(catalog()), |builder, &(from, to)| {
            builder.rule(CODES[from], CODES[to])
        })
        .build()
        .unwrap()
}

trait Tagged: Send + Sync {
    fn tag(&self) -> usize;
}

struct Impl(usize);

impl Tagged for Impl {
    fn tag(&self) -> usize {
        self.0
    }
}

declare_contract!(Tagging => dyn Tagged, "tagging");

proptest! {
    #[test]
    fn is_legal_iff_declared(edges in arbitrary_rules()) {
        let policy = policy_for(&edges);

        for (i, from) in CODES.iter().enumerate() {
            for (j, to) in CODES.iter().enumerate() {
                let a = policy.catalog().variant(from).unwrap();
                let b = policy.catalog().variant(to).unwrap();
                prop_assert_eq!(policy.is_legal(a, b), edges.contains(&(i, j)));
            }
        }
    }

    #[test]
    fn failed_attempt_never_mutates(
        edges in arbitrary_rules(),
        start in 0..5usize,
        steps in prop::collection::vec(0..5usize, 1..12)
    ) {
        let policy = policy_for(&edges);
        let state = policy.track(CODES[start]).unwrap();
        let mut expected = start;

        for target in steps {
            let before = state.log();
            let result = policy.attempt_code(&state, CODES[target]);

            if edges.contains(&(expected, target)) {
                prop_assert!(result.is_ok());
                expected = target;
            } else {
                prop_assert!(result.is_err());
                prop_assert_eq!(state.log(), before);
            }
            prop_assert_eq!(state.current_code(), CODES[expected]);
        }
    }

    #[test]
    fn identity_follows_code_only(i in 0..5usize, j in 0..5usize, label in "[a-z]{1,8}") {
        let a = VariantRecord::new(CODES[i], label.clone()).with_meta("k", 1);
        let b = VariantRecord::new(CODES[j], label).with_meta("k", 1);

        prop_assert_eq!(a.same_as(&b), i == j);
    }

    #[test]
    fn resolve_tracks_latest_rebind(tags in prop::collection::vec(0..1000usize, 1..8)) {
        let registry = BindingRegistry::new();
        registry.bind::<Tagging>(Arc::new(Impl(tags[0]))).unwrap();
        let first = registry.resolve::<Tagging>().unwrap();

        for tag in &tags[1..] {
            registry.rebind::<Tagging>(Arc::new(Impl(*tag))).unwrap();
            prop_assert_eq!(registry.resolve::<Tagging>().unwrap().tag(), *tag);
        }

        prop_assert_eq!(first.tag(), tags[0]);
        prop_assert_eq!(registry.generation::<Tagging>(), Some(tags.len() as u64));
    }

    #[test]
    fn unbound_resolve_always_fails(name in "[a-z]{1,6}") {
        let registry = BindingRegistry::new();

        let is_unbound = matches!(
            registry.resolve_named::<Tagging>(&name),
            Err(RegistryError::Unbound { .. })
        );
        prop_assert!(is_unbound);
    }
}
