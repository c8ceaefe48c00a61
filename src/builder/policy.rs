//! Builder for validated transition policies.

use crate::builder::error::{BuildError, ConfigViolation};
use crate::core::{Catalog, Variant};
use crate::policy::{TransitionPolicy, TransitionRule};
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

type Check = Validation<(), NonEmptyVec<ConfigViolation>>;

/// Builder for constructing transition policies with a fluent API.
///
/// Every configuration problem is collected before `build` reports, so a
/// broken rule set is diagnosed in one pass.
///
/// # Example
///
/// ```rust
/// use switchyard::builder::PolicyBuilder;
/// use switchyard::core::{Catalog, VariantRecord};
///
/// let catalog = Catalog::new(
///     "task",
///     vec![
///         VariantRecord::new("TODO", "To do"),
///         VariantRecord::new("DOING", "In progress"),
///         VariantRecord::new("DONE", "Done").terminal(),
///     ],
/// )
/// .unwrap();
///
/// let policy = PolicyBuilder::new(catalog)
///     .initial("TODO")
///     .rule("TODO", "DOING")
///     .rule("DOING", "DONE")
///     .strict()
///     .build()
///     .unwrap();
///
/// assert_eq!(policy.rules().len(), 2);
/// ```
pub struct PolicyBuilder<V: Variant> {
    catalog: Arc<Catalog<V>>,
    initial: Option<String>,
    rules: Vec<TransitionRule>,
    from_any: Vec<String>,
    strict: bool,
}

impl<V: Variant> PolicyBuilder<V> {
    pub fn new(catalog: Catalog<V>) -> Self {
        Self::from_shared(Arc::new(catalog))
    }

    /// Start from a catalog already shared with other policies.
    pub fn from_shared(catalog: Arc<Catalog<V>>) -> Self {
        Self {
            catalog,
            initial: None,
            rules: Vec::new(),
            from_any: Vec::new(),
            strict: false,
        }
    }

    /// Name the starting variant.
    pub fn initial(mut self, code: impl Into<String>) -> Self {
        self.initial = Some(code.into());
        self
    }

    /// Declare one legal edge.
    pub fn rule(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.rules.push(TransitionRule::new(from, to));
        self
    }

    /// Declare several edges at once.
    pub fn rules<I>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = TransitionRule>,
    {
        self.rules.extend(rules);
        self
    }

    /// Allow entering `to` from every other variant.
    ///
    /// Expanded into concrete edges at build time. No self-loop is added;
    /// declare `(to, to)` explicitly if one is wanted.
    pub fn from_any(mut self, to: impl Into<String>) -> Self {
        self.from_any.push(to.into());
        self
    }

    /// Also check reachability, dead ends and exits from final variants.
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Run every check, accumulating all violations.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<ConfigViolation>> {
        let mut checks: Vec<Check> = Vec::new();

        let mut seen = HashSet::new();
        for rule in &self.rules {
            for code in [&rule.from, &rule.to] {
                checks.push(self.require(self.catalog.position(code).is_some(), || {
                    ConfigViolation::UnknownEndpoint {
                        from: rule.from.clone(),
                        to: rule.to.clone(),
                        missing: code.clone(),
                    }
                }));
                if rule.is_self_loop() {
                    break;
                }
            }
            checks.push(self.require(seen.insert(rule), || ConfigViolation::DuplicateRule {
                from: rule.from.clone(),
                to: rule.to.clone(),
            }));
        }

        for code in &self.from_any {
            checks.push(self.require(self.catalog.position(code).is_some(), || {
                ConfigViolation::UnknownWildcardTarget { code: code.clone() }
            }));
        }

        if let Some(code) = &self.initial {
            checks.push(self.require(self.catalog.position(code).is_some(), || {
                ConfigViolation::UnknownInitial { code: code.clone() }
            }));
        }

        if self.strict {
            checks.extend(self.topology_checks());
        }

        Validation::all_vec(checks).map(|_| ())
    }

    /// Build the policy.
    /// Returns an error listing every violation if validation fails.
    pub fn build(self) -> Result<TransitionPolicy<V>, BuildError> {
        if let Validation::Failure(errors) = self.validate() {
            return Err(BuildError::Invalid(errors.iter().cloned().collect()));
        }

        let rules = self.expanded_rules();
        Ok(TransitionPolicy::from_parts(
            self.catalog,
            self.initial,
            rules,
        ))
    }

    fn require(&self, ok: bool, violation: impl FnOnce() -> ConfigViolation) -> Check {
        if ok {
            Validation::success(())
        } else {
            Validation::fail(violation())
        }
    }

    /// Explicit rules followed by wildcard expansions not already declared.
    fn expanded_rules(&self) -> Vec<TransitionRule> {
        let mut rules = self.rules.clone();
        let mut seen: HashSet<TransitionRule> = rules.iter().cloned().collect();

        for to in &self.from_any {
            if self.catalog.position(to).is_none() {
                continue;
            }
            for variant in self.catalog.all() {
                if variant.code() == to {
                    continue;
                }
                let rule = TransitionRule::new(variant.code(), to.as_str());
                if seen.insert(rule.clone()) {
                    rules.push(rule);
                }
            }
        }
        rules
    }

    fn topology_checks(&self) -> Vec<Check> {
        let mut checks = Vec::new();
        let rules: Vec<TransitionRule> = self
            .expanded_rules()
            .into_iter()
            .filter(|r| {
                self.catalog.position(&r.from).is_some() && self.catalog.position(&r.to).is_some()
            })
            .collect();

        for variant in self.catalog.all() {
            let has_exit = rules.iter().any(|r| r.from == variant.code());
            if variant.is_final() {
                checks.push(self.require(!has_exit, || ConfigViolation::FinalHasExits {
                    code: variant.code().to_string(),
                }));
            } else {
                checks.push(self.require(has_exit, || ConfigViolation::DeadEnd {
                    code: variant.code().to_string(),
                }));
            }
        }

        let Some(initial) = self.initial.as_deref() else {
            checks.push(Validation::fail(ConfigViolation::MissingInitial));
            return checks;
        };
        if self.catalog.position(initial).is_none() {
            return checks;
        }

        let mut reached: HashSet<&str> = HashSet::from([initial]);
        let mut queue = VecDeque::from([initial]);
        while let Some(code) = queue.pop_front() {
            for rule in rules.iter().filter(|r| r.from == code) {
                if reached.insert(rule.to.as_str()) {
                    queue.push_back(rule.to.as_str());
                }
            }
        }

        for variant in self.catalog.all() {
            checks.push(
                self.require(reached.contains(variant.code()), || {
                    ConfigViolation::Unreachable {
                        code: variant.code().to_string(),
                    }
                }),
            );
        }
        checks
    }
}
