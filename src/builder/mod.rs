//! Builder API for catalogs and transition policies.
//!
//! This module provides the fluent [`PolicyBuilder`], the `variant_enum!`
//! macro for closed Rust enums, and [`CatalogConfig`] for catalogs defined
//! as configuration data.

pub mod config;
pub mod error;
pub mod macros;
pub mod policy;

pub use config::CatalogConfig;
pub use error::{BuildError, ConfigViolation};
pub use policy::PolicyBuilder;

use crate::core::{Catalog, Variant};
use crate::policy::TransitionPolicy;

/// Build a policy from a catalog and a list of `(from, to)` code pairs.
///
/// # Example
///
/// ```
/// use switchyard::builder::linear_policy;
/// use switchyard::variant_enum;
///
/// variant_enum! {
///     enum Light {
///         Red = "RED" => "Stop",
///         Green = "GREEN" => "Go",
///     }
/// }
///
/// let policy = linear_policy(
///     Light::catalog().unwrap(),
///     &[("RED", "GREEN"), ("GREEN", "RED")],
/// )
/// .unwrap();
/// assert!(policy.is_legal(&Light::Red, &Light::Green));
/// ```
pub fn linear_policy<V: Variant>(
    catalog: Catalog<V>,
    edges: &[(&str, &str)],
) -> Result<TransitionPolicy<V>, BuildError> {
    edges
        .iter()
        .fold(PolicyBuilder::new(catalog), |builder, (from, to)| {
            builder.rule(*from, *to)
        })
        .build()
}
