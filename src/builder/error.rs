//! Build errors for catalogs and transition policies.

use crate::core::CatalogError;
use thiserror::Error;

/// A single problem found while validating a rule set against its catalog.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigViolation {
    #[error("Rule '{from}' -> '{to}' references unknown code '{missing}'")]
    UnknownEndpoint {
        from: String,
        to: String,
        missing: String,
    },

    #[error("Rule '{from}' -> '{to}' is declared more than once")]
    DuplicateRule { from: String, to: String },

    #[error("Wildcard target '{code}' is not in the catalog")]
    UnknownWildcardTarget { code: String },

    #[error("Initial code '{code}' is not in the catalog")]
    UnknownInitial { code: String },

    #[error("Strict validation needs an initial variant. Call .initial(code)")]
    MissingInitial,

    #[error("Variant '{code}' cannot be reached from the initial variant")]
    Unreachable { code: String },

    #[error("Variant '{code}' has no exits but is not marked final")]
    DeadEnd { code: String },

    #[error("Final variant '{code}' declares outgoing rules")]
    FinalHasExits { code: String },
}

/// Errors that can occur when building a transition policy.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Invalid transition configuration: {}", join(.0))]
    Invalid(Vec<ConfigViolation>),

    #[error("Malformed catalog configuration: {0}")]
    Config(String),
}

fn join(violations: &[ConfigViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
