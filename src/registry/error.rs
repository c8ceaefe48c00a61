//! Registry errors.

use thiserror::Error;

/// Errors raised by the binding registry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("No implementation bound for contract '{contract}'{}", slot(.name))]
    Unbound {
        contract: &'static str,
        name: Option<String>,
    },

    #[error("Contract '{contract}'{} is already bound. Use rebind to replace it", slot(.name))]
    AlreadyBound {
        contract: &'static str,
        name: Option<String>,
    },
}

fn slot(name: &Option<String>) -> String {
    match name {
        Some(name) => format!(" (binding '{name}')"),
        None => String::new(),
    }
}
