//! Capability contracts and the registry that binds them.
//!
//! - [`Contract`]: marker naming a role and the trait object serving it
//! - [`BindingRegistry`]: one active implementation per contract slot,
//!   swappable at runtime without disturbing handles already resolved

mod binding;
mod contract;
mod error;

pub use binding::{BindingInfo, BindingRegistry};
pub use contract::Contract;
pub use error::RegistryError;
