//! Core variant types.
//!
//! This module contains the pure data layer:
//! - Variant definitions via the `Variant` trait
//! - Closed catalogs of variants with code lookup
//! - Immutable transition logs
//!
//! Nothing in this module mutates after construction.

mod catalog;
mod history;
mod variant;

pub use catalog::{Catalog, CatalogError};
pub use history::{TransitionLog, TransitionRecord};
pub use variant::{Variant, VariantRecord};
