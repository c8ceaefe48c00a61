//! Switchyard: validated state variants and swappable capability bindings
//!
//! Two ideas, kept separate and composed by a small facade:
//!
//! - **Variants and transitions**: a closed catalog of code-identified
//!   variants, plus a policy declaring which moves between them are legal.
//!   Every change to a tracked entity is an atomic check-then-set.
//! - **Capabilities and bindings**: contracts expressed as Rust traits, and
//!   a registry holding exactly one active implementation per contract slot,
//!   swappable at runtime.
//!
//! # Core Concepts
//!
//! - **Variant**: identity by code via the `Variant` trait
//! - **Catalog**: the ordered set of variants, built once
//! - **TransitionPolicy**: declared edges; nothing else makes a move legal
//! - **BindingRegistry**: contract slot to implementation, rebind-safe
//! - **Facade**: resolve, validate, invoke, commit
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use switchyard::builder::PolicyBuilder;
//! use switchyard::facade::Facade;
//! use switchyard::registry::BindingRegistry;
//! use switchyard::{declare_contract, variant_enum};
//!
//! variant_enum! {
//!     pub enum OrderStatus {
//!         Placed = "PLACED" => "Order placed",
//!         Paid = "PAID" => "Payment captured",
//!         Cancelled = "CANCELLED" => "Cancelled",
//!     }
//!     final: [Paid, Cancelled]
//! }
//!
//! pub trait PaymentGateway: Send + Sync {
//!     fn charge(&self, cents: u64) -> Result<String, String>;
//! }
//!
//! struct Stripe;
//! impl PaymentGateway for Stripe {
//!     fn charge(&self, cents: u64) -> Result<String, String> {
//!         Ok(format!("stripe:{cents}"))
//!     }
//! }
//!
//! declare_contract!(pub Payment => dyn PaymentGateway, "payment");
//!
//! let policy = PolicyBuilder::new(OrderStatus::catalog().unwrap())
//!     .initial("PLACED")
//!     .rule("PLACED", "PAID")
//!     .rule("PLACED", "CANCELLED")
//!     .strict()
//!     .build()
//!     .unwrap();
//!
//! let registry = Arc::new(BindingRegistry::new());
//! registry.bind::<Payment>(Arc::new(Stripe)).unwrap();
//!
//! let facade = Facade::new(Arc::new(policy), registry);
//! let order = facade.track("PLACED").unwrap();
//!
//! let (_, receipt) = facade
//!     .perform::<Payment, _, _>(&order, "PAID", |gateway, _| gateway.charge(1999))
//!     .unwrap();
//!
//! assert_eq!(receipt, "stripe:1999");
//! assert_eq!(order.current(), OrderStatus::Paid);
//! ```

pub mod builder;
pub mod checkpoint;
pub mod core;
pub mod facade;
pub mod policy;
pub mod registry;

// Re-export commonly used types
pub use crate::core::{Catalog, CatalogError, TransitionLog, TransitionRecord, Variant, VariantRecord};
pub use builder::{BuildError, PolicyBuilder};
pub use facade::{Facade, FacadeError};
pub use policy::{CurrentState, TransitionError, TransitionPolicy, TransitionRule};
pub use registry::{BindingRegistry, Contract, RegistryError};
