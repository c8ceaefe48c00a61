//! Closed, ordered sets of variants.

use super::variant::Variant;
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised while building or querying a catalog.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Catalog '{catalog}' declares code '{code}' more than once")]
    DuplicateCode { catalog: String, code: String },

    #[error("Catalog '{catalog}' has no variant with code '{code}'")]
    NotFound { catalog: String, code: String },
}

/// The complete, immutable set of variants of one enumeration.
///
/// Variants keep their declaration order; lookups go through a code index.
///
/// # Example
///
/// ```rust
/// use switchyard::core::{Catalog, Variant, VariantRecord};
///
/// let catalog = Catalog::new(
///     "ticket",
///     vec![
///         VariantRecord::new("OPEN", "Open"),
///         VariantRecord::new("CLOSED", "Closed").terminal(),
///     ],
/// )
/// .unwrap();
///
/// assert_eq!(catalog.variant("CLOSED").unwrap().label(), "Closed");
/// assert!(catalog.variant("LOST").is_err());
/// ```
#[derive(Clone, Debug)]
pub struct Catalog<V: Variant> {
    name: String,
    variants: Vec<V>,
    index: HashMap<String, usize>,
}

impl<V: Variant> Catalog<V> {
    /// Build a catalog, rejecting duplicate codes.
    pub fn new<I>(name: impl Into<String>, variants: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = V>,
    {
        let name = name.into();
        let variants: Vec<V> = variants.into_iter().collect();
        let mut index = HashMap::with_capacity(variants.len());

        for (pos, variant) in variants.iter().enumerate() {
            if index.insert(variant.code().to_string(), pos).is_some() {
                return Err(CatalogError::DuplicateCode {
                    catalog: name,
                    code: variant.code().to_string(),
                });
            }
        }

        Ok(Self {
            name,
            variants,
            index,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up a variant by code.
    pub fn variant(&self, code: &str) -> Result<&V, CatalogError> {
        self.index
            .get(code)
            .map(|&pos| &self.variants[pos])
            .ok_or_else(|| CatalogError::NotFound {
                catalog: self.name.clone(),
                code: code.to_string(),
            })
    }

    /// All variants in declaration order.
    pub fn all(&self) -> impl Iterator<Item = &V> + '_ {
        self.variants.iter()
    }

    /// Whether a variant with the same identity belongs to this catalog.
    pub fn contains(&self, variant: &V) -> bool {
        self.index.contains_key(variant.code())
    }

    pub(crate) fn position(&self, code: &str) -> Option<usize> {
        self.index.get(code).copied()
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::VariantRecord;

    fn order_catalog() -> Catalog<VariantRecord> {
        Catalog::new(
            "order",
            vec![
                VariantRecord::new("PLACED", "Placed"),
                VariantRecord::new("SHIPPED", "Shipped"),
                VariantRecord::new("DELIVERED", "Delivered").terminal(),
            ],
        )
        .unwrap()
    }

    #[test]
    fn lookup_by_code() {
        let catalog = order_catalog();

        assert_eq!(catalog.variant("SHIPPED").unwrap().label(), "Shipped");
        assert_eq!(catalog.len(), 3);
        assert!(!catalog.is_empty());
    }

    #[test]
    fn unknown_code_is_not_found() {
        let err = order_catalog().variant("LOST").unwrap_err();

        assert_eq!(
            err,
            CatalogError::NotFound {
                catalog: "order".to_string(),
                code: "LOST".to_string(),
            }
        );
    }

    #[test]
    fn duplicate_codes_are_rejected() {
        let result = Catalog::new(
            "order",
            vec![
                VariantRecord::new("PLACED", "Placed"),
                VariantRecord::new("PLACED", "Placed again"),
            ],
        );

        assert!(matches!(
            result,
            Err(CatalogError::DuplicateCode { ref code, .. }) if code == "PLACED"
        ));
    }

    #[test]
    fn all_is_ordered_and_restartable() {
        let catalog = order_catalog();

        let first: Vec<&str> = catalog.all().map(|v| v.code()).collect();
        let second: Vec<&str> = catalog.all().map(|v| v.code()).collect();

        assert_eq!(first, vec!["PLACED", "SHIPPED", "DELIVERED"]);
        assert_eq!(first, second);
    }

    #[test]
    fn contains_uses_identity() {
        let catalog = order_catalog();

        assert!(catalog.contains(&VariantRecord::new("PLACED", "Something else")));
        assert!(!catalog.contains(&VariantRecord::new("RETURNED", "Placed")));
    }
}
