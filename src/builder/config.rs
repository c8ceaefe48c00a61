//! Catalog and rule definitions supplied as static configuration data.
//!
//! Reading the data from wherever it lives is the caller's job; this module
//! only turns already-loaded text or values into a validated policy.

use crate::builder::error::BuildError;
use crate::builder::policy::PolicyBuilder;
use crate::core::{Catalog, VariantRecord};
use crate::policy::{TransitionPolicy, TransitionRule};
use serde::{Deserialize, Serialize};

/// Serializable description of one catalog and its rule set.
///
/// # Example
///
/// ```rust
/// use switchyard::builder::CatalogConfig;
///
/// let config = CatalogConfig::from_json(r#"{
///     "name": "order",
///     "initial": "PLACED",
///     "variants": [
///         { "code": "PLACED", "label": "Placed" },
///         { "code": "SHIPPED", "label": "Shipped" },
///         { "code": "DELIVERED", "label": "Delivered", "terminal": true },
///         { "code": "CANCELLED", "label": "Cancelled", "terminal": true }
///     ],
///     "rules": [
///         { "from": "PLACED", "to": "SHIPPED" },
///         { "from": "SHIPPED", "to": "DELIVERED" },
///         { "from": "PLACED", "to": "CANCELLED" }
///     ],
///     "strict": true
/// }"#).unwrap();
///
/// let policy = config.into_policy().unwrap();
/// assert!(policy.is_legal_code("PLACED", "SHIPPED"));
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub name: String,
    #[serde(default)]
    pub initial: Option<String>,
    pub variants: Vec<VariantRecord>,
    #[serde(default)]
    pub rules: Vec<TransitionRule>,
    /// Targets that may be entered from every other variant.
    #[serde(default)]
    pub from_any: Vec<String>,
    #[serde(default)]
    pub strict: bool,
}

impl CatalogConfig {
    pub fn from_json(text: &str) -> Result<Self, BuildError> {
        serde_json::from_str(text).map_err(|e| BuildError::Config(e.to_string()))
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, BuildError> {
        serde_json::from_value(value).map_err(|e| BuildError::Config(e.to_string()))
    }

    /// Build the catalog and load every declared rule into a builder.
    pub fn into_builder(self) -> Result<PolicyBuilder<VariantRecord>, BuildError> {
        let catalog = Catalog::new(self.name, self.variants)?;

        let mut builder = PolicyBuilder::new(catalog).rules(self.rules);
        if let Some(initial) = self.initial {
            builder = builder.initial(initial);
        }
        for to in self.from_any {
            builder = builder.from_any(to);
        }
        if self.strict {
            builder = builder.strict();
        }
        Ok(builder)
    }

    pub fn into_policy(self) -> Result<TransitionPolicy<VariantRecord>, BuildError> {
        self.into_builder()?.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ConfigViolation;
    use crate::core::{CatalogError, Variant};
    use serde_json::json;

    fn ticket_config() -> serde_json::Value {
        json!({
            "name": "ticket",
            "initial": "OPEN",
            "variants": [
                { "code": "OPEN", "label": "Open", "metadata": { "sla_hours": 24 } },
                { "code": "RESOLVED", "label": "Resolved" },
                { "code": "CLOSED", "label": "Closed", "terminal": true }
            ],
            "rules": [
                { "from": "OPEN", "to": "RESOLVED" },
                { "from": "RESOLVED", "to": "OPEN" }
            ],
            "from_any": ["CLOSED"]
        })
    }

    #[test]
    fn loads_policy_from_value() {
        let policy = CatalogConfig::from_value(ticket_config())
            .unwrap()
            .into_policy()
            .unwrap();

        assert_eq!(policy.catalog().name(), "ticket");
        assert_eq!(policy.initial().unwrap().code(), "OPEN");
        assert!(policy.is_legal_code("OPEN", "CLOSED"));
        assert!(policy.is_legal_code("RESOLVED", "CLOSED"));
        assert!(!policy.is_legal_code("CLOSED", "OPEN"));
        assert_eq!(
            policy.catalog().variant("OPEN").unwrap().meta("sla_hours"),
            Some(&json!(24))
        );
    }

    #[test]
    fn strict_flag_is_applied() {
        let mut value = ticket_config();
        value["strict"] = json!(true);
        value["rules"] = json!([{ "from": "OPEN", "to": "RESOLVED" }]);
        value["from_any"] = json!([]);

        let result = CatalogConfig::from_value(value).unwrap().into_policy();

        match result {
            Err(BuildError::Invalid(found)) => {
                assert!(found.contains(&ConfigViolation::DeadEnd {
                    code: "RESOLVED".to_string(),
                }));
                assert!(found.contains(&ConfigViolation::Unreachable {
                    code: "CLOSED".to_string(),
                }));
            }
            other => panic!("Expected invalid configuration, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_variant_codes_are_rejected() {
        let mut value = ticket_config();
        value["variants"] = json!([
            { "code": "OPEN", "label": "Open" },
            { "code": "OPEN", "label": "Also open" }
        ]);

        let result = CatalogConfig::from_value(value).unwrap().into_policy();

        assert!(matches!(
            result,
            Err(BuildError::Catalog(CatalogError::DuplicateCode { .. }))
        ));
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let result = CatalogConfig::from_json("{ not json");
        assert!(matches!(result, Err(BuildError::Config(_))));
    }
}
