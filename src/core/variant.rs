//! The `Variant` trait and its configuration-backed implementation.
//!
//! A variant is one member of a closed enumeration. Its identity is its
//! code: two variants are the same variant exactly when their codes match,
//! whatever their labels or metadata say.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::Debug;
use std::hash::{Hash, Hasher};

/// Trait for members of a variant catalog.
///
/// All methods are pure. Implementors are immutable values describing one
/// position a tracked entity can occupy.
///
/// # Example
///
/// ```rust
/// use switchyard::core::Variant;
///
/// #[derive(Clone, Debug)]
/// enum TaskStatus {
///     Todo,
///     Done,
/// }
///
/// impl Variant for TaskStatus {
///     fn code(&self) -> &str {
///         match self {
///             Self::Todo => "TODO",
///             Self::Done => "DONE",
///         }
///     }
///
///     fn label(&self) -> &str {
///         match self {
///             Self::Todo => "Not started",
///             Self::Done => "Finished",
///         }
///     }
///
///     fn is_final(&self) -> bool {
///         matches!(self, Self::Done)
///     }
/// }
///
/// assert!(TaskStatus::Todo.same_as(&TaskStatus::Todo));
/// assert!(!TaskStatus::Todo.same_as(&TaskStatus::Done));
/// ```
pub trait Variant: Clone + Debug + Send + Sync + 'static {
    /// Unique tag of the variant within its catalog.
    fn code(&self) -> &str;

    /// Human-readable description.
    fn label(&self) -> &str;

    /// Catalog metadata marking a terminal variant.
    ///
    /// Transition checks never consult this flag; it is only used by
    /// configuration validation and by callers.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }

    /// Identity comparison: code equality and nothing else.
    fn same_as(&self, other: &Self) -> bool {
        self.code() == other.code()
    }
}

/// A variant defined by static configuration data rather than a Rust enum.
///
/// Equality and hashing use the code only, so two records with identical
/// labels and metadata but different codes are always distinct.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VariantRecord {
    code: String,
    label: String,
    #[serde(default)]
    terminal: bool,
    #[serde(default)]
    metadata: Map<String, Value>,
}

impl VariantRecord {
    pub fn new(code: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            label: label.into(),
            terminal: false,
            metadata: Map::new(),
        }
    }

    /// Mark the record as terminal.
    pub fn terminal(mut self) -> Self {
        self.terminal = true;
        self
    }

    /// Attach one metadata entry.
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }

    pub fn meta(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }
}

impl Variant for VariantRecord {
    fn code(&self) -> &str {
        &self.code
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn is_final(&self) -> bool {
        self.terminal
    }
}

impl PartialEq for VariantRecord {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl Eq for VariantRecord {}

impl Hash for VariantRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}
