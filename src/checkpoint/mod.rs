//! Export and restore of tracked entities.
//!
//! A [`Snapshot`] captures one [`CurrentState`] as plain data so callers can
//! store it wherever they like and rebuild the entity later. Restoring
//! checks the snapshot against the policy before handing anything back.

use crate::core::{TransitionLog, Variant};
use crate::policy::{CurrentState, TransitionPolicy};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod error;

pub use error::CheckpointError;

/// Version identifier for snapshot format
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serializable capture of one tracked entity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Snapshot format version
    pub version: u32,

    /// Tracked entity id
    pub entity: Uuid,

    /// Catalog the entity belongs to
    pub catalog: String,

    /// Code of the current variant
    pub current: String,

    /// Every transition applied so far
    pub log: TransitionLog,

    /// When the snapshot was taken
    pub taken_at: DateTime<Utc>,
}

impl Snapshot {
    /// Capture variant and log under a single lock acquisition.
    pub fn capture<V: Variant>(state: &CurrentState<V>) -> Self {
        let (current, log) = state.read(|current, log| (current.code().to_string(), log.clone()));
        Self {
            version: SNAPSHOT_VERSION,
            entity: state.id(),
            catalog: state.catalog().to_string(),
            current,
            log,
            taken_at: Utc::now(),
        }
    }

    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string(self).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_json(text: &str) -> Result<Self, CheckpointError> {
        serde_json::from_str(text).map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CheckpointError> {
        bincode::deserialize(bytes)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))
    }

    /// Rebuild the entity under `policy`.
    ///
    /// The snapshot must name the policy's catalog, and every code in it
    /// must exist there. The log has to be a path the policy could have
    /// produced: each step a declared rule, each step starting where the
    /// previous one ended, and the last step ending at the current code.
    pub fn restore<V: Variant>(
        &self,
        policy: &TransitionPolicy<V>,
    ) -> Result<CurrentState<V>, CheckpointError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: SNAPSHOT_VERSION,
            });
        }

        let catalog = policy.catalog();
        if self.catalog != catalog.name() {
            return Err(CheckpointError::CatalogMismatch {
                expected: catalog.name().to_string(),
                found: self.catalog.clone(),
            });
        }

        let current = catalog
            .variant(&self.current)
            .map_err(|_| unknown_code(catalog.name(), &self.current))?
            .clone();

        let mut previous: Option<&str> = None;
        for (index, record) in self.log.transitions().iter().enumerate() {
            for code in [&record.from, &record.to] {
                if catalog.variant(code).is_err() {
                    return Err(unknown_code(catalog.name(), code));
                }
            }
            if let Some(expected) = previous {
                if expected != record.from {
                    return Err(CheckpointError::BrokenChain {
                        index,
                        expected: expected.to_string(),
                        found: record.from.clone(),
                    });
                }
            }
            if !policy.is_legal_code(&record.from, &record.to) {
                return Err(CheckpointError::IllegalStep {
                    index,
                    from: record.from.clone(),
                    to: record.to.clone(),
                });
            }
            previous = Some(record.to.as_str());
        }

        if let Some(logged) = previous {
            if logged != self.current {
                return Err(CheckpointError::CurrentMismatch {
                    logged: logged.to_string(),
                    current: self.current.clone(),
                });
            }
        }

        Ok(policy.restore(self.entity, current, self.log.clone()))
    }
}

fn unknown_code(catalog: &str, code: &str) -> CheckpointError {
    CheckpointError::UnknownCode {
        catalog: catalog.to_string(),
        code: code.to_string(),
    }
}
