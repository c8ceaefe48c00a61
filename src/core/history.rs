//! Transition log tracking.
//!
//! Provides immutable tracking of the transitions applied to one entity.
//! Records hold codes rather than variants so a log can be exported and
//! compared without the catalog at hand.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single applied transition.
///
/// # Example
///
/// ```rust
/// use switchyard::core::TransitionRecord;
/// use chrono::Utc;
///
/// let record = TransitionRecord {
///     from: "PLACED".to_string(),
///     to: "SHIPPED".to_string(),
///     timestamp: Utc::now(),
/// };
/// assert_eq!(record.to, "SHIPPED");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// Code of the variant being left
    pub from: String,
    /// Code of the variant entered
    pub to: String,
    /// When the transition was applied
    pub timestamp: DateTime<Utc>,
}

/// Ordered log of applied transitions.
///
/// `record` returns a new log with the transition appended and leaves the
/// receiver untouched. The policy appends in place while it holds the
/// entity lock.
///
/// # Example
///
/// ```rust
/// use switchyard::core::{TransitionLog, TransitionRecord};
/// use chrono::Utc;
///
/// let log = TransitionLog::new();
/// let log = log.record(TransitionRecord {
///     from: "PLACED".to_string(),
///     to: "SHIPPED".to_string(),
///     timestamp: Utc::now(),
/// });
/// let log = log.record(TransitionRecord {
///     from: "SHIPPED".to_string(),
///     to: "DELIVERED".to_string(),
///     timestamp: Utc::now(),
/// });
///
/// assert_eq!(log.get_path(), vec!["PLACED", "SHIPPED", "DELIVERED"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionLog {
    transitions: Vec<TransitionRecord>,
}

impl TransitionLog {
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Record a transition, returning a new log.
    pub fn record(&self, transition: TransitionRecord) -> Self {
        let mut transitions = self.transitions.clone();
        transitions.push(transition);
        Self { transitions }
    }

    pub(crate) fn push(&mut self, transition: TransitionRecord) {
        self.transitions.push(transition);
    }

    /// Codes visited in order: the first source, then every target.
    pub fn get_path(&self) -> Vec<&str> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.first() {
            path.push(first.from.as_str());
        }
        for transition in &self.transitions {
            path.push(transition.to.as_str());
        }
        path
    }

    /// Time between the first and last recorded transition.
    ///
    /// Returns `None` for an empty log.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.first(), self.transitions.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    pub fn last(&self) -> Option<&TransitionRecord> {
        self.transitions.last()
    }

    pub fn transitions(&self) -> &[TransitionRecord] {
        &self.transitions
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(from: &str, to: &str, timestamp: DateTime<Utc>) -> TransitionRecord {
        TransitionRecord {
            from: from.to_string(),
            to: to.to_string(),
            timestamp,
        }
    }

    #[test]
    fn new_log_is_empty() {
        let log = TransitionLog::new();
        assert!(log.is_empty());
        assert!(log.get_path().is_empty());
        assert!(log.duration().is_none());
        assert!(log.last().is_none());
    }

    #[test]
    fn record_is_immutable() {
        let log = TransitionLog::new();
        let next = log.record(record("PLACED", "SHIPPED", Utc::now()));

        assert_eq!(log.len(), 0);
        assert_eq!(next.len(), 1);
        assert_eq!(next.last().unwrap().to, "SHIPPED");
    }

    #[test]
    fn push_appends_in_place() {
        let mut log = TransitionLog::new().record(record("PLACED", "SHIPPED", Utc::now()));
        log.push(record("SHIPPED", "DELIVERED", Utc::now()));

        assert_eq!(log.len(), 2);
        assert_eq!(log.get_path(), vec!["PLACED", "SHIPPED", "DELIVERED"]);
    }

    #[test]
    fn get_path_returns_code_sequence() {
        let log = TransitionLog::new()
            .record(record("PLACED", "SHIPPED", Utc::now()))
            .record(record("SHIPPED", "DELIVERED", Utc::now()));

        assert_eq!(log.get_path(), vec!["PLACED", "SHIPPED", "DELIVERED"]);
    }

    #[test]
    fn duration_spans_first_to_last() {
        let start = Utc::now();
        let log = TransitionLog::new()
            .record(record("PLACED", "SHIPPED", start))
            .record(record(
                "SHIPPED",
                "DELIVERED",
                start + chrono::Duration::milliseconds(250),
            ));

        assert_eq!(log.duration(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn single_transition_has_duration_zero() {
        let log = TransitionLog::new().record(record("PLACED", "SHIPPED", Utc::now()));

        assert_eq!(log.duration(), Some(Duration::from_secs(0)));
    }

    #[test]
    fn log_serializes_correctly() {
        let log = TransitionLog::new().record(record("PLACED", "SHIPPED", Utc::now()));

        let json = serde_json::to_string(&log).unwrap();
        let deserialized: TransitionLog = serde_json::from_str(&json).unwrap();

        assert_eq!(log, deserialized);
    }
}
