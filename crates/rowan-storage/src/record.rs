//! Record representation.

use rowan_common::normalize;
use serde::{Deserialize, Serialize};

/// A record stored in the heap.
///
/// Carries the two indexed fields plus a logical-deletion flag. Once stored,
/// the only mutation a record ever sees is having that flag set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Unique identifier among live records.
    primary_key: i64,
    /// Free-text key, compared case-insensitively.
    secondary_key: String,
    /// Set when the record is logically deleted.
    #[serde(default)]
    deleted: bool,
}

impl Record {
    /// Creates a new live record.
    pub fn new(primary_key: i64, secondary_key: impl Into<String>) -> Self {
        Self {
            primary_key,
            secondary_key: secondary_key.into(),
            deleted: false,
        }
    }

    #[inline]
    pub fn primary_key(&self) -> i64 {
        self.primary_key
    }

    /// Returns the secondary key as supplied, without case folding.
    #[inline]
    pub fn secondary_key(&self) -> &str {
        &self.secondary_key
    }

    /// Returns the secondary key in the form stored in the secondary index.
    pub fn normalized_secondary_key(&self) -> String {
        normalize(&self.secondary_key)
    }

    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    #[inline]
    pub(crate) fn set_deleted(&mut self, deleted: bool) {
        self.deleted = deleted;
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.primary_key, self.secondary_key)?;
        if self.deleted {
            write!(f, " (deleted)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_new() {
        let record = Record::new(42, "Smith");
        assert_eq!(record.primary_key(), 42);
        assert_eq!(record.secondary_key(), "Smith");
        assert!(!record.is_deleted());
    }

    #[test]
    fn test_record_normalized_key() {
        let record = Record::new(1, "McDonald");
        assert_eq!(record.normalized_secondary_key(), "mcdonald");
        assert_eq!(record.secondary_key(), "McDonald");
    }

    #[test]
    fn test_record_set_deleted() {
        let mut record = Record::new(1, "Jones");
        record.set_deleted(true);
        assert!(record.is_deleted());
    }

    #[test]
    fn test_record_display() {
        let mut record = Record::new(7, "Adams");
        assert_eq!(record.to_string(), "7 Adams");
        record.set_deleted(true);
        assert_eq!(record.to_string(), "7 Adams (deleted)");
    }

    #[test]
    fn test_record_serde_defaults_deleted_flag() {
        let record: Record =
            serde_json::from_str(r#"{"primary_key": 3, "secondary_key": "Brown"}"#).unwrap();
        assert_eq!(record, Record::new(3, "Brown"));
    }

    #[test]
    fn test_record_serde_roundtrip() {
        let mut original = Record::new(-5, "Zhou");
        original.set_deleted(true);
        let serialized = serde_json::to_string(&original).unwrap();
        let deserialized: Record = serde_json::from_str(&serialized).unwrap();
        assert_eq!(original, deserialized);
    }
}
