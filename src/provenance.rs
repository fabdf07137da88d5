//! Provenance of bound values, kept for validation reporting.
//!
//! A downstream validator looks up a record by model name to phrase its
//! messages ("The value '10x' is not valid for IntProperty").

use std::fmt;

use dashmap::DashMap;

/// The raw value that produced a bound value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    /// The whole header text, for scalar-shaped fields.
    Single(String),
    /// The split tokens, for collection-shaped fields.
    Many(Vec<String>),
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Single(value) => write!(f, "{}", value),
            RawValue::Many(values) => write!(f, "{}", values.join(",")),
        }
    }
}

/// The attempted and raw value recorded for one model name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvenanceRecord {
    attempted_value: String,
    raw_value: RawValue,
}

impl ProvenanceRecord {
    /// Creates a record.
    pub fn new(attempted_value: impl Into<String>, raw_value: RawValue) -> Self {
        Self {
            attempted_value: attempted_value.into(),
            raw_value,
        }
    }

    /// Returns the human-readable attempted value.
    pub fn attempted_value(&self) -> &str {
        &self.attempted_value
    }

    /// Returns the raw value actually used.
    pub fn raw_value(&self) -> &RawValue {
        &self.raw_value
    }
}

/// Receives provenance records, keyed by model name.
///
/// Implementations must make each `record` call atomic: fields of the same
/// request may be bound concurrently.
pub trait ProvenanceSink: Send + Sync {
    /// Stores `record` under `model_name`, replacing any earlier record.
    fn record(&self, model_name: &str, record: ProvenanceRecord);
}

/// A concurrent in-memory [`ProvenanceSink`].
///
/// # Examples
///
/// ```
/// use header_binding::{ProvenanceMap, ProvenanceRecord, ProvenanceSink, RawValue};
///
/// let map = ProvenanceMap::new();
/// map.record("Header", ProvenanceRecord::new("someValue", RawValue::Single("someValue".into())));
///
/// assert_eq!(map.len(), 1);
/// assert_eq!(map.get("Header").unwrap().attempted_value(), "someValue");
/// ```
#[derive(Debug, Default)]
pub struct ProvenanceMap {
    records: DashMap<String, ProvenanceRecord>,
}

impl ProvenanceMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }

    /// Returns a copy of the record stored under `model_name`.
    pub fn get(&self, model_name: &str) -> Option<ProvenanceRecord> {
        self.records.get(model_name).map(|entry| entry.value().clone())
    }

    /// Returns `true` if a record exists for `model_name`.
    pub fn contains(&self, model_name: &str) -> bool {
        self.records.contains_key(model_name)
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if no records were written.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the recorded model names, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.records.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        keys
    }
}

impl ProvenanceSink for ProvenanceMap {
    fn record(&self, model_name: &str, record: ProvenanceRecord) {
        self.records.insert(model_name.to_string(), record);
    }
}
