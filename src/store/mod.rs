//! Concurrency-safe keyed ratio tables.
//!
//! A [`RatioStore`] keeps two layers: the compiled-in defaults, which are never
//! mutated, and the active override map that readers consult. Updates replace
//! the active map wholesale. A payload is parsed and validated into a staging
//! map first, and only a fully valid map is swapped in under the write lock, so
//! a rejected update leaves the previous table visible to every reader.

mod value;

pub use value::RatioValue;

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::resolver::RatioTable;
use crate::{Error, Result};

#[derive(Debug)]
pub struct RatioStore<V> {
    table: RatioTable,
    defaults: HashMap<String, V>,
    /// Whether the active map starts from (and resets to) the defaults.
    seeded: bool,
    active: RwLock<HashMap<String, V>>,
    generation: AtomicU64,
}

impl<V: RatioValue> RatioStore<V> {
    /// Create a store whose active map starts as a copy of `defaults`.
    pub fn new(table: RatioTable, defaults: HashMap<String, V>) -> Self {
        let active = defaults.clone();
        Self {
            table,
            defaults,
            seeded: true,
            active: RwLock::new(active),
            generation: AtomicU64::new(0),
        }
    }

    /// Create a store with an empty active map. `defaults` are only exported.
    pub fn unseeded(table: RatioTable, defaults: HashMap<String, V>) -> Self {
        Self {
            table,
            defaults,
            seeded: false,
            active: RwLock::new(HashMap::new()),
            generation: AtomicU64::new(0),
        }
    }

    /// Create a store with no defaults and no overrides.
    pub fn empty(table: RatioTable) -> Self {
        Self::new(table, HashMap::new())
    }

    pub fn table(&self) -> RatioTable {
        self.table
    }

    pub fn get(&self, key: &str) -> Option<V> {
        let active = self.active.read().unwrap_or_else(|e| e.into_inner());
        active.get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        let active = self.active.read().unwrap_or_else(|e| e.into_inner());
        active.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.active.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the active map. Mutating it does not touch the store.
    pub fn get_all(&self) -> HashMap<String, V> {
        self.active.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// The compiled-in defaults.
    pub fn defaults(&self) -> &HashMap<String, V> {
        &self.defaults
    }

    /// Incremented on every successful replacement.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Replace the active map with `entries`.
    ///
    /// Every entry is validated before the write lock is taken. On error the
    /// store is unchanged.
    pub fn replace_all(&self, mut entries: HashMap<String, V>) -> Result<()> {
        for (key, value) in entries.iter_mut() {
            value.bind_key(key);
            if let Err(message) = value.validate() {
                tracing::warn!(table = %self.table, key = %key, %message, "rejected ratio update");
                return Err(Error::InvalidEntry {
                    table: self.table,
                    key: key.clone(),
                    message,
                });
            }
        }

        let count = entries.len();
        {
            let mut active = self.active.write().unwrap_or_else(|e| e.into_inner());
            *active = entries;
        }
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;

        tracing::info!(
            table = %self.table,
            entries = count,
            generation,
            "ratio table replaced"
        );
        Ok(())
    }

    /// Parse a JSON object of `key -> value` and replace the active map with it.
    pub fn update_from_json(&self, json: &str) -> Result<()> {
        let staged: HashMap<String, V> = serde_json::from_str(json).map_err(|e| {
            tracing::warn!(table = %self.table, error = %e, "malformed ratio payload");
            Error::Payload {
                table: self.table,
                source: e,
            }
        })?;
        self.replace_all(staged)
    }

    /// Restore the active map to its initial state.
    pub fn reset(&self) {
        let initial = if self.seeded {
            self.defaults.clone()
        } else {
            HashMap::new()
        };
        {
            let mut active = self.active.write().unwrap_or_else(|e| e.into_inner());
            *active = initial;
        }
        self.generation.fetch_add(1, Ordering::AcqRel);
        tracing::info!(table = %self.table, seeded = self.seeded, "ratio table reset");
    }

    /// JSON object of the active map, keys sorted.
    pub fn to_json(&self) -> String {
        let active = self.active.read().unwrap_or_else(|e| e.into_inner());
        self.encode(&active)
    }

    /// JSON object of the compiled-in defaults, keys sorted.
    pub fn defaults_json(&self) -> String {
        self.encode(&self.defaults)
    }

    fn encode(&self, map: &HashMap<String, V>) -> String {
        let sorted: BTreeMap<&String, &V> = map.iter().collect();
        serde_json::to_string(&sorted).unwrap_or_else(|e| {
            tracing::error!(table = %self.table, error = %e, "failed to encode ratio table");
            String::from("{}")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RatioStore<f64> {
        let defaults = HashMap::from([("gpt-4".to_string(), 15.0), ("gpt-4o".to_string(), 2.5)]);
        RatioStore::new(RatioTable::ModelRatio, defaults)
    }

    #[test]
    fn test_seeded_from_defaults() {
        let store = sample();
        assert_eq!(store.get("gpt-4"), Some(15.0));
        assert_eq!(store.len(), 2);
        assert_eq!(store.generation(), 0);
    }

    #[test]
    fn test_missing_key_is_none() {
        let store = sample();
        assert_eq!(store.get("nope"), None);
        assert!(!store.contains("nope"));
    }

    #[test]
    fn test_update_replaces_whole_map() {
        let store = sample();
        store.update_from_json(r#"{"claude-3-opus": 7.5}"#).unwrap();

        assert_eq!(store.get("claude-3-opus"), Some(7.5));
        assert_eq!(store.get("gpt-4"), None);
        assert_eq!(store.len(), 1);
        assert_eq!(store.generation(), 1);
        // defaults untouched
        assert_eq!(store.defaults().get("gpt-4"), Some(&15.0));
    }

    #[test]
    fn test_malformed_payload_keeps_previous_contents() {
        let store = sample();
        let before = store.get_all();

        let err = store.update_from_json(r#"{"gpt-4": "#).unwrap_err();
        assert!(matches!(
            err,
            Error::Payload {
                table: RatioTable::ModelRatio,
                ..
            }
        ));
        assert_eq!(store.get_all(), before);
        assert_eq!(store.generation(), 0);
    }

    #[test]
    fn test_wrong_value_type_keeps_previous_contents() {
        let store = sample();
        let before = store.get_all();

        assert!(store.update_from_json(r#"{"gpt-4": "fifteen"}"#).is_err());
        assert_eq!(store.get_all(), before);
    }

    #[test]
    fn test_negative_ratio_rejected() {
        let store = sample();
        let err = store
            .update_from_json(r#"{"gpt-4": 1.0, "bad": -2.0}"#)
            .unwrap_err();

        match err {
            Error::InvalidEntry { table, key, .. } => {
                assert_eq!(table, RatioTable::ModelRatio);
                assert_eq!(key, "bad");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(store.get("gpt-4"), Some(15.0));
    }

    #[test]
    fn test_get_all_is_a_copy() {
        let store = sample();
        let mut snapshot = store.get_all();
        snapshot.insert("gpt-4".into(), 0.0);
        snapshot.clear();
        assert_eq!(store.get("gpt-4"), Some(15.0));
    }

    #[test]
    fn test_json_roundtrip() {
        let store = sample();
        let json = store.to_json();

        let other: RatioStore<f64> = RatioStore::empty(RatioTable::ModelRatio);
        other.update_from_json(&json).unwrap();
        assert_eq!(other.get_all(), store.get_all());
    }

    #[test]
    fn test_json_roundtrip_is_bit_exact() {
        // RMB-converted ERNIE ratios need every significant digit.
        let store = RatioStore::new(RatioTable::ModelRatio, crate::defaults::model_ratios());
        let before = store.get_all();
        assert!(before.contains_key("ERNIE-Lite-8K"));

        store.update_from_json(&store.to_json()).unwrap();

        let after = store.get_all();
        assert_eq!(after.len(), before.len());
        for (name, ratio) in &before {
            assert_eq!(after[name].to_bits(), ratio.to_bits(), "{name}");
        }
    }

    #[test]
    fn test_json_keys_sorted() {
        let store = sample();
        assert_eq!(store.to_json(), r#"{"gpt-4":15.0,"gpt-4o":2.5}"#);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let store = sample();
        store.update_from_json("{}").unwrap();
        assert!(store.is_empty());

        store.reset();
        assert_eq!(store.get("gpt-4o"), Some(2.5));
        assert_eq!(store.generation(), 2);
    }

    #[test]
    fn test_unseeded_store_exports_defaults_only() {
        let defaults = HashMap::from([("gpt-4-all".to_string(), 2.0)]);
        let store = RatioStore::unseeded(RatioTable::CompletionRatio, defaults);

        assert!(store.is_empty());
        assert_eq!(store.get("gpt-4-all"), None);
        assert_eq!(store.defaults_json(), r#"{"gpt-4-all":2.0}"#);

        store.update_from_json(r#"{"x": 3}"#).unwrap();
        store.reset();
        assert!(store.is_empty());
    }

    #[test]
    fn test_defaults_json_ignores_overrides() {
        let store = sample();
        store.update_from_json(r#"{"x": 1}"#).unwrap();
        assert_eq!(store.defaults_json(), r#"{"gpt-4":15.0,"gpt-4o":2.5}"#);
    }
}
