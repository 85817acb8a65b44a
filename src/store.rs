//! Keyed persistence for calculator input.
//!
//! The engine never touches storage. Calculators load and save their state
//! through a [`KeyValueStore`] supplied by the host application; values are
//! stored as JSON text and storage failures never reach the caller.

use log::warn;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;

pub trait KeyValueStore {
    fn get_raw(&self, key: &str) -> Option<String>;

    fn set_raw(&mut self, key: &str, value: String) -> anyhow::Result<()>;
}

/// Read `key`, falling back when it is missing or cannot be decoded.
pub fn get_stored_value<S, T>(store: &S, key: &str, fallback: T) -> T
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
{
    let Some(raw) = store.get_raw(key) else {
        return fallback;
    };

    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            warn!("Ignoring undecodable stored value for '{}': {}", key, e);
            fallback
        }
    }
}

/// Write `value` under `key`. Failures are logged and otherwise ignored.
pub fn set_stored_value<S, T>(store: &mut S, key: &str, value: &T)
where
    S: KeyValueStore + ?Sized,
    T: Serialize + ?Sized,
{
    let result = serde_json::to_string(value)
        .map_err(anyhow::Error::from)
        .and_then(|raw| store.set_raw(key, raw));

    if let Err(e) = result {
        warn!("Failed to store value for '{}': {}", key, e);
    }
}

/// In-memory store, for tests and hosts without durable storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_raw(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set_raw(&mut self, key: &str, value: String) -> anyhow::Result<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}
