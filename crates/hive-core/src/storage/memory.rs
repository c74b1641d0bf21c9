//! RAM-backed calibration store with byte snapshots

use heapless::{String, Vec};
use log::{debug, error, warn};
use serde::{Deserialize, Serialize};

use super::{CalibrationStore, MAX_KEY_LEN, StoreError};

/// Default number of keys a [`MemoryStore`] can hold.
pub const DEFAULT_CAPACITY: usize = 16;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub enum StoredValue {
    Int(i32),
    Float(f32),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
struct Entry {
    key: String<MAX_KEY_LEN>,
    value: StoredValue,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
struct Snapshot<const N: usize> {
    namespace: String<MAX_KEY_LEN>,
    entries: Vec<Entry, N>,
}

/// In-memory [`CalibrationStore`].
///
/// Writes replace the value in place, so a key keeps its slot for the life
/// of the store. `writes()` counts successful puts, which lets callers
/// check that a refused operation left the store untouched.
#[derive(Debug, Clone)]
pub struct MemoryStore<const N: usize = DEFAULT_CAPACITY> {
    namespace: String<MAX_KEY_LEN>,
    entries: Vec<Entry, N>,
    writes: u32,
}

impl<const N: usize> MemoryStore<N> {
    /// Open an empty store under `namespace` (truncated to the key limit).
    pub fn open(namespace: &str) -> Self {
        let mut ns = String::new();
        for c in namespace.chars() {
            if ns.push(c).is_err() {
                break;
            }
        }

        Self {
            namespace: ns,
            entries: Vec::new(),
            writes: 0,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Number of keys currently held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    /// Successful writes since the store was opened or restored.
    pub fn writes(&self) -> u32 {
        self.writes
    }

    /// Serialize every key into `buf`, returning the used prefix.
    pub fn snapshot<'b>(&self, buf: &'b mut [u8]) -> Result<&'b mut [u8], StoreError> {
        let snapshot = Snapshot {
            namespace: self.namespace.clone(),
            entries: self.entries.clone(),
        };

        postcard::to_slice(&snapshot, buf).map_err(|e| {
            error!("Failed to encode store snapshot: {:?}", e);
            StoreError::Encode
        })
    }

    /// Rebuild a store from a [`snapshot`](Self::snapshot).
    pub fn restore(bytes: &[u8]) -> Result<Self, StoreError> {
        let snapshot: Snapshot<N> = postcard::from_bytes(bytes).map_err(|e| {
            error!("Failed to decode store snapshot: {:?}", e);
            StoreError::Decode
        })?;

        debug!(
            "Restored store '{}' with {} keys",
            snapshot.namespace,
            snapshot.entries.len()
        );

        Ok(Self {
            namespace: snapshot.namespace,
            entries: snapshot.entries,
            writes: 0,
        })
    }

    fn lookup(&self, key: &str) -> Option<StoredValue> {
        self.entries
            .iter()
            .find(|e| e.key.as_str() == key)
            .map(|e| e.value)
    }

    fn put(&mut self, key: &str, value: StoredValue) -> Result<(), StoreError> {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.key.as_str() == key) {
            entry.value = value;
            self.writes += 1;
            return Ok(());
        }

        let mut owned = String::new();
        owned.push_str(key).map_err(|_| {
            warn!("Refusing store key '{}': longer than {} bytes", key, MAX_KEY_LEN);
            StoreError::KeyTooLong
        })?;

        self.entries
            .push(Entry { key: owned, value })
            .map_err(|_| {
                error!("Store '{}' is full, dropping key '{}'", self.namespace, key);
                StoreError::Full
            })?;
        self.writes += 1;
        Ok(())
    }
}

impl<const N: usize> CalibrationStore for MemoryStore<N> {
    fn get_int(&self, key: &str, default: i32) -> i32 {
        match self.lookup(key) {
            Some(StoredValue::Int(v)) => v,
            Some(StoredValue::Float(_)) => {
                warn!("Store key '{}' holds a float, returning default", key);
                default
            }
            None => default,
        }
    }

    fn put_int(&mut self, key: &str, value: i32) -> Result<(), StoreError> {
        self.put(key, StoredValue::Int(value))
    }

    fn get_float(&self, key: &str, default: f32) -> f32 {
        match self.lookup(key) {
            Some(StoredValue::Float(v)) => v,
            Some(StoredValue::Int(_)) => {
                warn!("Store key '{}' holds an int, returning default", key);
                default
            }
            None => default,
        }
    }

    fn put_float(&mut self, key: &str, value: f32) -> Result<(), StoreError> {
        self.put(key, StoredValue::Float(value))
    }
}
