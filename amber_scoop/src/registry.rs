/// HandleRegistry - concurrent handle-keyed store for captured API objects
///
/// Records are addressed by their API handle and shared as `Arc<V>`, so a
/// lookup never observes a half-inserted record and a reader keeps its record
/// alive even if the handle is destroyed concurrently.

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::{Arc, RwLock};
use rustc_hash::FxHashMap;
use crate::error::{Error, Result};

pub struct HandleRegistry<K, V> {
    /// Human-readable kind used in lookup errors ("VkBuffer", "VkPipeline", ...)
    kind: &'static str,
    records: RwLock<FxHashMap<K, Arc<V>>>,
}

impl<K, V> HandleRegistry<K, V>
where
    K: Copy + Eq + Hash + Debug,
{
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            records: RwLock::new(FxHashMap::default()),
        }
    }

    /// Insert (or replace) the record for `handle`
    pub fn insert(&self, handle: K, record: V) -> Result<Arc<V>> {
        let record = Arc::new(record);
        let mut records = self.records.write()
            .map_err(|_| Error::BackendError(format!("{} registry lock poisoned", self.kind)))?;
        records.insert(handle, record.clone());
        Ok(record)
    }

    /// Look up the record for `handle`
    pub fn get(&self, handle: K) -> Result<Arc<V>> {
        let records = self.records.read()
            .map_err(|_| Error::BackendError(format!("{} registry lock poisoned", self.kind)))?;
        records
            .get(&handle)
            .cloned()
            .ok_or_else(|| Error::InvalidHandle(format!("{} {:?} is not registered", self.kind, handle)))
    }

    /// Remove the record for `handle`, returning it if present
    pub fn remove(&self, handle: K) -> Result<Option<Arc<V>>> {
        let mut records = self.records.write()
            .map_err(|_| Error::BackendError(format!("{} registry lock poisoned", self.kind)))?;
        Ok(records.remove(&handle))
    }

    pub fn contains(&self, handle: K) -> bool {
        self.records
            .read()
            .map(|records| records.contains_key(&handle))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|records| records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
