use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{Record, Store, StoreError};

/// [`Store`] backed by a mutex-guarded ordered map
#[derive(Debug)]
pub struct MemoryStore<T> {
    records: Mutex<BTreeMap<String, T>>,
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self {
            records: Mutex::new(BTreeMap::new()),
        }
    }
}

impl<T: Record> MemoryStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: impl IntoIterator<Item = T>) -> Self {
        let store = Self::new();
        for record in records {
            store.upsert(record);
        }
        store
    }

    // A panic mid-update cannot leave a map entry half written, so a
    // poisoned lock is still safe to read.
    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, T>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Record> Store<T> for MemoryStore<T> {
    fn get(&self, key: &str) -> Option<T> {
        self.lock().get(key).cloned()
    }

    fn list(&self) -> Vec<T> {
        self.lock().values().cloned().collect()
    }

    fn upsert(&self, record: T) -> Option<T> {
        let key = record.key();
        log::trace!("upsert {} {}", T::KIND, key);
        self.lock().insert(key, record)
    }

    fn delete(&self, key: &str) -> Result<T, StoreError> {
        self.lock().remove(key).ok_or_else(|| StoreError::NotFound {
            kind: T::KIND,
            key: key.to_string(),
        })
    }
}
