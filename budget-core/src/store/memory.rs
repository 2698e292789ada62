use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use super::factory::{StoreConfig, StoreFactory};
use super::repository::{KeyValueStore, StoreError, Ttl, is_expired};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<DateTime<Utc>>,
}

/// Process-local store. Contents are lost when it is dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Entry>>, StoreError> {
        self.entries
            .lock()
            .map_err(|e| StoreError::Storage(format!("memory store lock poisoned: {e}")))
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn set(
        &self,
        key: &str,
        value: &str,
        ttl: Ttl,
    ) -> Result<(), StoreError> {
        let entry = Entry {
            value: value.to_string(),
            expires_at: ttl.expires_at(Utc::now()),
        };
        self.lock()?.insert(key.to_string(), entry);
        Ok(())
    }

    async fn get(
        &self,
        key: &str,
    ) -> Result<Option<String>, StoreError> {
        let mut entries = self.lock()?;
        let value = match entries.get(key) {
            Some(entry) if !is_expired(entry.expires_at, Utc::now()) => entry.value.clone(),
            Some(_) => {
                debug!(key, "dropping expired entry");
                entries.remove(key);
                return Ok(None);
            }
            None => return Ok(None),
        };
        Ok(Some(value))
    }

    async fn remove(
        &self,
        key: &str,
    ) -> Result<(), StoreError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// Registers the in-memory backend under `memory`.
pub struct MemoryStoreFactory;

#[async_trait]
impl StoreFactory for MemoryStoreFactory {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn create(
        &self,
        _config: &StoreConfig,
    ) -> Result<Box<dyn KeyValueStore>, StoreError> {
        Ok(Box::new(MemoryStore::new()))
    }
}
