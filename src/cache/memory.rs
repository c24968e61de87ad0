use crate::cache::store::{ChannelStore, StoreError};
use dashmap::DashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

/// In-process store used when the shared cache is disabled
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, Entry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (unexpired) keys
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries.iter().filter(|e| e.expires_at > now).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ChannelStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = match self.entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => {
                return Ok(Some(entry.value.clone()));
            }
            Some(_) => None,
            None => return Ok(None),
        };

        // Expired: drop it so len() stays honest
        self.entries.remove(key);
        Ok(value)
    }

    async fn put_pair(
        &self,
        first: (&str, &str),
        second: (&str, &str),
        ttl: Duration,
    ) -> Result<(), StoreError> {
        let expires_at = Instant::now() + ttl;
        for (key, value) in [first, second] {
            self.entries.insert(
                key.to_string(),
                Entry {
                    value: value.to_string(),
                    expires_at,
                },
            );
        }
        Ok(())
    }
}
