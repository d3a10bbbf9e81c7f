//! Timestamped caches

use std::time::Duration;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::store::LocalStore;
use crate::StoreError;

/// Prefix for every cache key
pub const CACHE_PREFIX: &str = "dermalyze_cache_";

/// Default maximum cache age
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(5 * 60);

/// Stored cache value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub data: T,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

impl<T> CacheEntry<T> {
    pub fn age_ms(&self, now_ms: i64) -> i64 {
        now_ms - self.timestamp
    }

    pub fn is_expired(&self, max_age: Duration, now_ms: i64) -> bool {
        self.age_ms(now_ms) > max_age.as_millis() as i64
    }
}

fn cache_key(key: &str) -> String {
    format!("{}{}", CACHE_PREFIX, key)
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

impl LocalStore {
    /// Cache `data` under `key`, stamped now
    pub fn set_cache<T: Serialize>(&self, key: &str, data: &T) -> Result<(), StoreError> {
        self.set_cache_at(key, data, now_ms())
    }

    /// Cache `data` with an explicit timestamp
    pub fn set_cache_at<T: Serialize>(
        &self,
        key: &str,
        data: &T,
        timestamp: i64,
    ) -> Result<(), StoreError> {
        self.set_json(&cache_key(key), &CacheEntry { data, timestamp })
    }

    /// Cached data no older than `max_age`
    pub fn get_cache<T: DeserializeOwned>(&self, key: &str, max_age: Duration) -> Option<T> {
        self.get_cache_at(key, max_age, now_ms())
    }

    /// Cached data no older than `max_age` at `now_ms`.
    ///
    /// Expired and unreadable entries are removed and read as a miss.
    pub fn get_cache_at<T: DeserializeOwned>(
        &self,
        key: &str,
        max_age: Duration,
        now_ms: i64,
    ) -> Option<T> {
        let full_key = cache_key(key);
        let entry = match self.get_json::<CacheEntry<T>>(&full_key) {
            Ok(Some(entry)) => entry,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to get cached data for {}: {}", key, e);
                if let Err(e) = self.remove_item(&full_key) {
                    warn!("Failed to drop unreadable cache {}: {}", key, e);
                }
                return None;
            }
        };

        if entry.is_expired(max_age, now_ms) {
            debug!("Cache {} expired ({} ms old)", key, entry.age_ms(now_ms));
            if let Err(e) = self.remove_item(&full_key) {
                warn!("Failed to drop expired cache {}: {}", key, e);
            }
            return None;
        }

        Some(entry.data)
    }

    /// Remove one cache entry, or every cache entry when `key` is `None`
    pub fn clear_cache(&self, key: Option<&str>) -> Result<(), StoreError> {
        match key {
            Some(key) => self.remove_item(&cache_key(key)),
            None => {
                let removed = self.remove_prefixed(CACHE_PREFIX)?;
                debug!("Cleared {} cache entries", removed);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const MINUTE_MS: i64 = 60_000;

    #[test]
    fn test_fresh_entry_is_returned() {
        let store = LocalStore::in_memory();
        store.set_cache_at("products", &vec!["a", "b"], 1_000).unwrap();

        let hit: Option<Vec<String>> = store.get_cache_at("products", DEFAULT_MAX_AGE, 1_000 + MINUTE_MS);
        assert_eq!(hit, Some(vec!["a".to_string(), "b".to_string()]));
        assert!(store.get_item("dermalyze_cache_products").unwrap().is_some());
    }

    #[test]
    fn test_expired_entry_is_removed() {
        let store = LocalStore::in_memory();
        store.set_cache_at("history", &42, 0).unwrap();

        let miss: Option<i32> = store.get_cache_at("history", DEFAULT_MAX_AGE, 6 * MINUTE_MS);
        assert!(miss.is_none());
        assert!(store.get_item("dermalyze_cache_history").unwrap().is_none());

        let later: Option<i32> = store.get_cache_at("history", Duration::from_secs(86_400), 6 * MINUTE_MS);
        assert!(later.is_none());
    }

    #[test]
    fn test_unreadable_entry_is_a_miss() {
        let store = LocalStore::in_memory();
        store.set_item("dermalyze_cache_x", "nope").unwrap();

        assert!(store.get_cache::<i32>("x", DEFAULT_MAX_AGE).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_unreadable_entry_is_a_miss_when_flush_fails() {
        let dir = std::env::temp_dir().join(format!("local-store-cache-{}", std::process::id()));
        let path = dir.join("store.json");
        let store = LocalStore::open(&path).unwrap();
        store.set_item("dermalyze_cache_x", "nope").unwrap();

        std::fs::remove_dir_all(&dir).unwrap();
        std::fs::write(&dir, b"blocks the directory").unwrap();

        assert!(store.get_cache::<i32>("x", DEFAULT_MAX_AGE).is_none());
        assert!(store.keys(CACHE_PREFIX).unwrap().is_empty());

        std::fs::remove_file(&dir).unwrap();
    }

    #[test]
    fn test_clear_all_caches_keeps_session() {
        let store = LocalStore::in_memory();
        store.set_item("dermalyze_token", "t").unwrap();
        store.set_cache("a", &1).unwrap();
        store.set_cache("b", &2).unwrap();

        store.clear_cache(Some("a")).unwrap();
        assert!(store.get_cache::<i32>("a", DEFAULT_MAX_AGE).is_none());
        assert_eq!(store.get_cache::<i32>("b", DEFAULT_MAX_AGE), Some(2));

        store.clear_cache(None).unwrap();
        assert_eq!(store.keys("").unwrap(), vec!["dermalyze_token".to_string()]);
    }

    proptest! {
        #[test]
        fn prop_entries_past_max_age_are_dropped(age_ms in 0i64..1_000_000, max_s in 1u64..600) {
            let store = LocalStore::in_memory();
            store.set_cache_at("k", &"v", 0).unwrap();

            let max_age = Duration::from_secs(max_s);
            let hit: Option<String> = store.get_cache_at("k", max_age, age_ms);
            prop_assert_eq!(hit.is_some(), age_ms <= max_age.as_millis() as i64);
        }
    }
}
