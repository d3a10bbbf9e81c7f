//! Local Store
//!
//! Browser-storage style key/value state, optionally persisted to a JSON file.
//! Holds the auth session and timestamped caches.

mod cache;
mod session;
mod store;

pub use cache::{CacheEntry, CACHE_PREFIX, DEFAULT_MAX_AGE};
pub use session::{TOKEN_KEY, USER_KEY};
pub use store::LocalStore;

use thiserror::Error;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Lock error: {0}")]
    Lock(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
