//! Key-value storage for visit data.
//!
//! The store is the only durable state. It offers single-key reads and
//! writes plus prefix listing, and nothing that spans several keys:
//! callers issue independent, non-transactional operations.
//!
//! ## Example
//!
//! ```
//! use visit_counter::{InMemoryStore, KeyValueStore};
//!
//! let store = InMemoryStore::new();
//! store.put("total", "7".to_string()).unwrap();
//! assert_eq!(store.get("total").unwrap().as_deref(), Some("7"));
//! ```

mod file;
mod in_memory;

use std::fmt;
use std::sync::Arc;

pub use file::JsonFileStore;
pub use in_memory::InMemoryStore;

/// Error type for key-value store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store could not be reached or refused the operation.
    Unavailable(String),
    /// Reading or writing the backing medium failed.
    Io(String),
    /// The backing medium holds data the store cannot interpret.
    Corrupt(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Unavailable(msg) => write!(f, "store unavailable: {}", msg),
            StoreError::Io(msg) => write!(f, "store i/o error: {}", msg),
            StoreError::Corrupt(msg) => write!(f, "store data corrupt: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err.to_string())
    }
}

/// String-keyed, string-valued store.
///
/// A `put` to one key is atomic with respect to other `put`s of the same
/// key. Nothing stronger is promised, and readers may observe any mix of
/// old and new values across different keys.
pub trait KeyValueStore: Send + Sync {
    /// Get the value stored under `key`, or `None` if absent.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn put(&self, key: &str, value: String) -> Result<(), StoreError>;

    /// List the names of all keys starting with `prefix`, in no particular order.
    fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: String) -> Result<(), StoreError> {
        (**self).put(key, value)
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        (**self).list(prefix)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: String) -> Result<(), StoreError> {
        (**self).put(key, value)
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        (**self).list(prefix)
    }
}
