//! Store trait definitions

use crate::StoreResult;

/// Flat string key-value store.
///
/// One logical key per course; values are opaque strings owned by the
/// caller's serialization.
pub trait Store: Send + Sync {
    /// Read a value, `None` if the key was never written or was removed
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Insert or overwrite a value
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Remove a key; removing an absent key is not an error
    fn remove(&self, key: &str) -> StoreResult<()>;

    /// Check if store is healthy
    fn is_healthy(&self) -> bool;
}
