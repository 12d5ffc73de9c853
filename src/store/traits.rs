//! `FlagStore` trait: the only interface the rest of the crate uses to
//! reach persisted client state.

use async_trait::async_trait;

use crate::error::StoreError;

/// Backend-agnostic key/value persistence for small JSON flags and records.
///
/// Values survive reloads for as long as the backend does. A missing key
/// reads as `Ok(None)`.
#[async_trait]
pub trait FlagStore: Send + Sync {
    /// Read a value.
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError>;

    /// Insert or overwrite a value.
    async fn set(&self, key: &str, value: &serde_json::Value) -> Result<(), StoreError>;

    /// Remove a value. Returns whether anything was deleted.
    async fn clear(&self, key: &str) -> Result<bool, StoreError>;
}
