//! Typed access to persisted flags.
//!
//! Reads never fail: a missing key, an unreadable backend, or a value of the
//! wrong shape all come back as `None` so callers fall back to their
//! first-visit behaviour. Writes surface `StoreError` and callers decide
//! whether to fail open.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::StoreError;
use crate::store::traits::FlagStore;

/// Keys used for persisted client state.
pub mod keys {
    /// Whether the intro sequence has been completed once.
    pub const INTRO_VIDEO_SEEN: &str = "intro-video-seen";
    /// `ConsentRecord` JSON.
    pub const COOKIE_CONSENT: &str = "cookie-consent";
    /// In-progress wizard answers (only written when draft persistence is on).
    pub const WIZARD_DRAFT: &str = "wizard-draft";
}

/// Typed wrapper around a shared `FlagStore`.
#[derive(Clone)]
pub struct Flags {
    store: Arc<dyn FlagStore>,
}

impl Flags {
    pub fn new(store: Arc<dyn FlagStore>) -> Self {
        Self { store }
    }

    /// Read a boolean flag.
    pub async fn get_bool(&self, key: &str) -> Option<bool> {
        match self.raw(key).await? {
            serde_json::Value::Bool(b) => Some(b),
            other => {
                warn!(key = key, value = %other, "Flag is not a boolean, treating as absent");
                None
            }
        }
    }

    /// Read and deserialize a JSON record.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.raw(key).await?;
        match serde_json::from_value(value) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                warn!(key = key, error = %e, "Flag has unexpected shape, treating as absent");
                None
            }
        }
    }

    pub async fn set_bool(&self, key: &str, value: bool) -> Result<(), StoreError> {
        self.store.set(key, &serde_json::Value::Bool(value)).await
    }

    pub async fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let value =
            serde_json::to_value(value).map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.store.set(key, &value).await
    }

    pub async fn clear(&self, key: &str) -> Result<bool, StoreError> {
        self.store.clear(key).await
    }

    async fn raw(&self, key: &str) -> Option<serde_json::Value> {
        match self.store.get(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!(key = key, error = %e, "Failed to read flag, treating as absent");
                None
            }
        }
    }
}
