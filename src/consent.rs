//! Cookie consent record with a fixed retention window.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::ConsentConfig;
use crate::error::StoreError;
use crate::store::{Flags, keys};

/// The user's answer to the consent banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentRecord {
    pub accepted: bool,
    /// When the answer was given, in epoch milliseconds.
    pub timestamp: i64,
}

impl ConsentRecord {
    pub fn new(accepted: bool, now: DateTime<Utc>) -> Self {
        Self {
            accepted,
            timestamp: now.timestamp_millis(),
        }
    }

    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }

    /// Older than `retention`, or carrying a timestamp that isn't a real date.
    pub fn is_expired(&self, now: DateTime<Utc>, retention: chrono::Duration) -> bool {
        match self.recorded_at() {
            Some(at) => now - at > retention,
            None => true,
        }
    }
}

/// Decides whether the consent banner shows and records the answer.
#[derive(Clone)]
pub struct ConsentBanner {
    flags: Flags,
    config: ConsentConfig,
}

impl ConsentBanner {
    pub fn new(flags: Flags, config: ConsentConfig) -> Self {
        Self { flags, config }
    }

    /// The stored answer, unless it is missing, unparsable, or expired.
    pub async fn current(&self, now: DateTime<Utc>) -> Option<ConsentRecord> {
        let record: ConsentRecord = self.flags.get_json(keys::COOKIE_CONSENT).await?;
        if record.is_expired(now, self.config.retention) {
            debug!(timestamp = record.timestamp, "Consent record expired");
            return None;
        }
        Some(record)
    }

    pub async fn should_show(&self, now: DateTime<Utc>) -> bool {
        self.current(now).await.is_none()
    }

    /// Store the user's answer, stamped with `now`.
    pub async fn record(
        &self,
        accepted: bool,
        now: DateTime<Utc>,
    ) -> Result<ConsentRecord, StoreError> {
        let record = ConsentRecord::new(accepted, now);
        self.flags.set_json(keys::COOKIE_CONSENT, &record).await?;
        info!(accepted = accepted, "Consent recorded");
        Ok(record)
    }
}
