//! Configuration types.

use std::time::Duration;

use crate::error::ConfigError;

/// Whether the in-progress draft survives a full process restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DraftPersistence {
    /// Draft lives only as long as the wizard session.
    #[default]
    Session,
    /// Draft is written to the flag store after every change and restored on start.
    Persisted,
}

/// What happens when the user re-enters the wizard after a results handoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReentryPolicy {
    /// Keep the handed-off answers so revisiting steps shows them again.
    #[default]
    ReuseDraft,
    /// Reset the draft after handoff.
    StartFresh,
}

impl std::str::FromStr for ReentryPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reuse" | "reuse_draft" => Ok(Self::ReuseDraft),
            "fresh" | "start_fresh" => Ok(Self::StartFresh),
            other => Err(ConfigError::InvalidValue {
                key: "reentry".to_string(),
                message: format!("expected `reuse` or `fresh`, got `{other}`"),
            }),
        }
    }
}

/// Wizard configuration.
#[derive(Debug, Clone)]
pub struct WizardConfig {
    pub draft_persistence: DraftPersistence,
    pub reentry: ReentryPolicy,
    /// Maximum number of top priorities a user may select.
    pub max_priorities: usize,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            draft_persistence: DraftPersistence::default(),
            reentry: ReentryPolicy::default(),
            max_priorities: 2,
        }
    }
}

/// Progressive-disclosure configuration.
#[derive(Debug, Clone)]
pub struct RevealConfig {
    /// Fraction of a section that must be inside the viewport to count as entered.
    pub threshold: f64,
    /// Fraction of the viewport height trimmed from the bottom edge.
    pub bottom_margin: f64,
    /// Delay before above-the-fold sections are revealed.
    pub hero_delay: Duration,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: 0.2,
            bottom_margin: 0.1,
            hero_delay: Duration::from_millis(100),
        }
    }
}

/// Intro gate configuration.
#[derive(Debug, Clone)]
pub struct IntroConfig {
    /// Length of the overlay exit animation after the media finishes naturally.
    pub exit_animation: Duration,
}

impl Default for IntroConfig {
    fn default() -> Self {
        Self {
            exit_animation: Duration::from_millis(600),
        }
    }
}

/// Consent banner configuration.
#[derive(Debug, Clone)]
pub struct ConsentConfig {
    /// How long an answered consent prompt stays valid.
    pub retention: chrono::Duration,
}

impl Default for ConsentConfig {
    fn default() -> Self {
        Self {
            retention: chrono::Duration::days(30),
        }
    }
}

/// HTTP host configuration, read from `KIBBLE_WIZARD_*` environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub db_path: String,
    pub port: u16,
    pub wizard: WizardConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            db_path: "./data/kibble-wizard.db".to_string(),
            port: 8080,
            wizard: WizardConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Build the host configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = lookup("KIBBLE_WIZARD_DB_PATH") {
            config.db_path = path;
        }

        if let Some(port) = lookup("KIBBLE_WIZARD_PORT") {
            config.port = port.parse().map_err(|e| ConfigError::InvalidValue {
                key: "KIBBLE_WIZARD_PORT".to_string(),
                message: format!("{e}"),
            })?;
        }

        if let Some(persist) = lookup("KIBBLE_WIZARD_PERSIST_DRAFT") {
            config.wizard.draft_persistence = match persist.trim() {
                "1" | "true" | "yes" => DraftPersistence::Persisted,
                "0" | "false" | "no" | "" => DraftPersistence::Session,
                other => {
                    return Err(ConfigError::InvalidValue {
                        key: "KIBBLE_WIZARD_PERSIST_DRAFT".to_string(),
                        message: format!("expected a boolean, got `{other}`"),
                    });
                }
            };
        }

        if let Some(reentry) = lookup("KIBBLE_WIZARD_REENTRY") {
            config.wizard.reentry = reentry.parse()?;
        }

        Ok(config)
    }
}
