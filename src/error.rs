//! Error types for Kibble Wizard.

use crate::wizard::WizardStep;

/// Top-level error type for the engine and its host.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Results handoff error: {0}")]
    Handoff(#[from] HandoffError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Persisted flag store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Failures reported by the downstream results collaborator.
#[derive(Debug, thiserror::Error)]
pub enum HandoffError {
    #[error("Results collaborator rejected the draft: {reason}")]
    Rejected { reason: String },

    #[error("Results collaborator unavailable: {reason}")]
    Unavailable { reason: String },
}

/// Why the wizard refused a set of answers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnswerError {
    #[error("answers for {patch} are not for the current step ({current})")]
    NotOnScreen {
        current: WizardStep,
        patch: WizardStep,
    },

    #[error("{count} priorities selected, at most {max} allowed")]
    TooManyPriorities { count: usize, max: usize },
}

/// Result type alias for the engine.
pub type Result<T> = std::result::Result<T, Error>;
