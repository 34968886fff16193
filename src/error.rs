//! Error types for the sharebot.
//!
//! Configuration errors are fatal at startup. API and classifier errors happen
//! inside a retweet attempt and are retried by [`crate::bot::ShareBot::run`].

use thiserror::Error;

/// Errors raised while building [`crate::config::BotConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing a required field in the environment variables: {0}")]
    MissingVariable(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },
}

/// Errors raised by the Twitter API collaborator.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request failed for operation '{operation}': {source}")]
    Http {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("Twitter API error for operation '{operation}' ({status})")]
    Status {
        operation: &'static str,
        status: u16,
    },

    #[error("Unexpected response for operation '{operation}': {reason}")]
    InvalidResponse {
        operation: &'static str,
        reason: String,
    },

    #[error("Failed to sign request: {0}")]
    Signing(String),
}

/// Errors raised by an offensiveness classifier.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Classifier request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Classifier returned status {0}")]
    Status(u16),

    #[error("Classifier returned {got} probabilities for {expected} texts")]
    LengthMismatch { expected: usize, got: usize },

    #[error("Classifier returned an out-of-range probability: {0}")]
    OutOfRange(f64),
}

/// Any failure inside a single retweet attempt.
#[derive(Debug, Error)]
pub enum BotError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Classifier(#[from] ClassifierError),
}
