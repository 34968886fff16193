//! # Sharebot Library
//!
//! A small Twitter/X bot that searches for tweets matching a set of keywords and
//! hashtags, skips unsuitable candidates, and retweets the first suitable one.
//!
//! ## Features
//!
//! - Query building with randomised token order and result ranking
//! - Candidate filtering: already retweeted, skipped accounts, offensive text
//! - Retry of the whole attempt (3 attempts, 60 seconds apart)
//! - Twitter/X v1.1 API client signed with OAuth 1.0a, waiting out rate limits
//! - Structured logging
//!
//! ## Configuration
//!
//! The following environment variables are required:
//! - `CONSUMER_KEY`, `CONSUMER_SECRET`, `ACCESS_TOKEN`, `ACCESS_TOKEN_SECRET`
//! - `COMMA_SEPARATED_SEARCH_TOKENS`
//! - `COMMA_SEPARATED_SKIP_RETWEET_ACCOUNTS`
//!
//! See [`config::BotConfig::from_env`] for optional settings.

pub mod bot;
pub mod classifier;
pub mod config;
pub mod error;
pub mod oauth;
pub mod query;
pub mod twitter;

// Re-export commonly used types and functions
pub use bot::{BotSettings, RetryPolicy, RetweetOutcome, ShareBot, SkipReason};
pub use classifier::{is_offensive, HttpClassifier, LexiconClassifier, OffensivenessClassifier};
pub use config::{BotConfig, TwitterCredentials};
pub use error::{ApiError, BotError, ClassifierError, ConfigError};
pub use query::{build_search_query, pick_random_result_type, ResultType, SearchRequest};
pub use twitter::{SearchCursor, Tweet, TwitterApi, TwitterClient};

#[cfg(test)]
mod test_server;
