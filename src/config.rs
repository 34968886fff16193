//! Configuration module for the sharebot.
//!
//! This module builds the [`BotConfig`] value from environment variables. It is
//! constructed once at process start and passed by reference into the bot; nothing
//! below `main` reads the environment.

use log::{debug, error, info, warn};
use std::collections::HashSet;
use std::env;

use crate::error::ConfigError;

/// Default base URL for the Twitter/X v1.1 REST API.
pub const DEFAULT_API_BASE_URL: &str = "https://api.twitter.com/1.1";

/// Default probability above which a text counts as offensive.
pub const DEFAULT_OFFENSIVENESS_THRESHOLD: f64 = 0.50;

/// OAuth 1.0a credentials for the bot account.
///
/// `Debug` is implemented by hand so secrets never end up in logs.
#[derive(Clone)]
pub struct TwitterCredentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

impl std::fmt::Debug for TwitterCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwitterCredentials")
            .field("consumer_key", &mask_secret(&self.consumer_key))
            .field("consumer_secret", &"[REDACTED]")
            .field("access_token", &mask_secret(&self.access_token))
            .field("access_token_secret", &"[REDACTED]")
            .finish()
    }
}

/// Everything the bot needs for one run.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// OAuth 1.0a credentials
    pub credentials: TwitterCredentials,
    /// Keywords and hashtags used to build the search query
    pub search_tokens: Vec<String>,
    /// Screen names the bot never retweets from
    pub skip_retweet_accounts: HashSet<String>,
    /// Probability above which a tweet is considered offensive
    pub offensiveness_threshold: f64,
    /// Remote classifier endpoint; the built-in lexicon is used when absent
    pub classifier_url: Option<String>,
    /// Base URL of the v1.1 REST API
    pub api_base_url: String,
}

impl BotConfig {
    /// Creates a new `BotConfig` from the process environment.
    ///
    /// # Required Environment Variables
    ///
    /// - `CONSUMER_KEY`, `CONSUMER_SECRET`: application credentials
    /// - `ACCESS_TOKEN`, `ACCESS_TOKEN_SECRET`: bot account credentials
    /// - `COMMA_SEPARATED_SEARCH_TOKENS`: e.g. `#rustlang,ferris,cargo`
    /// - `COMMA_SEPARATED_SKIP_RETWEET_ACCOUNTS`: e.g. `spammer1,spammer2`
    ///
    /// # Optional Environment Variables
    ///
    /// - `OFFENSIVENESS_THRESHOLD`: float in `[0, 1]`, defaults to `0.5`
    /// - `OFFENSIVENESS_CLASSIFIER_URL`: remote classifier endpoint
    /// - `TWITTER_API_BASE_URL`: defaults to [`DEFAULT_API_BASE_URL`] when unset or empty
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use sharebot::BotConfig;
    ///
    /// let config = BotConfig::from_env().expect("missing configuration");
    /// println!("{} search tokens", config.search_tokens.len());
    /// ```
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading bot configuration from environment variables");
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a `BotConfig` from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &'static str| -> Result<String, ConfigError> {
            match lookup(name) {
                Some(value) => {
                    debug!("Found {} environment variable", name);
                    Ok(value)
                }
                None => {
                    error!("Failed to load {} from environment", name);
                    Err(ConfigError::MissingVariable(name))
                }
            }
        };

        let credentials = TwitterCredentials {
            consumer_key: require("CONSUMER_KEY")?,
            consumer_secret: require("CONSUMER_SECRET")?,
            access_token: require("ACCESS_TOKEN")?,
            access_token_secret: require("ACCESS_TOKEN_SECRET")?,
        };
        debug!("Consumer key (masked): {}", mask_secret(&credentials.consumer_key));
        debug!("Access token (masked): {}", mask_secret(&credentials.access_token));

        let search_tokens = split_comma_separated(&require("COMMA_SEPARATED_SEARCH_TOKENS")?);
        if search_tokens.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "COMMA_SEPARATED_SEARCH_TOKENS",
                reason: "at least one search token is required".to_string(),
            });
        }

        let skip_retweet_accounts: HashSet<String> =
            split_comma_separated(&require("COMMA_SEPARATED_SKIP_RETWEET_ACCOUNTS")?)
                .into_iter()
                .collect();

        let offensiveness_threshold = match lookup("OFFENSIVENESS_THRESHOLD") {
            Some(raw) => parse_threshold(&raw)?,
            None => DEFAULT_OFFENSIVENESS_THRESHOLD,
        };

        let classifier_url = lookup("OFFENSIVENESS_CLASSIFIER_URL").filter(|url| !url.is_empty());
        if classifier_url.is_none() {
            info!("No OFFENSIVENESS_CLASSIFIER_URL set, using the built-in lexicon classifier");
        }

        let api_base_url = lookup("TWITTER_API_BASE_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        if skip_retweet_accounts.is_empty() {
            warn!("No accounts to skip, every author is eligible for a retweet");
        }

        info!(
            "Bot configuration loaded: {} search tokens, {} skipped accounts, threshold {}",
            search_tokens.len(),
            skip_retweet_accounts.len(),
            offensiveness_threshold
        );

        Ok(BotConfig {
            credentials,
            search_tokens,
            skip_retweet_accounts,
            offensiveness_threshold,
            classifier_url,
            api_base_url,
        })
    }
}

/// Splits a comma-separated list, trimming each item and dropping empty ones.
pub fn split_comma_separated(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_threshold(raw: &str) -> Result<f64, ConfigError> {
    let value: f64 = raw.trim().parse().map_err(|e| ConfigError::InvalidValue {
        name: "OFFENSIVENESS_THRESHOLD",
        reason: format!("{}", e),
    })?;
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::InvalidValue {
            name: "OFFENSIVENESS_THRESHOLD",
            reason: format!("{} is outside [0, 1]", value),
        });
    }
    Ok(value)
}

/// Masks a secret for logging, keeping at most the first and last four characters.
pub(crate) fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() > 16 {
        let prefix: String = chars[..4].iter().collect();
        let suffix: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", prefix, suffix)
    } else if chars.len() > 8 {
        let prefix: String = chars[..4].iter().collect();
        format!("{}...", prefix)
    } else {
        "...".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn base_vars() -> HashMap<&'static str, String> {
        let mut vars = HashMap::new();
        vars.insert("CONSUMER_KEY", "consumer-key".to_string());
        vars.insert("CONSUMER_SECRET", "consumer-secret".to_string());
        vars.insert("ACCESS_TOKEN", "access-token".to_string());
        vars.insert("ACCESS_TOKEN_SECRET", "access-token-secret".to_string());
        vars.insert(
            "COMMA_SEPARATED_SEARCH_TOKENS",
            " #rustlang , ferris,cargo ".to_string(),
        );
        vars.insert(
            "COMMA_SEPARATED_SKIP_RETWEET_ACCOUNTS",
            "spammer1, spammer2".to_string(),
        );
        vars
    }

    fn load(vars: &HashMap<&'static str, String>) -> Result<BotConfig, ConfigError> {
        BotConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_from_lookup_parses_lists_and_defaults() {
        let config = load(&base_vars()).unwrap();

        assert_eq!(config.search_tokens, vec!["#rustlang", "ferris", "cargo"]);
        assert!(config.skip_retweet_accounts.contains("spammer1"));
        assert!(config.skip_retweet_accounts.contains("spammer2"));
        assert_eq!(config.skip_retweet_accounts.len(), 2);
        assert_eq!(config.offensiveness_threshold, DEFAULT_OFFENSIVENESS_THRESHOLD);
        assert_eq!(config.classifier_url, None);
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_each_required_variable_is_enforced() {
        for name in [
            "CONSUMER_KEY",
            "CONSUMER_SECRET",
            "ACCESS_TOKEN",
            "ACCESS_TOKEN_SECRET",
            "COMMA_SEPARATED_SEARCH_TOKENS",
            "COMMA_SEPARATED_SKIP_RETWEET_ACCOUNTS",
        ] {
            let mut vars = base_vars();
            vars.remove(name);
            match load(&vars) {
                Err(ConfigError::MissingVariable(missing)) => assert_eq!(missing, name),
                other => panic!("expected missing {}, got {:?}", name, other),
            }
        }
    }

    #[test]
    fn test_empty_search_tokens_rejected() {
        let mut vars = base_vars();
        vars.insert("COMMA_SEPARATED_SEARCH_TOKENS", " , ".to_string());
        assert!(matches!(
            load(&vars),
            Err(ConfigError::InvalidValue { name: "COMMA_SEPARATED_SEARCH_TOKENS", .. })
        ));
    }

    #[test]
    fn test_optional_overrides() {
        let mut vars = base_vars();
        vars.insert("OFFENSIVENESS_THRESHOLD", "0.8".to_string());
        vars.insert(
            "OFFENSIVENESS_CLASSIFIER_URL",
            "http://localhost:8000/predict".to_string(),
        );
        vars.insert("TWITTER_API_BASE_URL", "http://localhost:9000/1.1/".to_string());

        let config = load(&vars).unwrap();
        assert_eq!(config.offensiveness_threshold, 0.8);
        assert_eq!(
            config.classifier_url.as_deref(),
            Some("http://localhost:8000/predict")
        );
        assert_eq!(config.api_base_url, "http://localhost:9000/1.1");
    }

    #[test]
    fn test_empty_urls_fall_back_to_defaults() {
        for raw in ["", "  ", "/"] {
            let mut vars = base_vars();
            vars.insert("TWITTER_API_BASE_URL", raw.to_string());
            vars.insert("OFFENSIVENESS_CLASSIFIER_URL", String::new());

            let config = load(&vars).unwrap();
            assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
            assert_eq!(config.classifier_url, None);
        }
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        for raw in ["abc", "1.5", "-0.1"] {
            let mut vars = base_vars();
            vars.insert("OFFENSIVENESS_THRESHOLD", raw.to_string());
            assert!(load(&vars).is_err(), "threshold {} should be rejected", raw);
        }
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("short"), "...");
        assert_eq!(mask_secret("0123456789"), "0123...");
        assert_eq!(mask_secret("0123456789abcdefXYZ"), "0123...fXYZ");
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = load(&base_vars()).unwrap();
        let rendered = format!("{:?}", config.credentials);
        assert!(!rendered.contains("consumer-secret"));
        assert!(!rendered.contains("access-token-secret"));
    }
}
