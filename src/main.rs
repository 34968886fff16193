//! # Sharebot
//!
//! Searches Twitter/X for tweets matching the configured tokens and retweets the
//! first suitable one. Each invocation does a single run; schedule it externally
//! (cron, CI) to retweet periodically.
//!
//! ## Environment Variables
//!
//! - `CONSUMER_KEY`, `CONSUMER_SECRET`: application credentials
//! - `ACCESS_TOKEN`, `ACCESS_TOKEN_SECRET`: bot account credentials
//! - `COMMA_SEPARATED_SEARCH_TOKENS`: keywords and hashtags to search for
//! - `COMMA_SEPARATED_SKIP_RETWEET_ACCOUNTS`: accounts never to retweet from
//! - `OFFENSIVENESS_THRESHOLD`, `OFFENSIVENESS_CLASSIFIER_URL`, `TWITTER_API_BASE_URL`: optional
//! - `RUST_LOG`: log filter (defaults to `info`)

use log::info;

use sharebot::{
    BotConfig, BotSettings, HttpClassifier, LexiconClassifier, OffensivenessClassifier,
    RetweetOutcome, ShareBot, TwitterClient,
};

/// Main entry point for the sharebot.
///
/// Loads the configuration, builds the API client and classifier, and performs one
/// retweet run.
///
/// # Example Usage
///
/// ```bash
/// # Run with debug logging
/// RUST_LOG=debug cargo run
/// ```
///
/// # Errors
///
/// Exits with an error if a required environment variable is missing or every
/// retweet attempt failed. Finding nothing to retweet is not an error.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize the logging system
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = BotConfig::from_env()?;

    let api = TwitterClient::from_config(&config);
    let classifier: Box<dyn OffensivenessClassifier> = match &config.classifier_url {
        Some(url) => {
            info!("Using remote offensiveness classifier at {}", url);
            Box::new(HttpClassifier::new(url.clone()))
        }
        None => Box::new(LexiconClassifier::new()?),
    };

    let bot = ShareBot::new(&api, classifier.as_ref(), BotSettings::from_config(&config));

    // Find posts and retweet
    let mut search_tokens = config.search_tokens.clone();
    match bot
        .run(&mut search_tokens, &config.skip_retweet_accounts)
        .await?
    {
        RetweetOutcome::Retweeted { tweet_id, author } => {
            info!("Retweeted tweet {} by @{}", tweet_id, author);
        }
        RetweetOutcome::NoSuitableTweet => {
            info!("Nothing was retweeted in this run");
        }
    }

    info!("Done.");
    Ok(())
}
