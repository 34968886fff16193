//! The retweet bot.
//!
//! One run searches for candidate tweets, skips unsuitable ones, and retweets the
//! first tweet that passes every check. Failed attempts are retried a fixed number
//! of times with a fixed delay.

use log::{error, info, warn};
use std::collections::HashSet;
use std::time::Duration;

use crate::classifier::{is_offensive, OffensivenessClassifier};
use crate::config::{BotConfig, DEFAULT_OFFENSIVENESS_THRESHOLD};
use crate::error::BotError;
use crate::query::prepare_search;
use crate::twitter::{sanitize_for_logging, SearchCursor, Tweet, TwitterApi};

/// Number of search results inspected per attempt.
pub const CANDIDATE_COUNT: usize = 10;

/// Total attempts per run.
pub const MAX_ATTEMPTS: u32 = 3;

/// Wait between failed attempts.
pub const RETRY_DELAY: Duration = Duration::from_secs(60);

/// Maximum characters of tweet text written to the log.
const LOG_TEXT_LIMIT: usize = 280;

/// Bounded retry with a fixed delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: MAX_ATTEMPTS,
            delay: RETRY_DELAY,
        }
    }
}

/// Tunables for a [`ShareBot`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BotSettings {
    pub offensiveness_threshold: f64,
    pub candidate_count: usize,
    pub retry: RetryPolicy,
}

impl Default for BotSettings {
    fn default() -> Self {
        BotSettings {
            offensiveness_threshold: DEFAULT_OFFENSIVENESS_THRESHOLD,
            candidate_count: CANDIDATE_COUNT,
            retry: RetryPolicy::default(),
        }
    }
}

impl BotSettings {
    pub fn from_config(config: &BotConfig) -> Self {
        BotSettings {
            offensiveness_threshold: config.offensiveness_threshold,
            ..BotSettings::default()
        }
    }
}

/// Result of a run that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetweetOutcome {
    Retweeted { tweet_id: String, author: String },
    NoSuitableTweet,
}

/// Why a candidate was passed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    AlreadyRetweeted,
    SkippedAccount,
    Offensive,
}

/// Finds one suitable tweet and retweets it.
pub struct ShareBot<'a, A: TwitterApi + ?Sized, C: OffensivenessClassifier + ?Sized> {
    api: &'a A,
    classifier: &'a C,
    settings: BotSettings,
}

impl<'a, A, C> ShareBot<'a, A, C>
where
    A: TwitterApi + ?Sized,
    C: OffensivenessClassifier + ?Sized,
{
    pub fn new(api: &'a A, classifier: &'a C, settings: BotSettings) -> Self {
        ShareBot {
            api,
            classifier,
            settings,
        }
    }

    /// Runs [`ShareBot::attempt`] until it succeeds or the retry policy is exhausted.
    ///
    /// Any error from an attempt triggers a retry after the configured delay.
    /// Finding nothing suitable is a success and is not retried.
    ///
    /// # Returns
    ///
    /// - `Ok(RetweetOutcome)`: The outcome of the first attempt that did not fail
    /// - `Err(BotError)`: The error of the last attempt once all attempts failed
    pub async fn run(
        &self,
        search_tokens: &mut [String],
        skip_retweet_accounts: &HashSet<String>,
    ) -> Result<RetweetOutcome, BotError> {
        let max_attempts = self.settings.retry.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.attempt(search_tokens, skip_retweet_accounts).await {
                Ok(outcome) => return Ok(outcome),
                Err(e) if attempt < max_attempts => {
                    warn!(
                        "Retweet attempt {}/{} failed: {}. Retrying in {} seconds",
                        attempt,
                        max_attempts,
                        e,
                        self.settings.retry.delay.as_secs()
                    );
                    tokio::time::sleep(self.settings.retry.delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    error!(
                        "Retweet attempt {}/{} failed: {}. Giving up",
                        attempt, max_attempts, e
                    );
                    return Err(e);
                }
            }
        }
    }

    /// Searches with the given tokens and retweets the first suitable candidate.
    ///
    /// The tokens are shuffled in place so every attempt searches with a
    /// different query. Candidates are checked in the order the search returns
    /// them; the first one that passes every check is retweeted and no later
    /// candidate is looked at.
    pub async fn attempt(
        &self,
        search_tokens: &mut [String],
        skip_retweet_accounts: &HashSet<String>,
    ) -> Result<RetweetOutcome, BotError> {
        let request = {
            let mut rng = rand::thread_rng();
            prepare_search(search_tokens, &mut rng)
        };
        info!(
            "Searching with result type '{}': {}",
            request.result_type, request.query
        );

        let mut cursor = SearchCursor::items(self.api, request, self.settings.candidate_count);
        while let Some(tweet) = cursor.next_tweet().await? {
            info!(
                "Candidate tweet {} by @{}: {}",
                tweet.id,
                tweet.author,
                sanitize_for_logging(&tweet.full_text, LOG_TEXT_LIMIT)
            );

            if let Some(reason) = self.skip_reason(&tweet, skip_retweet_accounts).await? {
                log_skip(&tweet, reason);
                continue;
            }

            info!(
                "Retweeting: {}",
                sanitize_for_logging(&tweet.full_text, LOG_TEXT_LIMIT)
            );
            self.api.retweet(&tweet.id).await?;
            info!("Retweet successful.");

            return Ok(RetweetOutcome::Retweeted {
                tweet_id: tweet.id,
                author: tweet.author,
            });
        }

        error!("Failed to find a suitable tweet to retweet.");
        Ok(RetweetOutcome::NoSuitableTweet)
    }

    /// Applies the skip checks in order, stopping at the first match.
    async fn skip_reason(
        &self,
        tweet: &Tweet,
        skip_retweet_accounts: &HashSet<String>,
    ) -> Result<Option<SkipReason>, BotError> {
        if self.api.is_retweeted(&tweet.id).await? {
            return Ok(Some(SkipReason::AlreadyRetweeted));
        }
        if skip_retweet_accounts.contains(&tweet.author) {
            return Ok(Some(SkipReason::SkippedAccount));
        }
        if is_offensive(
            self.classifier,
            &tweet.full_text,
            self.settings.offensiveness_threshold,
        )
        .await?
        {
            return Ok(Some(SkipReason::Offensive));
        }
        Ok(None)
    }
}

fn log_skip(tweet: &Tweet, reason: SkipReason) {
    let text = sanitize_for_logging(&tweet.full_text, LOG_TEXT_LIMIT);
    match reason {
        SkipReason::AlreadyRetweeted => {
            warn!("Detected an already retweeted tweet: {}", text)
        }
        SkipReason::SkippedAccount => {
            warn!("Detected a spam user: {}. Skipping.", tweet.author)
        }
        SkipReason::Offensive => {
            warn!("Detected an offensive tweet: {}. Skipping.", text)
        }
    }
}
