//! Twitter/X API integration module.
//!
//! This module contains the [`TwitterApi`] collaborator used by the bot, its
//! production implementation [`TwitterClient`] against the v1.1 REST API signed
//! with OAuth 1.0a, and the [`SearchCursor`] used to page through search results.

mod api;
mod cursor;
mod parsing;
mod search;
mod tweets;

use async_trait::async_trait;

use crate::error::ApiError;
use crate::query::SearchRequest;

pub use api::TwitterClient;
pub use cursor::SearchCursor;

// Crate-internal re-exports (used by the bot)
pub(crate) use api::sanitize_for_logging;

/// A candidate tweet returned by a search.
#[derive(Debug, Clone, PartialEq)]
pub struct Tweet {
    /// Tweet ID (string form)
    pub id: String,
    /// Screen name of the author, without `@`
    pub author: String,
    /// Full, untruncated text
    pub full_text: String,
    /// Whether the bot account has retweeted this tweet, as reported by the search payload
    pub retweeted: bool,
}

/// One page of search results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchPage {
    pub tweets: Vec<Tweet>,
    /// `max_id` for the next (older) page, if there is one
    pub next_max_id: Option<String>,
}

/// The operations the bot needs from the social platform.
#[async_trait]
pub trait TwitterApi: Send + Sync {
    /// Fetches one page of at most `count` tweets matching `request`.
    async fn search_page(
        &self,
        request: &SearchRequest,
        count: usize,
        max_id: Option<&str>,
    ) -> Result<SearchPage, ApiError>;

    /// Looks up a tweet and reports whether the bot account already retweeted it.
    async fn is_retweeted(&self, tweet_id: &str) -> Result<bool, ApiError>;

    /// Retweets a tweet from the bot account.
    async fn retweet(&self, tweet_id: &str) -> Result<(), ApiError>;
}
