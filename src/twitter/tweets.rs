//! Tweet operations for the Twitter API.
//!
//! Status lookup and retweeting via the v1.1 `statuses` endpoints.

use log::info;
use reqwest::Method;

use super::api::TwitterClient;
use super::parsing::parse_status;
use super::Tweet;
use crate::error::ApiError;

impl TwitterClient {
    /// Looks up a single tweet as seen by the bot account.
    ///
    /// The returned `retweeted` flag reflects whether the authenticated account has
    /// already retweeted it.
    pub async fn get_status(&self, tweet_id: &str) -> Result<Tweet, ApiError> {
        let params = vec![
            ("id".to_string(), tweet_id.to_string()),
            ("tweet_mode".to_string(), "extended".to_string()),
        ];
        let body = self
            .send_signed(Method::GET, "statuses/show.json", &params, "get_status")
            .await?;
        parse_status(&body)
    }

    /// Retweets a tweet from the bot account.
    ///
    /// # Errors
    ///
    /// Returns an error if the tweet cannot be retweeted (deleted, protected author,
    /// already retweeted) or the request fails.
    pub async fn retweet_status(&self, tweet_id: &str) -> Result<(), ApiError> {
        info!("Sending retweet request for tweet {}", tweet_id);
        let path = format!("statuses/retweet/{}.json", tweet_id);
        self.send_signed(Method::POST, &path, &[], "retweet")
            .await?;
        Ok(())
    }
}
