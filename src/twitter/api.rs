//! Core Twitter API utilities.
//!
//! This module contains the [`TwitterClient`] and the low-level helper for making
//! OAuth 1.0a signed requests, including waiting out rate limits on 429 responses.

use async_trait::async_trait;
use log::{debug, error, info, warn};
use reqwest::header::{HeaderMap, AUTHORIZATION};
use reqwest::{Client, Method, StatusCode};
use std::time::Duration;

use super::{SearchPage, TwitterApi};
use crate::config::{BotConfig, TwitterCredentials};
use crate::error::ApiError;
use crate::oauth::build_oauth1_header;
use crate::query::SearchRequest;

/// Wait used when a 429 response carries no usable reset header (one rate-limit window).
const DEFAULT_RATE_LIMIT_WAIT: Duration = Duration::from_secs(15 * 60);

/// Sanitizes text for safe logging by truncating and escaping control characters.
///
/// This function:
/// - Truncates long text to prevent log flooding
/// - Replaces control characters that could manipulate log output
/// - Replaces newlines and tabs with spaces to prevent log injection
///
/// # Parameters
///
/// - `text`: The text to sanitize
/// - `max_chars`: Maximum number of characters before truncation
///
/// # Returns
///
/// A sanitized string safe for logging
pub(crate) fn sanitize_for_logging(text: &str, max_chars: usize) -> String {
    let sanitized: String = text
        .chars()
        .map(|c| match c {
            '\n' | '\r' | '\t' => ' ',
            c if c.is_control() => '?',
            c => c,
        })
        .collect();

    let char_count = sanitized.chars().count();
    if char_count > max_chars {
        let truncated: String = sanitized.chars().take(max_chars).collect();
        format!("{}... [truncated, {} total chars]", truncated, char_count)
    } else {
        sanitized
    }
}

/// Computes how long to wait after a 429 response.
///
/// Uses the `x-rate-limit-reset` header (epoch seconds) plus one second of slack.
/// Falls back to a full rate-limit window when the header is missing or invalid.
pub(crate) fn rate_limit_wait(headers: &HeaderMap, now_epoch_secs: i64) -> Duration {
    headers
        .get("x-rate-limit-reset")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<i64>().ok())
        .map(|reset| Duration::from_secs((reset - now_epoch_secs).max(0) as u64 + 1))
        .unwrap_or(DEFAULT_RATE_LIMIT_WAIT)
}

/// Client for the Twitter/X v1.1 REST API.
pub struct TwitterClient {
    client: Client,
    credentials: TwitterCredentials,
    base_url: String,
}

impl TwitterClient {
    /// Creates a client that waits out rate limits.
    pub fn new(credentials: TwitterCredentials, base_url: impl Into<String>) -> Self {
        TwitterClient {
            client: Client::new(),
            credentials,
            base_url: base_url.into(),
        }
    }

    /// Creates a client from the bot configuration.
    pub fn from_config(config: &BotConfig) -> Self {
        Self::new(config.credentials.clone(), config.api_base_url.clone())
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Makes a signed request and returns the response body.
    ///
    /// `GET` parameters go in the query string, `POST` parameters in a form body;
    /// both are covered by the OAuth signature.
    ///
    /// # Parameters
    ///
    /// - `method`: HTTP method
    /// - `path`: Endpoint path relative to the base URL, e.g. `search/tweets.json`
    /// - `params`: Request parameters, unencoded
    /// - `operation`: Human-readable name for the operation (for logging and errors)
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The API response body on success
    /// - `Err(ApiError)`: If the request fails or the API returns an error status
    pub(crate) async fn send_signed(
        &self,
        method: Method,
        path: &str,
        params: &[(String, String)],
        operation: &'static str,
    ) -> Result<String, ApiError> {
        let url = self.endpoint(path);
        info!("Making signed {} request for operation: {}", method, operation);
        debug!("Request URL: {}", url);

        loop {
            let auth_header =
                build_oauth1_header(&self.credentials, method.as_str(), &url, params)?;

            let request_builder = if method == Method::GET {
                self.client.get(&url).query(params)
            } else {
                self.client.request(method.clone(), &url).form(params)
            };

            let response = request_builder
                .header(AUTHORIZATION, auth_header)
                .send()
                .await
                .map_err(|source| ApiError::Http { operation, source })?;

            let status = response.status();
            debug!(
                "Received response with status: {} for operation: {}",
                status, operation
            );

            if status.is_success() {
                let body = response
                    .text()
                    .await
                    .map_err(|source| ApiError::Http { operation, source })?;
                debug!(
                    "Response summary for '{}': {} bytes received",
                    operation,
                    body.len()
                );
                return Ok(body);
            }

            if status == StatusCode::TOO_MANY_REQUESTS {
                let wait = rate_limit_wait(response.headers(), chrono::Utc::now().timestamp());
                warn!(
                    "Rate limit reached for operation '{}', sleeping for {} seconds",
                    operation,
                    wait.as_secs()
                );
                tokio::time::sleep(wait).await;
                continue;
            }

            let error_text = response.text().await.unwrap_or_default();
            error!("Operation '{}' failed - Status: {}", operation, status);
            debug!(
                "Error response for '{}': {}",
                operation,
                sanitize_for_logging(&error_text, 200)
            );
            return Err(ApiError::Status {
                operation,
                status: status.as_u16(),
            });
        }
    }
}

#[async_trait]
impl TwitterApi for TwitterClient {
    async fn search_page(
        &self,
        request: &SearchRequest,
        count: usize,
        max_id: Option<&str>,
    ) -> Result<SearchPage, ApiError> {
        self.search_tweets(request, count, max_id).await
    }

    async fn is_retweeted(&self, tweet_id: &str) -> Result<bool, ApiError> {
        Ok(self.get_status(tweet_id).await?.retweeted)
    }

    async fn retweet(&self, tweet_id: &str) -> Result<(), ApiError> {
        self.retweet_status(tweet_id).await
    }
}
