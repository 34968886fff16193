//! Response parsing for the Twitter v1.1 REST API.
//!
//! Converts the JSON returned by `search/tweets.json` and `statuses/show.json`
//! into [`Tweet`] values.

use serde::Deserialize;

use super::{SearchPage, Tweet};
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
struct RawUser {
    screen_name: String,
}

#[derive(Debug, Deserialize)]
struct RawStatus {
    id_str: String,
    /// Present with `tweet_mode=extended`
    full_text: Option<String>,
    /// Present in compatibility mode
    text: Option<String>,
    user: RawUser,
    #[serde(default)]
    retweeted: bool,
}

#[derive(Debug, Deserialize)]
struct RawSearchMetadata {
    next_results: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSearchResponse {
    statuses: Vec<RawStatus>,
    search_metadata: Option<RawSearchMetadata>,
}

impl From<RawStatus> for Tweet {
    fn from(raw: RawStatus) -> Self {
        Tweet {
            id: raw.id_str,
            author: raw.user.screen_name,
            full_text: raw.full_text.or(raw.text).unwrap_or_default(),
            retweeted: raw.retweeted,
        }
    }
}

/// Extracts `max_id` from a `next_results` value such as `?max_id=123&q=rust`.
fn extract_max_id(next_results: &str) -> Option<String> {
    let query = next_results.trim_start_matches('?');
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "max_id")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Parses a `search/tweets.json` response body.
pub(crate) fn parse_search_response(body: &str) -> Result<SearchPage, ApiError> {
    let raw: RawSearchResponse =
        serde_json::from_str(body).map_err(|e| ApiError::InvalidResponse {
            operation: "search_tweets",
            reason: e.to_string(),
        })?;

    let next_max_id = raw
        .search_metadata
        .and_then(|metadata| metadata.next_results)
        .and_then(|next| extract_max_id(&next));

    Ok(SearchPage {
        tweets: raw.statuses.into_iter().map(Tweet::from).collect(),
        next_max_id,
    })
}

/// Parses a `statuses/show.json` response body.
pub(crate) fn parse_status(body: &str) -> Result<Tweet, ApiError> {
    let raw: RawStatus = serde_json::from_str(body).map_err(|e| ApiError::InvalidResponse {
        operation: "get_status",
        reason: e.to_string(),
    })?;
    Ok(raw.into())
}
