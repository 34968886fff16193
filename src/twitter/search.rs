//! Tweet search functionality for the Twitter API.
//!
//! Wraps the v1.1 standard search endpoint (`search/tweets.json`).

use log::info;
use reqwest::Method;

use super::api::TwitterClient;
use super::parsing::parse_search_response;
use super::SearchPage;
use crate::error::ApiError;
use crate::query::SearchRequest;

/// Largest page the standard search endpoint serves.
const MAX_PAGE_SIZE: usize = 100;

/// Builds the query parameters for one search page.
pub(crate) fn search_params(
    request: &SearchRequest,
    count: usize,
    max_id: Option<&str>,
) -> Vec<(String, String)> {
    let mut params = vec![
        ("q".to_string(), request.query.clone()),
        (
            "result_type".to_string(),
            request.result_type.as_str().to_string(),
        ),
        ("lang".to_string(), request.lang.to_string()),
        (
            "count".to_string(),
            count.clamp(1, MAX_PAGE_SIZE).to_string(),
        ),
    ];
    if request.extended {
        params.push(("tweet_mode".to_string(), "extended".to_string()));
    }
    if let Some(max_id) = max_id {
        params.push(("max_id".to_string(), max_id.to_string()));
    }
    params
}

impl TwitterClient {
    /// Fetches one page of search results.
    ///
    /// # Parameters
    ///
    /// - `request`: Query, ranking, language and text mode
    /// - `count`: Requested page size (clamped to 1..=100)
    /// - `max_id`: Return only tweets at or below this ID (for pagination)
    ///
    /// # Returns
    ///
    /// - `Ok(SearchPage)`: The tweets on this page and the `max_id` of the next one
    /// - `Err(ApiError)`: If the request fails or the body cannot be parsed
    pub async fn search_tweets(
        &self,
        request: &SearchRequest,
        count: usize,
        max_id: Option<&str>,
    ) -> Result<SearchPage, ApiError> {
        info!(
            "Searching tweets (result_type: {}, count: {}): {}",
            request.result_type, count, request.query
        );

        let params = search_params(request, count, max_id);
        let body = self
            .send_signed(Method::GET, "search/tweets.json", &params, "search_tweets")
            .await?;
        let page = parse_search_response(&body)?;

        info!("Found {} tweets in this page", page.tweets.len());
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::ResultType;

    fn param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_search_params_first_page() {
        let request = SearchRequest::new("a OR b".to_string(), ResultType::Popular);
        let params = search_params(&request, 10, None);

        assert_eq!(param(&params, "q"), Some("a OR b"));
        assert_eq!(param(&params, "result_type"), Some("popular"));
        assert_eq!(param(&params, "lang"), Some("en"));
        assert_eq!(param(&params, "count"), Some("10"));
        assert_eq!(param(&params, "tweet_mode"), Some("extended"));
        assert_eq!(param(&params, "max_id"), None);
    }

    #[test]
    fn test_search_params_next_page_and_clamping() {
        let request = SearchRequest::new("a".to_string(), ResultType::Recent);
        let params = search_params(&request, 500, Some("12345"));

        assert_eq!(param(&params, "count"), Some("100"));
        assert_eq!(param(&params, "max_id"), Some("12345"));
    }
}
