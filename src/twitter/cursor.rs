//! Lazy, capped pagination over search results.

use log::debug;
use std::collections::VecDeque;

use super::{Tweet, TwitterApi};
use crate::error::ApiError;
use crate::query::SearchRequest;

/// Yields at most `limit` tweets for one search, fetching pages on demand.
///
/// A page is requested only once the previous one has been consumed, so a caller
/// that stops early never triggers further requests. A cursor is consumed once;
/// build a new one for the next attempt.
///
/// # Example
///
/// ```rust,no_run
/// use sharebot::query::{ResultType, SearchRequest};
/// use sharebot::twitter::{SearchCursor, TwitterApi};
///
/// async fn first_author(api: &dyn TwitterApi) -> Option<String> {
///     let request = SearchRequest::new("#rustlang".to_string(), ResultType::Recent);
///     let mut cursor = SearchCursor::items(api, request, 10);
///     cursor.next_tweet().await.ok().flatten().map(|tweet| tweet.author)
/// }
/// ```
pub struct SearchCursor<'a, A: TwitterApi + ?Sized> {
    api: &'a A,
    request: SearchRequest,
    limit: usize,
    yielded: usize,
    buffer: VecDeque<Tweet>,
    next_max_id: Option<String>,
    exhausted: bool,
}

impl<'a, A: TwitterApi + ?Sized> SearchCursor<'a, A> {
    pub fn items(api: &'a A, request: SearchRequest, limit: usize) -> Self {
        SearchCursor {
            api,
            request,
            limit,
            yielded: 0,
            buffer: VecDeque::new(),
            next_max_id: None,
            exhausted: false,
        }
    }

    /// Returns the next tweet, `Ok(None)` once `limit` is reached or results run out.
    pub async fn next_tweet(&mut self) -> Result<Option<Tweet>, ApiError> {
        if self.yielded >= self.limit {
            return Ok(None);
        }

        while self.buffer.is_empty() {
            if self.exhausted {
                return Ok(None);
            }
            self.fetch_page().await?;
        }

        let tweet = self.buffer.pop_front();
        if tweet.is_some() {
            self.yielded += 1;
        }
        Ok(tweet)
    }

    async fn fetch_page(&mut self) -> Result<(), ApiError> {
        let remaining = self.limit - self.yielded;
        let page = self
            .api
            .search_page(&self.request, remaining, self.next_max_id.as_deref())
            .await?;
        debug!(
            "Fetched search page with {} tweets (next max_id: {:?})",
            page.tweets.len(),
            page.next_max_id
        );

        // A repeated max_id would loop forever on the same page
        if page.tweets.is_empty()
            || page.next_max_id.is_none()
            || page.next_max_id == self.next_max_id
        {
            self.exhausted = true;
        }

        self.next_max_id = page.next_max_id;
        self.buffer.extend(page.tweets);
        Ok(())
    }
}
