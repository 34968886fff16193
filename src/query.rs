//! Search query construction.
//!
//! Builds the query string sent to the search endpoint and picks the ranking
//! mode used for a given attempt.

use rand::seq::SliceRandom;
use rand::Rng;

/// Exclusion filters appended to every query: no retweets, no replies.
pub const QUERY_FILTERS: &str = "-filter:retweets AND -filter:replies";

/// Language restriction for candidate tweets.
pub const SEARCH_LANGUAGE: &str = "en";

/// Ranking applied by the search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultType {
    Recent,
    Popular,
    Mixed,
}

impl ResultType {
    pub const ALL: [ResultType; 3] = [ResultType::Recent, ResultType::Popular, ResultType::Mixed];

    /// Value of the `result_type` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultType::Recent => "recent",
            ResultType::Popular => "popular",
            ResultType::Mixed => "mixed",
        }
    }
}

impl std::fmt::Display for ResultType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully specified search: query string, ranking, language and text mode.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub query: String,
    pub result_type: ResultType,
    pub lang: &'static str,
    /// Request untruncated text (`tweet_mode=extended`)
    pub extended: bool,
}

impl SearchRequest {
    pub fn new(query: String, result_type: ResultType) -> Self {
        SearchRequest {
            query,
            result_type,
            lang: SEARCH_LANGUAGE,
            extended: true,
        }
    }
}

/// Returns a search query used to find tweets with the given search tokens.
///
/// Tokens are joined with `OR` in the order given and followed by [`QUERY_FILTERS`].
/// An empty slice produces a query with no search terms; callers must pass at
/// least one token.
///
/// # Example
///
/// ```rust
/// use sharebot::build_search_query;
///
/// let tokens = vec!["#rustlang".to_string(), "ferris".to_string()];
/// assert_eq!(
///     build_search_query(&tokens),
///     "#rustlang OR ferris -filter:retweets AND -filter:replies"
/// );
/// ```
pub fn build_search_query(search_tokens: &[String]) -> String {
    let concatenated_tokens = search_tokens.join(" OR ");
    format!("{} {}", concatenated_tokens, QUERY_FILTERS)
}

/// Picks a result type uniformly at random.
pub fn pick_random_result_type<R: Rng>(rng: &mut R) -> ResultType {
    ResultType::ALL[rng.gen_range(0..ResultType::ALL.len())]
}

/// Shuffles the tokens in place and builds the request for one attempt.
pub fn prepare_search<R: Rng>(search_tokens: &mut [String], rng: &mut R) -> SearchRequest {
    search_tokens.shuffle(rng);
    let query = build_search_query(search_tokens);
    SearchRequest::new(query, pick_random_result_type(rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    fn tokens(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_build_search_query_joins_in_order() {
        let query = build_search_query(&tokens(&["#gardening", "compost", "#seeds"]));
        assert_eq!(
            query,
            "#gardening OR compost OR #seeds -filter:retweets AND -filter:replies"
        );
    }

    #[test]
    fn test_build_search_query_single_token() {
        let query = build_search_query(&tokens(&["spoon"]));
        assert_eq!(query, "spoon -filter:retweets AND -filter:replies");
    }

    #[test]
    fn test_build_search_query_contains_every_token_for_any_order() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut items = tokens(&["a", "#b", "c c", "d"]);
        for _ in 0..20 {
            items.shuffle(&mut rng);
            let query = build_search_query(&items);
            assert!(query.ends_with(QUERY_FILTERS));
            let terms = query.trim_end_matches(QUERY_FILTERS).trim_end();
            let split: Vec<&str> = terms.split(" OR ").collect();
            assert_eq!(split, items.iter().map(String::as_str).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_pick_random_result_type_covers_all_values() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut counts: HashMap<ResultType, usize> = HashMap::new();
        for _ in 0..3000 {
            *counts.entry(pick_random_result_type(&mut rng)).or_default() += 1;
        }
        assert_eq!(counts.len(), 3);
        for result_type in ResultType::ALL {
            let count = counts[&result_type];
            assert!(count > 800, "{} picked only {} times", result_type, count);
        }
    }

    #[test]
    fn test_result_type_wire_values() {
        assert_eq!(ResultType::Recent.as_str(), "recent");
        assert_eq!(ResultType::Popular.as_str(), "popular");
        assert_eq!(ResultType::Mixed.as_str(), "mixed");
    }

    #[test]
    fn test_prepare_search_shuffles_in_place() {
        let mut rng = StdRng::seed_from_u64(1);
        let original = tokens(&["one", "two", "three", "four", "five", "six"]);
        let mut items = original.clone();
        let request = prepare_search(&mut items, &mut rng);

        let mut sorted = items.clone();
        sorted.sort();
        let mut expected = original.clone();
        expected.sort();
        assert_eq!(sorted, expected);
        assert_eq!(request.query, build_search_query(&items));
        assert_eq!(request.lang, "en");
        assert!(request.extended);
    }
}
