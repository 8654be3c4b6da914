//! Trending jobs and skill-based suggestions, both built on the search engine.

use crate::models::job::NormalizedJob;
use crate::models::search::SearchRequest;
use crate::search::dedup::dedup_and_limit;
use crate::search::orchestrator::JobSearchEngine;

/// Popular searches sampled for the trending list.
pub const TRENDING_QUERIES: [&str; 3] = ["software engineer", "data scientist", "product manager"];
pub const TRENDING_PER_QUERY: usize = 2;

/// Skills beyond this are ignored when building suggestion keywords.
pub const MAX_SUGGESTION_SKILLS: usize = 5;
pub const SUGGESTION_LIMIT: usize = 20;

/// Top jobs for each trending query, deduplicated across queries in query order.
///
/// The searches run concurrently, so the whole call is bounded by one search deadline.
pub async fn trending_jobs(engine: &JobSearchEngine, location: Option<&str>) -> Vec<NormalizedJob> {
    let requests = TRENDING_QUERIES.map(|keywords| {
        let request = SearchRequest::new(keywords).with_limit(TRENDING_PER_QUERY);
        match location {
            Some(location) => request.with_location(location),
            None => request,
        }
    });
    let [first, second, third] = &requests;

    let (first, second, third) = tokio::join!(
        engine.search(first),
        engine.search(second),
        engine.search(third),
    );

    let jobs = first.into_iter().chain(second).chain(third).collect();
    dedup_and_limit(jobs, TRENDING_QUERIES.len() * TRENDING_PER_QUERY)
}

/// Builds the search for a skill list, or `None` when no skill is usable.
pub fn suggestion_request(skills: &[String], location: Option<&str>) -> Option<SearchRequest> {
    let keywords = skills
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .take(MAX_SUGGESTION_SKILLS)
        .collect::<Vec<_>>()
        .join(" ");

    if keywords.is_empty() {
        return None;
    }

    let mut request = SearchRequest::new(keywords).with_limit(SUGGESTION_LIMIT);
    if let Some(location) = location {
        request = request.with_location(location);
    }
    Some(request)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::time::Instant;

    use super::*;
    use crate::providers::testing::{job, FakeProvider};
    use crate::search::orchestrator::{ProviderSet, SearchSettings};

    fn skills(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_suggestion_uses_first_five_skills() {
        let request = suggestion_request(
            &skills(&["rust", " ", "go", "python", "sql", "docker", "aws"]),
            Some("Berlin"),
        )
        .unwrap();
        assert_eq!(request.keywords, "rust go python sql docker");
        assert_eq!(request.limit, 20);
        assert_eq!(request.location.as_deref(), Some("Berlin"));
    }

    #[test]
    fn test_suggestion_without_skills() {
        assert!(suggestion_request(&skills(&["", "  "]), None).is_none());
        assert!(suggestion_request(&[], None).is_none());
    }

    #[tokio::test]
    async fn test_trending_takes_top_two_per_query() {
        let primary = Arc::new(FakeProvider::new(
            "arbeitnow",
            vec![
                job("arbeitnow", "se1", "Software Engineer", "", ""),
                job("arbeitnow", "se2", "Software Engineer", "", ""),
                job("arbeitnow", "se3", "Software Engineer", "", ""),
                job("arbeitnow", "ds1", "Data Scientist", "", ""),
                job("arbeitnow", "pm1", "Product Manager", "", ""),
            ],
        ));
        let engine = JobSearchEngine::new(
            ProviderSet {
                primary: primary.clone(),
                secondary: None,
                tertiary: None,
            },
            SearchSettings::default(),
        );

        let result = trending_jobs(&engine, None).await;

        assert_eq!(primary.calls(), 3);
        let ids: Vec<&str> = result.iter().map(|j| j.job_id.as_str()).collect();
        assert!(ids.len() <= 6);
        assert!(ids.contains(&"se1"));
        assert!(ids.contains(&"ds1"));
        assert!(ids.contains(&"pm1"));
        assert!(!ids.contains(&"se3"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_trending_queries_share_one_deadline() {
        let primary = Arc::new(
            FakeProvider::new(
                "arbeitnow",
                vec![job("arbeitnow", "se1", "Software Engineer", "", "")],
            )
            .with_delay(Duration::from_secs(60)),
        );
        let engine = JobSearchEngine::new(
            ProviderSet {
                primary: primary.clone(),
                secondary: None,
                tertiary: None,
            },
            SearchSettings {
                deadline: Duration::from_secs(10),
            },
        );

        let started = Instant::now();
        let result = trending_jobs(&engine, None).await;

        assert!(started.elapsed() < Duration::from_secs(11));
        assert!(result.is_empty());
        assert_eq!(primary.calls(), 3);
    }
}
