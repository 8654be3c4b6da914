//! Location Relevance Filter.
//!
//! Strict mode drops non-matching jobs; light mode only moves matches to the front.
//! A strict pass that leaves nothing is a legitimate "no matches here": widening the
//! search is the orchestrator's call, not this filter's.

use tracing::info;

use crate::models::job::NormalizedJob;
use crate::search::location::{is_remote_location, NormalizedLocation};
use crate::search::text::{contains_word, words};

/// Strict filtering needs more than this many candidates to be worth the losses.
pub const STRICT_MIN_CANDIDATES: usize = 5;

/// Requested city → extra terms a job location may carry instead of the city name.
const CITY_EXPANSIONS: &[(&str, &[&str])] = &[
    ("tel aviv", &["tel aviv", "israel", "il"]),
    ("jerusalem", &["jerusalem", "israel", "il"]),
    ("haifa", &["haifa", "israel", "il"]),
    ("washington", &["washington", "dc", "usa", "united states"]),
    ("new york", &["new york", "ny", "nyc", "usa", "united states"]),
    ("san francisco", &["san francisco", "sf", "california", "ca", "usa"]),
    ("los angeles", &["los angeles", "la", "california", "ca", "usa"]),
    ("london", &["london", "uk", "united kingdom", "england", "gb"]),
    ("paris", &["paris", "france", "fr"]),
    ("berlin", &["berlin", "germany", "deutschland", "de"]),
    ("munich", &["munich", "münchen", "germany", "deutschland", "de"]),
    ("amsterdam", &["amsterdam", "netherlands", "nl"]),
];

/// Tags Arbeitnow uses for remote postings.
const REMOTE_TAGS: &[&str] = &["remote", "home office", "homeoffice"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationFilterMode {
    Strict,
    Light,
}

impl LocationFilterMode {
    /// Strict when there are enough candidates to afford dropping some.
    pub fn for_candidates(count: usize) -> Self {
        if count > STRICT_MIN_CANDIDATES {
            LocationFilterMode::Strict
        } else {
            LocationFilterMode::Light
        }
    }
}

/// Whether a job is flagged, located or tagged remote.
pub fn is_remote_job(job: &NormalizedJob) -> bool {
    job.is_remote
        || contains_word(&job.location_text(), "remote")
        || job
            .tags
            .iter()
            .any(|tag| REMOTE_TAGS.contains(&tag.trim().to_lowercase().as_str()))
}

/// The matching test shared by both modes.
pub struct LocationMatcher {
    keywords: Vec<String>,
    expansions: Vec<&'static str>,
    remote_request: bool,
}

impl LocationMatcher {
    pub fn new(location: &NormalizedLocation) -> Self {
        let lower = location.canonical.to_lowercase();

        let keywords = words(&lower)
            .into_iter()
            .filter(|w| w.chars().count() > 2)
            .collect();

        let expansions = CITY_EXPANSIONS
            .iter()
            .filter(|(city, _)| contains_word(&lower, city))
            .flat_map(|(_, terms)| terms.iter().copied())
            .collect();

        Self {
            keywords,
            expansions,
            remote_request: is_remote_location(&location.canonical),
        }
    }

    pub fn matches(&self, job: &NormalizedJob) -> bool {
        if self.remote_request {
            return is_remote_job(job);
        }

        let text = job.location_text();
        self.keywords.iter().any(|k| contains_word(&text, k))
            || self.expansions.iter().any(|t| contains_word(&text, t))
    }
}

/// Applies the location test in the given mode.
///
/// Light mode keeps every match and fills up with non-matches until `limit` is reached.
pub fn filter_by_location(
    jobs: Vec<NormalizedJob>,
    location: &NormalizedLocation,
    mode: LocationFilterMode,
    limit: usize,
) -> Vec<NormalizedJob> {
    if jobs.is_empty() || location.is_empty() {
        return jobs;
    }

    let matcher = LocationMatcher::new(location);
    let input_count = jobs.len();
    let (matching, others): (Vec<_>, Vec<_>) = jobs.into_iter().partition(|j| matcher.matches(j));

    match mode {
        LocationFilterMode::Strict => {
            if matching.is_empty() {
                info!("No location matches for '{}'", location.canonical);
            }
            info!(
                "Location filtering for '{}': {} -> {} jobs",
                location.canonical,
                input_count,
                matching.len()
            );
            matching
        }
        LocationFilterMode::Light => {
            let priority = matching.len();
            let room = limit.saturating_sub(priority);
            let mut result = matching;
            result.extend(others.into_iter().take(room));
            info!(
                "Light location filtering for '{}': {} priority jobs, {} total returned",
                location.canonical,
                priority,
                result.len()
            );
            result
        }
    }
}
