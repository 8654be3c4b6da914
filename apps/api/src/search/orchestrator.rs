//! Job search engine: runs the provider fallback policy for one request.
//!
//! Every provider batch is refined (keyword → location → experience) before it is
//! counted, so the fallback decisions see relevant jobs only. The merged list is
//! deduplicated, ranked by relevance across batches and truncated last. A search
//! never fails: the worst outcome is an empty list.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{timeout_at, Instant};
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::models::job::NormalizedJob;
use crate::models::search::SearchRequest;
use crate::providers::{JobProvider, ProviderQuery};
use crate::search::dedup::dedup;
use crate::search::experience::filter_by_experience;
use crate::search::keyword_filter::filter_by_keywords;
use crate::search::location::{normalize_location, NormalizedLocation};
use crate::search::location_filter::{filter_by_location, LocationFilterMode};
use crate::search::query::{compose_broadened_query, compose_query};
use crate::search::text::contains_term;

/// Below this many results an under-covered location gets the tertiary pass.
pub const TERTIARY_FLOOR: usize = 3;

/// Signals a broadened-batch job must carry to be merged.
const INTERNATIONAL_SIGNALS: &[&str] = &[
    "remote",
    "worldwide",
    "global",
    "international",
    "anywhere",
    "work from home",
    "distributed",
    "virtual",
];

/// Providers by role in the fallback policy.
#[derive(Clone)]
pub struct ProviderSet {
    /// Unauthenticated board, always queried first.
    pub primary: Arc<dyn JobProvider>,
    /// Quota-limited, country-routed board.
    pub secondary: Option<Arc<dyn JobProvider>>,
    /// Aggregator used for under-covered locations.
    pub tertiary: Option<Arc<dyn JobProvider>>,
}

#[derive(Debug, Clone, Copy)]
pub struct SearchSettings {
    /// Budget for a whole search. Calls still running when it expires are dropped.
    pub deadline: Duration,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            deadline: Duration::from_secs(12),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BatchKind {
    /// Primary board: no native location support, so location is checked strictly.
    Primary,
    /// Location-aware query against a secondary or tertiary provider.
    Targeted,
    /// Location-free query baited with remote/international terms.
    Broadened,
}

pub struct JobSearchEngine {
    providers: ProviderSet,
    settings: SearchSettings,
}

impl JobSearchEngine {
    pub fn new(providers: ProviderSet, settings: SearchSettings) -> Self {
        Self {
            providers,
            settings,
        }
    }

    /// Runs one search. Always returns at most `request.effective_limit()` jobs.
    pub async fn search(&self, request: &SearchRequest) -> Vec<NormalizedJob> {
        let search_id = Uuid::new_v4();
        let span = info_span!("job_search", %search_id);
        self.run(request).instrument(span).await
    }

    async fn run(&self, request: &SearchRequest) -> Vec<NormalizedJob> {
        let deadline = Instant::now() + self.settings.deadline;
        let limit = request.effective_limit();
        let location = normalize_location(request.location().unwrap_or_default());

        info!(
            "Searching '{}' in '{}' (limit {}, {:?})",
            request.keywords, location.canonical, limit, location.coverage
        );

        let mut batches: Vec<Vec<NormalizedJob>> = Vec::new();

        // Step 1: primary
        let primary = &self.providers.primary;
        let query = compose_query(request, &location, primary.composition(), limit);
        let raw = call_provider(primary.as_ref(), &query, deadline).await;
        let refined = self.refine(raw, request, &location, BatchKind::Primary, limit);
        info!("{} contributed {} jobs", primary.name(), refined.len());
        batches.push(refined);
        let mut running = count(&batches);

        // Step 2: secondary, only where it demonstrably helps
        if let Some(secondary) = &self.providers.secondary {
            let wanted = if running == 0 && !location.is_empty() {
                Some(limit)
            } else if running < limit && location.is_empty() {
                Some(limit - running)
            } else {
                None
            };

            if let Some(wanted) = wanted {
                if Instant::now() >= deadline {
                    warn!("Search deadline reached, skipping {}", secondary.name());
                } else {
                    let query = compose_query(request, &location, secondary.composition(), wanted);
                    let raw = call_provider(secondary.as_ref(), &query, deadline).await;
                    let refined =
                        self.refine(raw, request, &location, BatchKind::Targeted, wanted);
                    info!("{} contributed {} jobs", secondary.name(), refined.len());
                    batches.push(refined);
                    running = count(&batches);
                }
            }
        }

        // Step 3: under-covered location still short of results
        if let Some(tertiary) = &self.providers.tertiary {
            if !location.is_empty() && !location.is_well_covered() && running < TERTIARY_FLOOR {
                if Instant::now() >= deadline {
                    warn!("Search deadline reached, skipping {}", tertiary.name());
                } else {
                    info!(
                        "Only {} jobs for under-covered '{}', querying {}",
                        running,
                        location.canonical,
                        tertiary.name()
                    );
                    let targeted_query =
                        compose_query(request, &location, tertiary.composition(), limit);
                    let broadened_query = compose_broadened_query(request, limit);

                    let (targeted, broadened) = tokio::join!(
                        call_provider(tertiary.as_ref(), &targeted_query, deadline),
                        call_provider(tertiary.as_ref(), &broadened_query, deadline),
                    );

                    batches.push(self.refine(
                        targeted,
                        request,
                        &location,
                        BatchKind::Targeted,
                        limit,
                    ));
                    batches.push(self.refine(
                        broadened,
                        request,
                        &location,
                        BatchKind::Broadened,
                        limit,
                    ));
                }
            }
        }

        // Step 4: merge in call order, first batch wins duplicates, then rank across batches
        let merged: Vec<NormalizedJob> = batches.into_iter().flatten().collect();
        let mut result = dedup(merged);
        // stable: equal scores keep call order
        result.sort_by(|a, b| b.relevance_score.cmp(&a.relevance_score));
        result.truncate(limit);
        info!("Search finished with {} jobs", result.len());
        result
    }

    fn refine(
        &self,
        jobs: Vec<NormalizedJob>,
        request: &SearchRequest,
        location: &NormalizedLocation,
        kind: BatchKind,
        limit: usize,
    ) -> Vec<NormalizedJob> {
        if jobs.is_empty() {
            return jobs;
        }

        let jobs = if kind == BatchKind::Broadened {
            filter_international(jobs)
        } else {
            jobs
        };

        let jobs = filter_by_keywords(jobs, &request.keywords);

        let jobs = match kind {
            _ if location.is_empty() => jobs,
            BatchKind::Primary => {
                filter_by_location(jobs, location, LocationFilterMode::Strict, limit)
            }
            BatchKind::Targeted => {
                let mode = LocationFilterMode::for_candidates(jobs.len());
                filter_by_location(jobs, location, mode, limit)
            }
            BatchKind::Broadened => jobs,
        };

        match request.experience_level {
            Some(level) if !jobs.is_empty() => filter_by_experience(jobs, level),
            _ => jobs,
        }
    }
}

/// One provider call bounded by the search deadline. A call that runs past it is
/// dropped and counts as empty.
async fn call_provider(
    provider: &dyn JobProvider,
    query: &ProviderQuery,
    deadline: Instant,
) -> Vec<NormalizedJob> {
    match timeout_at(deadline, provider.search_jobs(query)).await {
        Ok(jobs) => jobs,
        Err(_) => {
            warn!("{} cancelled at search deadline", provider.name());
            Vec::new()
        }
    }
}

/// Keeps jobs flagged remote or mentioning a remote/international signal.
pub(crate) fn filter_international(jobs: Vec<NormalizedJob>) -> Vec<NormalizedJob> {
    let before = jobs.len();
    let kept: Vec<NormalizedJob> = jobs
        .into_iter()
        .filter(|job| {
            if job.is_remote {
                return true;
            }
            let text = format!("{} {} {}", job.title, job.description, job.location)
                .to_lowercase();
            INTERNATIONAL_SIGNALS.iter().any(|s| contains_term(&text, s))
        })
        .collect();
    info!("Broadened batch: {} -> {} remote/international jobs", before, kept.len());
    kept
}

fn count(batches: &[Vec<NormalizedJob>]) -> usize {
    batches.iter().map(Vec::len).sum()
}
