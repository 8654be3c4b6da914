//! Axum route handlers for the Jobs API.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::job::NormalizedJob;
use crate::models::search::{SearchRequest, MAX_LIMIT, MIN_LIMIT};
use crate::providers::jsearch::JobDetails;
use crate::search::discovery::{suggestion_request, trending_jobs};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub jobs: Vec<NormalizedJob>,
    pub count: usize,
}

impl From<Vec<NormalizedJob>> for SearchResponse {
    fn from(jobs: Vec<NormalizedJob>) -> Self {
        Self {
            count: jobs.len(),
            jobs,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TrendingQuery {
    pub location: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SuggestionsRequest {
    pub skills: Vec<String>,
    #[serde(default)]
    pub location: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/jobs/search
///
/// Runs the full provider fallback and relevance pipeline.
/// An empty `jobs` list is a valid answer, not an error.
pub async fn handle_search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, AppError> {
    if request.keywords.trim().is_empty() {
        return Err(AppError::Validation("keywords cannot be empty".to_string()));
    }
    if !(MIN_LIMIT..=MAX_LIMIT).contains(&request.limit) {
        return Err(AppError::Validation(format!(
            "limit must be between {MIN_LIMIT} and {MAX_LIMIT}"
        )));
    }

    let jobs = state.engine.search(&request).await;
    Ok(Json(jobs.into()))
}

/// GET /api/v1/jobs/trending?location=
pub async fn handle_trending(
    State(state): State<AppState>,
    Query(query): Query<TrendingQuery>,
) -> Json<SearchResponse> {
    let location = query.location.as_deref().map(str::trim).filter(|l| !l.is_empty());
    let jobs = trending_jobs(&state.engine, location).await;
    Json(jobs.into())
}

/// POST /api/v1/jobs/suggestions
///
/// Searches with the first few skills as keywords.
pub async fn handle_suggestions(
    State(state): State<AppState>,
    Json(request): Json<SuggestionsRequest>,
) -> Result<Json<SearchResponse>, AppError> {
    let search = suggestion_request(&request.skills, request.location.as_deref())
        .ok_or_else(|| AppError::Validation("at least one skill is required".to_string()))?;

    let jobs = state.engine.search(&search).await;
    Ok(Json(jobs.into()))
}

/// GET /api/v1/jobs/details/:job_id
pub async fn handle_job_details(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<JobDetails>, AppError> {
    let details = state
        .details
        .as_ref()
        .ok_or_else(|| AppError::NotFound("job details are not available".to_string()))?;

    details
        .job_details(&job_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("job '{job_id}' not found")))
}
