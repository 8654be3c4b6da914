//! JSearch: key-authenticated, paginated aggregator (LinkedIn, Indeed, Glassdoor).
//!
//! Its native location parameter is unreliable, so the location rides inline in the
//! query text. Also serves single-job detail lookups.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::models::job::NormalizedJob;
use crate::providers::{
    date_from_iso, non_empty, read_json, CompositionRule, JobProvider, LocationPlacement,
    ProviderError, ProviderQuery,
};

pub const SOURCE: &str = "jsearch";
pub const DEFAULT_BASE_URL: &str = "https://jsearch.p.rapidapi.com";
pub const DEFAULT_HOST: &str = "jsearch.p.rapidapi.com";
/// JSearch pages hold roughly ten postings.
const RESULTS_PER_PAGE: usize = 10;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    status: Option<String>,
    #[serde(default)]
    data: Vec<JSearchJob>,
    request_info: Option<RequestInfo>,
}

#[derive(Debug, Deserialize)]
struct RequestInfo {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JSearchJob {
    job_id: Option<String>,
    job_title: Option<String>,
    employer_name: Option<String>,
    job_city: Option<String>,
    job_state: Option<String>,
    job_country: Option<String>,
    job_description: Option<String>,
    job_apply_link: Option<String>,
    job_posted_at_datetime_utc: Option<String>,
    job_employment_type: Option<String>,
    job_min_salary: Option<f64>,
    job_max_salary: Option<f64>,
    job_salary_currency: Option<String>,
    job_is_remote: Option<bool>,
    // detail-only fields; strings or string lists depending on the posting
    job_qualifications: Option<Value>,
    job_responsibilities: Option<Value>,
    job_benefits: Option<Value>,
}

/// Extended record for a single posting.
#[derive(Debug, Clone, Serialize)]
pub struct JobDetails {
    #[serde(flatten)]
    pub job: NormalizedJob,
    pub qualifications: Vec<String>,
    pub responsibilities: Vec<String>,
    pub benefits: Vec<String>,
}

pub struct JSearchProvider {
    client: Client,
    base_url: String,
    api_key: String,
    host: String,
    max_pages: u32,
}

impl JSearchProvider {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        host: impl Into<String>,
        max_pages: u32,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
            host: host.into(),
            max_pages: max_pages.max(1),
        }
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .header("X-RapidAPI-Key", &self.api_key)
            .header("X-RapidAPI-Host", &self.host)
    }

    /// Pages needed to cover `limit`, capped by configuration.
    fn pages_for(&self, limit: usize) -> u32 {
        let needed = limit.max(1).div_ceil(RESULTS_PER_PAGE);
        (needed as u32).clamp(1, self.max_pages)
    }

    /// Looks up a single posting by its JSearch id. `Ok(None)` when unknown.
    pub async fn job_details(&self, job_id: &str) -> Result<Option<JobDetails>, ProviderError> {
        let response = self
            .get("/job-details")
            .query(&[("job_id", job_id)])
            .send()
            .await?;

        let Some(body) = read_json::<SearchResponse>(response).await? else {
            return Ok(None);
        };
        check_status(&body)?;

        Ok(body.data.into_iter().next().map(|mut job| {
            let qualifications = string_list(job.job_qualifications.take());
            let responsibilities = string_list(job.job_responsibilities.take());
            let benefits = string_list(job.job_benefits.take());
            JobDetails {
                job: into_normalized(job),
                qualifications,
                responsibilities,
                benefits,
            }
        }))
    }
}

#[async_trait]
impl JobProvider for JSearchProvider {
    fn name(&self) -> &'static str {
        SOURCE
    }

    fn composition(&self) -> CompositionRule {
        CompositionRule {
            location: LocationPlacement::Inline,
            experience_inline: true,
        }
    }

    async fn fetch(&self, query: &ProviderQuery) -> Result<Vec<NormalizedJob>, ProviderError> {
        let num_pages = self.pages_for(query.limit).to_string();
        debug!("Searching JSearch '{}' ({num_pages} pages)", query.text);

        let response = self
            .get("/search")
            .query(&[
                ("query", query.text.as_str()),
                ("page", "1"),
                ("num_pages", num_pages.as_str()),
                ("date_posted", "all"),
                ("employment_types", "FULLTIME"),
            ])
            .send()
            .await?;

        let Some(body) = read_json::<SearchResponse>(response).await? else {
            return Ok(Vec::new());
        };
        check_status(&body)?;

        Ok(body.data.into_iter().map(into_normalized).collect())
    }
}

fn check_status(body: &SearchResponse) -> Result<(), ProviderError> {
    if body.status.as_deref() == Some("OK") {
        return Ok(());
    }
    let message = body
        .request_info
        .as_ref()
        .and_then(|info| info.message.clone())
        .unwrap_or_else(|| "Unknown error".to_string());
    Err(ProviderError::Upstream(message))
}

fn into_normalized(job: JSearchJob) -> NormalizedJob {
    let city = non_empty(job.job_city);
    let state = non_empty(job.job_state);
    let country = non_empty(job.job_country);

    let location = [&city, &state, &country]
        .into_iter()
        .flatten()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    NormalizedJob {
        title: job.job_title.unwrap_or_default(),
        company: job.employer_name.unwrap_or_default(),
        location,
        city,
        state,
        country,
        description: job.job_description.unwrap_or_default(),
        url: job.job_apply_link.unwrap_or_default(),
        posted_date: job
            .job_posted_at_datetime_utc
            .as_deref()
            .map(date_from_iso)
            .unwrap_or_default(),
        employment_type: job.job_employment_type.unwrap_or_default(),
        salary_min: job.job_min_salary,
        salary_max: job.job_max_salary,
        currency: non_empty(job.job_salary_currency),
        is_remote: job.job_is_remote.unwrap_or(false),
        job_id: job.job_id.unwrap_or_default(),
        source: SOURCE.to_string(),
        ..Default::default()
    }
}

fn string_list(value: Option<Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s],
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}
