//! Arbeitnow: the open job board. No credentials, no quota, no server-side search:
//! a request returns the current board page and every relevance decision is made by
//! the filter chain afterwards.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::models::job::NormalizedJob;
use crate::providers::{
    date_from_iso, date_from_unix, non_empty, read_json, CompositionRule, JobProvider,
    LocationPlacement, ProviderError, ProviderQuery,
};

pub const SOURCE: &str = "arbeitnow";
pub const DEFAULT_BASE_URL: &str = "https://www.arbeitnow.com/api/job-board-api";
const JOB_PAGE_URL: &str = "https://www.arbeitnow.com/jobs";

#[derive(Debug, Deserialize)]
struct BoardResponse {
    #[serde(default)]
    data: Vec<BoardJob>,
}

#[derive(Debug, Deserialize)]
struct BoardJob {
    slug: Option<String>,
    company_name: Option<String>,
    title: Option<String>,
    description: Option<String>,
    remote: Option<bool>,
    url: Option<String>,
    tags: Option<Vec<String>>,
    job_types: Option<Vec<String>>,
    location: Option<String>,
    /// Unix seconds on the live API, occasionally an ISO string.
    created_at: Option<Value>,
}

pub struct ArbeitnowProvider {
    client: Client,
    base_url: String,
}

impl ArbeitnowProvider {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl JobProvider for ArbeitnowProvider {
    fn name(&self) -> &'static str {
        SOURCE
    }

    fn composition(&self) -> CompositionRule {
        CompositionRule {
            location: LocationPlacement::Omit,
            experience_inline: false,
        }
    }

    async fn fetch(&self, query: &ProviderQuery) -> Result<Vec<NormalizedJob>, ProviderError> {
        let mut request = self.client.get(&self.base_url);
        if query.remote_only {
            request = request.query(&[("remote", "true")]);
        }

        debug!(
            "Fetching Arbeitnow board (remote_only={}, query applied client-side: '{}')",
            query.remote_only, query.text
        );

        let response = request.send().await?;
        let Some(board) = read_json::<BoardResponse>(response).await? else {
            return Ok(Vec::new());
        };

        Ok(board.data.into_iter().map(into_normalized).collect())
    }
}

fn into_normalized(job: BoardJob) -> NormalizedJob {
    let slug = job.slug.unwrap_or_default();
    let url = non_empty(job.url).unwrap_or_else(|| {
        if slug.is_empty() {
            String::new()
        } else {
            format!("{JOB_PAGE_URL}/{slug}")
        }
    });

    NormalizedJob {
        title: job.title.unwrap_or_default(),
        company: job.company_name.unwrap_or_default(),
        location: job.location.unwrap_or_default(),
        description: job.description.unwrap_or_default(),
        url,
        posted_date: job.created_at.as_ref().map(parse_created_at).unwrap_or_default(),
        employment_type: job.job_types.unwrap_or_default().join(", "),
        is_remote: job.remote.unwrap_or(false),
        job_id: slug,
        tags: job.tags.unwrap_or_default(),
        source: SOURCE.to_string(),
        ..Default::default()
    }
}

fn parse_created_at(value: &Value) -> String {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .map(date_from_unix)
            .unwrap_or_default(),
        Value::String(s) => date_from_iso(s),
        _ => String::new(),
    }
}
