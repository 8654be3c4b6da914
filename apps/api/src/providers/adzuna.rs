//! Adzuna: quota-limited, country-routed search. The native `where` parameter is
//! reliable, so the location travels out-of-band. Every call costs quota, which is why
//! the orchestrator only reaches for this provider when the board came back thin.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::models::job::NormalizedJob;
use crate::providers::{
    date_from_iso, non_empty, read_json, CompositionRule, JobProvider, LocationPlacement,
    ProviderError, ProviderQuery,
};
use crate::search::text::contains_word;

pub const SOURCE: &str = "adzuna";
pub const DEFAULT_BASE_URL: &str = "https://api.adzuna.com/v1/api";
const DEFAULT_COUNTRY: &str = "us";
const MAX_RESULTS_PER_PAGE: usize = 50;

/// Location substring → Adzuna country code. First match wins.
const COUNTRY_ROUTES: &[(&str, &str)] = &[
    ("washington", "us"),
    ("united states", "us"),
    ("usa", "us"),
    ("new york", "us"),
    ("california", "us"),
    ("texas", "us"),
    ("florida", "us"),
    ("london", "gb"),
    ("uk", "gb"),
    ("united kingdom", "gb"),
    ("manchester", "gb"),
    ("birmingham", "gb"),
    ("berlin", "de"),
    ("germany", "de"),
    ("munich", "de"),
    ("hamburg", "de"),
    ("paris", "fr"),
    ("france", "fr"),
    ("lyon", "fr"),
    ("marseille", "fr"),
    ("amsterdam", "nl"),
    ("netherlands", "nl"),
    ("rotterdam", "nl"),
    ("toronto", "ca"),
    ("canada", "ca"),
    ("vancouver", "ca"),
    ("montreal", "ca"),
    ("sydney", "au"),
    ("australia", "au"),
    ("melbourne", "au"),
    ("brisbane", "au"),
];

/// Places Adzuna has no index for. Routing them to the default country would return
/// jobs from the wrong continent.
const UNSUPPORTED_LOCATIONS: &[&str] = &["israel", "tel aviv", "jerusalem", "haifa"];

const CURRENCIES: &[(&str, &str)] = &[
    ("us", "USD"),
    ("gb", "GBP"),
    ("de", "EUR"),
    ("fr", "EUR"),
    ("nl", "EUR"),
    ("ca", "CAD"),
    ("au", "AUD"),
];

const REMOTE_SIGNALS: &[&str] = &["remote", "work from home", "wfh"];

/// Picks the Adzuna country index for a location.
pub fn route_country(location: Option<&str>) -> Result<&'static str, ProviderError> {
    let Some(location) = location else {
        return Ok(DEFAULT_COUNTRY);
    };
    let lower = location.to_lowercase();

    if let Some((_, code)) = COUNTRY_ROUTES
        .iter()
        .find(|(needle, _)| contains_word(&lower, needle))
    {
        return Ok(code);
    }

    if UNSUPPORTED_LOCATIONS
        .iter()
        .any(|needle| contains_word(&lower, needle))
    {
        return Err(ProviderError::UnsupportedLocation(location.to_string()));
    }

    Ok(DEFAULT_COUNTRY)
}

fn currency_for(country: &str) -> Option<String> {
    CURRENCIES
        .iter()
        .find(|(code, _)| *code == country)
        .map(|(_, currency)| currency.to_string())
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Option<Vec<AdzunaJob>>,
}

#[derive(Debug, Deserialize)]
struct AdzunaJob {
    /// String on the live API; numbers have been seen in older payloads.
    id: Option<Value>,
    title: Option<String>,
    description: Option<String>,
    redirect_url: Option<String>,
    created: Option<String>,
    location: Option<AdzunaLocation>,
    company: Option<AdzunaCompany>,
    salary_min: Option<f64>,
    salary_max: Option<f64>,
    contract_type: Option<String>,
    contract_time: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AdzunaLocation {
    display_name: Option<String>,
    #[serde(default)]
    area: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct AdzunaCompany {
    display_name: Option<String>,
}

pub struct AdzunaProvider {
    client: Client,
    base_url: String,
    app_id: String,
    app_key: String,
}

impl AdzunaProvider {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        app_id: impl Into<String>,
        app_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            app_id: app_id.into(),
            app_key: app_key.into(),
        }
    }
}

#[async_trait]
impl JobProvider for AdzunaProvider {
    fn name(&self) -> &'static str {
        SOURCE
    }

    fn composition(&self) -> CompositionRule {
        CompositionRule {
            location: LocationPlacement::Native,
            experience_inline: true,
        }
    }

    async fn fetch(&self, query: &ProviderQuery) -> Result<Vec<NormalizedJob>, ProviderError> {
        let country = route_country(query.location.as_deref())?;
        let url = format!("{}/jobs/{}/search/1", self.base_url, country);
        let per_page = query.limit.clamp(1, MAX_RESULTS_PER_PAGE).to_string();

        let mut params: Vec<(&str, &str)> = vec![
            ("app_id", self.app_id.as_str()),
            ("app_key", self.app_key.as_str()),
            ("what", query.text.as_str()),
            ("results_per_page", per_page.as_str()),
            ("sort_by", "relevance"),
        ];
        if let Some(location) = query.location.as_deref() {
            params.push(("where", location));
        }

        debug!(
            "Searching Adzuna '{}' in {:?} (country: {country})",
            query.text, query.location
        );

        let response = self.client.get(&url).query(&params).send().await?;
        let Some(body) = read_json::<SearchResponse>(response).await? else {
            return Ok(Vec::new());
        };

        let Some(results) = body.results else {
            warn!("Adzuna response had no results field for '{}'", query.text);
            return Ok(Vec::new());
        };

        Ok(results
            .into_iter()
            .take(query.limit)
            .map(|job| into_normalized(job, country))
            .collect())
    }
}

fn into_normalized(job: AdzunaJob, country_code: &str) -> NormalizedJob {
    let title = job.title.unwrap_or_default();
    let description = job.description.unwrap_or_default();

    let text = format!("{} {}", title, description).to_lowercase();
    let is_remote = REMOTE_SIGNALS.iter().any(|signal| text.contains(signal));

    let (location, city, state, country) = match job.location {
        Some(loc) => {
            let area = loc.area;
            let display = non_empty(loc.display_name)
                .or_else(|| area.first().cloned())
                .unwrap_or_default();
            let country = area.first().cloned();
            let state = if area.len() > 2 { area.get(1).cloned() } else { None };
            let city = if area.len() > 1 { area.last().cloned() } else { None };
            (display, city, state, country)
        }
        None => (String::new(), None, None, None),
    };

    let job_id = match job.id {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };

    let has_salary = job.salary_min.is_some() || job.salary_max.is_some();

    NormalizedJob {
        title,
        company: job
            .company
            .and_then(|c| c.display_name)
            .unwrap_or_default(),
        location,
        city,
        state,
        country,
        description,
        url: job.redirect_url.unwrap_or_default(),
        posted_date: job.created.as_deref().map(date_from_iso).unwrap_or_default(),
        employment_type: non_empty(job.contract_time)
            .or_else(|| non_empty(job.contract_type))
            .unwrap_or_default(),
        salary_min: job.salary_min,
        salary_max: job.salary_max,
        currency: if has_salary {
            currency_for(country_code)
        } else {
            None
        },
        is_remote,
        job_id,
        source: SOURCE.to_string(),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::time::Duration;

    use crate::providers::build_http_client;

    fn provider(server: &MockServer) -> AdzunaProvider {
        let client = build_http_client(Duration::from_secs(5)).unwrap();
        AdzunaProvider::new(client, server.url("/v1/api"), "app-id", "app-key")
    }

    fn query(text: &str, location: Option<&str>) -> ProviderQuery {
        ProviderQuery {
            text: text.to_string(),
            location: location.map(str::to_string),
            limit: 5,
            remote_only: false,
        }
    }

    #[test]
    fn test_route_country() {
        assert_eq!(route_country(None).unwrap(), "us");
        assert_eq!(route_country(Some("Berlin, Germany")).unwrap(), "de");
        assert_eq!(route_country(Some("London, UK")).unwrap(), "gb");
        assert_eq!(route_country(Some("Toronto")).unwrap(), "ca");
        assert_eq!(route_country(Some("Springfield")).unwrap(), "us");
    }

    #[test]
    fn test_unsupported_country_is_rejected() {
        let err = route_country(Some("Tel Aviv, Israel")).unwrap_err();
        assert!(matches!(err, ProviderError::UnsupportedLocation(_)));
    }

    #[tokio::test]
    async fn test_routes_and_translates_results() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/v1/api/jobs/de/search/1")
                    .query_param("app_id", "app-id")
                    .query_param("app_key", "app-key")
                    .query_param("what", "software engineer")
                    .query_param("where", "Berlin, Germany")
                    .query_param("results_per_page", "5")
                    .query_param("sort_by", "relevance");
                then.status(200).json_body(json!({
                    "results": [{
                        "id": "4711",
                        "title": "Software Engineer (Remote possible)",
                        "description": "Kotlin and Rust",
                        "redirect_url": "https://adzuna.example/4711",
                        "created": "2024-02-01T09:00:00Z",
                        "location": {
                            "display_name": "Berlin, Deutschland",
                            "area": ["Deutschland", "Berlin", "Mitte"]
                        },
                        "company": { "display_name": "Acme" },
                        "salary_min": 60000.0,
                        "salary_max": 80000.0,
                        "contract_time": "full_time"
                    }]
                }));
            })
            .await;

        let jobs = provider(&server)
            .fetch(&query("software engineer", Some("Berlin, Germany")))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(jobs.len(), 1);
        let job = &jobs[0];
        assert_eq!(job.job_id, "4711");
        assert_eq!(job.company, "Acme");
        assert_eq!(job.location, "Berlin, Deutschland");
        assert_eq!(job.country.as_deref(), Some("Deutschland"));
        assert_eq!(job.state.as_deref(), Some("Berlin"));
        assert_eq!(job.city.as_deref(), Some("Mitte"));
        assert_eq!(job.posted_date, "2024-02-01");
        assert_eq!(job.currency.as_deref(), Some("EUR"));
        assert_eq!(job.employment_type, "full_time");
        assert!(job.is_remote);
        assert_eq!(job.source, "adzuna");
    }

    #[tokio::test]
    async fn test_unsupported_location_fails_before_request() {
        // no mock registered: a request would come back 404 and yield Ok(empty)
        let server = MockServer::start_async().await;
        let provider = provider(&server);

        let result = provider
            .fetch(&query("data scientist", Some("Tel Aviv, Israel")))
            .await;
        assert!(matches!(result, Err(ProviderError::UnsupportedLocation(_))));

        let jobs = provider
            .search_jobs(&query("data scientist", Some("Tel Aviv, Israel")))
            .await;
        assert!(jobs.is_empty());
    }

    #[tokio::test]
    async fn test_quota_exhaustion_is_contained() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v1/api/jobs/us/search/1");
                then.status(429).body("quota");
            })
            .await;

        let provider = provider(&server);
        assert!(matches!(
            provider.fetch(&query("rust", None)).await,
            Err(ProviderError::RateLimited)
        ));
        assert!(provider.search_jobs(&query("rust", None)).await.is_empty());
    }

    #[tokio::test]
    async fn test_bad_credentials_are_contained() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v1/api/jobs/us/search/1");
                then.status(401);
            })
            .await;

        let provider = provider(&server);
        assert!(matches!(
            provider.fetch(&query("rust", None)).await,
            Err(ProviderError::Unauthorized { status: 401 })
        ));
    }

    #[tokio::test]
    async fn test_missing_salary_has_no_currency() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v1/api/jobs/us/search/1");
                then.status(200).json_body(json!({
                    "results": [{ "id": 9, "title": "Analyst" }]
                }));
            })
            .await;

        let jobs = provider(&server).fetch(&query("analyst", None)).await.unwrap();
        assert_eq!(jobs[0].job_id, "9");
        assert!(jobs[0].currency.is_none());
        assert_eq!(jobs[0].location, "");
    }
}
