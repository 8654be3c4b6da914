//! Job-board providers: one adapter per integration behind the `JobProvider` trait.
//!
//! Adapters own their auth, paging and response translation. Containment is
//! structural: `fetch` returns a `Result`, and the provided `search_jobs` turns every
//! error into an empty batch after logging it. Nothing an adapter does can abort a
//! search.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::models::job::NormalizedJob;

pub mod adzuna;
pub mod arbeitnow;
pub mod jsearch;

#[cfg(test)]
pub mod testing;

const USER_AGENT: &str = concat!("jobscout/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("provider rejected credentials (status {status})")]
    Unauthorized { status: u16 },

    #[error("provider quota exhausted")]
    RateLimited,

    #[error("provider reported an error: {0}")]
    Upstream(String),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("location '{0}' is outside this provider's coverage")]
    UnsupportedLocation(String),
}

impl ProviderError {
    /// Auth and quota failures: operators need to see these.
    pub fn is_access_failure(&self) -> bool {
        matches!(
            self,
            ProviderError::Unauthorized { .. } | ProviderError::RateLimited
        )
    }
}

/// Where a provider wants the requested location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationPlacement {
    /// Appended to the query text (the native parameter is unreliable).
    Inline,
    /// Passed out-of-band in `ProviderQuery::location`.
    Native,
    /// Not sent at all; location relevance is left to the filters.
    Omit,
}

/// How the query composer should build text for a given provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompositionRule {
    pub location: LocationPlacement,
    /// Append the experience phrase for well-covered locations.
    pub experience_inline: bool,
}

/// A provider-bound query after composition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderQuery {
    pub text: String,
    /// Native location parameter, only set for `LocationPlacement::Native`.
    pub location: Option<String>,
    pub limit: usize,
    /// The caller is not tied to a place; providers with a remote switch should use it.
    pub remote_only: bool,
}

#[async_trait]
pub trait JobProvider: Send + Sync {
    /// Value written to `NormalizedJob::source`.
    fn name(&self) -> &'static str;

    fn composition(&self) -> CompositionRule;

    /// One request against the provider, errors included.
    async fn fetch(&self, query: &ProviderQuery) -> Result<Vec<NormalizedJob>, ProviderError>;

    /// `fetch` with every failure converted to an empty batch.
    async fn search_jobs(&self, query: &ProviderQuery) -> Vec<NormalizedJob> {
        match self.fetch(query).await {
            Ok(jobs) => {
                debug!("{} returned {} jobs for '{}'", self.name(), jobs.len(), query.text);
                jobs
            }
            Err(e) if e.is_access_failure() => {
                error!("{} unavailable: {e}", self.name());
                Vec::new()
            }
            Err(e) => {
                warn!("{} search failed: {e}", self.name());
                Vec::new()
            }
        }
    }
}

/// Shared HTTP client for all adapters. `timeout` bounds every provider request.
pub fn build_http_client(timeout: Duration) -> Result<Client, ProviderError> {
    Ok(Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()?)
}

/// Maps the response status and decodes the body.
///
/// 404 means "nothing here" and yields `Ok(None)`.
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: Response,
) -> Result<Option<T>, ProviderError> {
    let status = response.status();

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            return Err(ProviderError::Unauthorized {
                status: status.as_u16(),
            })
        }
        StatusCode::TOO_MANY_REQUESTS => return Err(ProviderError::RateLimited),
        StatusCode::NOT_FOUND => return Ok(None),
        _ => {}
    }

    let body = response.text().await?;
    if !status.is_success() {
        return Err(ProviderError::Status {
            status: status.as_u16(),
            body,
        });
    }

    Ok(Some(serde_json::from_str(&body)?))
}

/// Unix seconds → `YYYY-MM-DD`; empty when out of range.
pub(crate) fn date_from_unix(secs: i64) -> String {
    DateTime::from_timestamp(secs, 0)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// RFC 3339, naive datetime or plain date → `YYYY-MM-DD`; empty when unparseable.
pub(crate) fn date_from_iso(raw: &str) -> String {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.date_naive().format("%Y-%m-%d").to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.date().format("%Y-%m-%d").to_string();
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Trimmed owned string, `None` when blank.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_from_unix() {
        assert_eq!(date_from_unix(1_700_000_000), "2023-11-14");
    }

    #[test]
    fn test_date_from_iso_variants() {
        assert_eq!(date_from_iso("2024-03-05T10:15:00Z"), "2024-03-05");
        assert_eq!(date_from_iso("2024-03-05T10:15:00.000Z"), "2024-03-05");
        assert_eq!(date_from_iso("2024-03-05T10:15:00"), "2024-03-05");
        assert_eq!(date_from_iso("2024-03-05"), "2024-03-05");
    }

    #[test]
    fn test_unparseable_dates_degrade_to_empty() {
        assert_eq!(date_from_iso("last tuesday"), "");
        assert_eq!(date_from_iso(""), "");
    }

    #[test]
    fn test_access_failures() {
        assert!(ProviderError::RateLimited.is_access_failure());
        assert!(ProviderError::Unauthorized { status: 401 }.is_access_failure());
        assert!(!ProviderError::Upstream("x".to_string()).is_access_failure());
    }

    #[test]
    fn test_non_empty_trims() {
        assert_eq!(non_empty(Some("  x ".to_string())), Some("x".to_string()));
        assert_eq!(non_empty(Some("   ".to_string())), None);
        assert_eq!(non_empty(None), None);
    }
}
