//! In-memory providers for engine and handler tests.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::models::job::NormalizedJob;
use crate::providers::{
    CompositionRule, JobProvider, LocationPlacement, ProviderError, ProviderQuery,
};

#[derive(Debug, Clone, Copy)]
pub enum FakeFailure {
    RateLimited,
    Transport,
}

/// Returns a fixed batch and records every query it receives.
pub struct FakeProvider {
    name: &'static str,
    rule: CompositionRule,
    jobs: Vec<NormalizedJob>,
    delay: Option<Duration>,
    failure: Option<FakeFailure>,
    queries: Mutex<Vec<ProviderQuery>>,
}

impl FakeProvider {
    pub fn new(name: &'static str, jobs: Vec<NormalizedJob>) -> Self {
        Self {
            name,
            rule: CompositionRule {
                location: LocationPlacement::Inline,
                experience_inline: true,
            },
            jobs,
            delay: None,
            failure: None,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn with_rule(mut self, location: LocationPlacement, experience_inline: bool) -> Self {
        self.rule = CompositionRule {
            location,
            experience_inline,
        };
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn failing(mut self, failure: FakeFailure) -> Self {
        self.failure = Some(failure);
        self
    }

    pub fn queries(&self) -> Vec<ProviderQuery> {
        self.queries.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

#[async_trait]
impl JobProvider for FakeProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    fn composition(&self) -> CompositionRule {
        self.rule
    }

    async fn fetch(&self, query: &ProviderQuery) -> Result<Vec<NormalizedJob>, ProviderError> {
        self.queries.lock().unwrap().push(query.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.failure {
            Some(FakeFailure::RateLimited) => Err(ProviderError::RateLimited),
            Some(FakeFailure::Transport) => {
                Err(ProviderError::Upstream("connection reset".to_string()))
            }
            None => Ok(self.jobs.clone()),
        }
    }
}

/// A job with the fields the filters look at.
pub fn job(
    source: &str,
    job_id: &str,
    title: &str,
    location: &str,
    description: &str,
) -> NormalizedJob {
    NormalizedJob {
        title: title.to_string(),
        company: format!("{title} Co"),
        location: location.to_string(),
        description: description.to_string(),
        job_id: job_id.to_string(),
        source: source.to_string(),
        ..Default::default()
    }
}
