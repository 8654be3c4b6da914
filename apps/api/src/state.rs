use std::sync::Arc;

use crate::providers::jsearch::JSearchProvider;
use crate::search::orchestrator::JobSearchEngine;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<JobSearchEngine>,
    /// Source for extended job records. `None` when no JSearch key is configured.
    pub details: Option<Arc<JSearchProvider>>,
}
