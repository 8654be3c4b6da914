mod config;
mod errors;
mod models;
mod providers;
mod routes;
mod search;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::providers::adzuna::AdzunaProvider;
use crate::providers::arbeitnow::ArbeitnowProvider;
use crate::providers::jsearch::JSearchProvider;
use crate::providers::{build_http_client, JobProvider};
use crate::routes::build_router;
use crate::search::orchestrator::{JobSearchEngine, ProviderSet, SearchSettings};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting JobScout API v{}", env!("CARGO_PKG_VERSION"));

    // One HTTP client shared by every provider
    let client = build_http_client(Duration::from_secs(config.provider_timeout_secs))?;

    let primary: Arc<dyn JobProvider> = Arc::new(ArbeitnowProvider::new(
        client.clone(),
        config.arbeitnow_base_url.clone(),
    ));

    let secondary: Option<Arc<dyn JobProvider>> = match &config.adzuna {
        Some(credentials) => Some(Arc::new(AdzunaProvider::new(
            client.clone(),
            config.adzuna_base_url.clone(),
            credentials.app_id.clone(),
            credentials.app_key.clone(),
        ))),
        None => {
            warn!("ADZUNA_APP_ID/ADZUNA_APP_KEY not set, secondary provider disabled");
            None
        }
    };

    let jsearch = match &config.jsearch_api_key {
        Some(api_key) => Some(Arc::new(JSearchProvider::new(
            client.clone(),
            config.jsearch_base_url.clone(),
            api_key.clone(),
            config.jsearch_host.clone(),
            config.jsearch_max_pages,
        ))),
        None => {
            warn!("JSEARCH_API_KEY not set, tertiary provider and job details disabled");
            None
        }
    };
    let tertiary = jsearch
        .clone()
        .map(|provider| provider as Arc<dyn JobProvider>);

    let settings = SearchSettings {
        deadline: Duration::from_secs(config.search_deadline_secs),
    };
    info!(
        "Search engine ready (provider timeout {}s, search deadline {}s)",
        config.provider_timeout_secs, config.search_deadline_secs
    );

    // Build app state
    let state = AppState {
        engine: Arc::new(JobSearchEngine::new(
            ProviderSet {
                primary,
                secondary,
                tertiary,
            },
            settings,
        )),
        details: jsearch,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
