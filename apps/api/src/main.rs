mod applications;
mod config;
mod db;
mod errors;
mod extract;
mod matching;
mod models;
mod recommendation;
mod routes;
mod skills;
mod state;
#[cfg(test)]
mod test_support;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::applications::tracker::ApplicationTracker;
use crate::config::Config;
use crate::db::{create_pool, run_migrations, PgApplicationStore, PgCatalogStore, PgSkillStore};
use crate::recommendation::engine::RecommendationEngine;
use crate::routes::build_router;
use crate::skills::profile::SkillProfileService;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting jobboard API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL and bring the schema up to date
    let db = create_pool(&config.database_url).await?;
    run_migrations(&db).await?;

    let catalog = Arc::new(PgCatalogStore::new(db.clone()));
    let applications = Arc::new(PgApplicationStore::new(db.clone()));
    let skill_store = Arc::new(PgSkillStore::new(db));

    // Build app state
    let state = AppState {
        config: config.clone(),
        recommender: Arc::new(RecommendationEngine::new(
            catalog.clone(),
            applications.clone(),
        )),
        tracker: Arc::new(ApplicationTracker::new(catalog.clone(), applications)),
        skills: Arc::new(SkillProfileService::new(catalog, skill_store)),
    };
    info!(
        "Recommendation limits: {} jobs, {} candidates",
        config.job_recommendation_limit, config.candidate_recommendation_limit
    );

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
