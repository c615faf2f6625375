//! Storyloom tale service API server entry point.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use storyloom_api::config::Config;
use storyloom_api::error::AppError;
use storyloom_api::state::AppState;
use storyloom_catalog::application::catalog_cache::ComponentCatalogCache;
use storyloom_core::clock::{Clock, SystemClock};
use storyloom_generator::HttpTaleGenerator;
use storyloom_store::{MIGRATOR, PgCatalogRepository, PgProfileRepository, PgTaleRepository};
use storyloom_tales::application::orchestrator::GenerationOrchestrator;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = Config::from_env()?;
    let telemetry = storyloom_api::telemetry::init(config.otlp_endpoint.as_deref())?;

    let result = run(config).await;
    if let Err(e) = &result {
        tracing::error!(error = %e, "server exited with error");
    }

    telemetry.shutdown();
    result
}

async fn run(config: Config) -> Result<(), AppError> {
    tracing::info!("Starting Storyloom API server");

    // Create database connection pool and bring the schema up to date.
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await?;
    MIGRATOR.run(&pool).await.map_err(sqlx::Error::from)?;

    // Build application state.
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let tale_repository = Arc::new(PgTaleRepository::new(pool.clone()));
    let profile_repository = Arc::new(PgProfileRepository::new(pool.clone()));
    let catalog_repository = Arc::new(PgCatalogRepository::new(pool));
    let generator = Arc::new(
        HttpTaleGenerator::new(config.generator_url.clone())
            .with_deadline(config.generator_timeout),
    );

    let catalog = ComponentCatalogCache::with_ttl(
        catalog_repository,
        Arc::clone(&clock),
        config.catalog_cache_ttl,
    );
    let orchestrator =
        GenerationOrchestrator::new(tale_repository.clone(), generator, Arc::clone(&clock))
            .with_deadline(config.generator_timeout);
    let app_state = AppState::new(
        clock,
        tale_repository,
        profile_repository,
        catalog,
        orchestrator,
    );
    let orchestrator = Arc::clone(&app_state.orchestrator);

    // TODO: Replace CorsLayer::permissive() with the web client's origin once it is deployed.
    let app = storyloom_api::app(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server.
    let addr = config.bind_address()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!(
        in_flight = orchestrator.in_flight(),
        "waiting for running generations to settle"
    );
    orchestrator.drain().await;
    tracing::info!("shutdown complete");

    Ok(())
}

/// Resolves on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
