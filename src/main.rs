use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ekin::{
    api::{create_router, AppState},
    clock::{Clock, SystemClock},
    config::Config,
    db::{self, SessionRepository},
    error::AppError,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,ekin=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting ekin server v{}", env!("CARGO_PKG_VERSION"));

    let config = Arc::new(Config::from_env()?);
    tracing::info!("Configuration loaded");

    let pool = db::connect(&config).await?;
    tracing::info!("Database connected: {}", config.database_url);

    db::MIGRATOR.run(&pool).await?;
    tracing::info!("Database migrations completed");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let purged = SessionRepository::cleanup_expired(&pool, clock.now().timestamp()).await?;
    tracing::debug!(purged, "Expired sessions removed");

    let state = AppState::new(pool, config.clone(), clock);
    let app = create_router(state);

    let addr = config.server_address();
    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("  POST /api/auth/signup     - Create account");
    tracing::info!("  POST /api/auth/login      - Log in by email and password");
    tracing::info!("  GET  /api/updates?week=   - Team feed for a week");
    tracing::info!("  GET  /api/updates/me      - Own update for a week");
    tracing::info!("  POST /api/updates         - Save draft or publish this week's update");
    tracing::info!("  GET  /api/users/:username - Public profile and history");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to bind to {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Internal(format!("Server error: {}", e)))?;

    Ok(())
}
