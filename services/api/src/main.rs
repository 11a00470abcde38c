use std::time::Duration;

use sea_orm::Database;
use tracing::info;

use planner_api::config::ApiConfig;
use planner_api::router::build_router;
use planner_api::state::AppState;
use planner_api::usecase::login_token::PurgeExpiredTokensUseCase;

#[tokio::main]
async fn main() {
    planner_core::tracing::init_tracing();

    let config = ApiConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let state = AppState {
        db,
        session_secret: config.session_secret,
        base_url: config.base_url,
        secure_cookies: config.secure_cookies,
        token_retention_hours: config.token_retention_hours,
    };

    // Hourly login-token purge. Hygiene only; consume rejects expired tokens
    // regardless of whether the purge has run.
    let purge = PurgeExpiredTokensUseCase {
        tokens: state.login_token_repo(),
        retention_hours: state.token_retention_hours,
    };
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60 * 60));
        loop {
            interval.tick().await;
            match purge.execute().await {
                Ok(purged) if purged > 0 => info!(purged, "purged expired login tokens"),
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "login token purge failed"),
            }
        }
    });

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.api_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("api service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
