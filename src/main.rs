use std::sync::Arc;

mod app;
mod auth;
mod config;
mod db;
mod error;
mod posts;
mod state;
#[cfg(test)]
mod test_support;
mod validation;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "inkwell=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = Arc::new(config::AppConfig::from_env()?);
    if config.jwt.ttl_minutes.is_none() {
        tracing::warn!("JWT_TTL_MINUTES not set; issued tokens never expire");
    }

    let pool = db::connect(&config.database_url, config.max_connections).await?;
    db::migrate(&pool).await?;

    let state = state::AppState::postgres(pool, config);
    app::serve(app::build_app(state)).await
}
