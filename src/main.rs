use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use sous_api::config::Config;
use sous_api::db::{self, Cache, PostgresStore};
use sous_api::routes::{create_router, AppState};
use sous_api::services::providers::openai::OpenAiProvider;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Database
    let pool = db::create_pool(&config.database_url).await?;
    sqlx::migrate!().run(&pool).await?;
    tracing::info!("Database migrations applied");

    // Cache + generation provider
    let redis_client = db::create_redis_client(&config.redis_url)?;
    let cache = Cache::new(redis_client);
    let provider = OpenAiProvider::new(
        cache,
        config.generation_api_key.clone(),
        config.generation_api_url.clone(),
        config.generation_model.clone(),
    );

    let state = AppState {
        store: Arc::new(PostgresStore::new(pool)),
        provider: Arc::new(provider),
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "sous-api listening");
    axum::serve(listener, app).await?;

    Ok(())
}
