use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use voyage_api::{
    api::{create_router, load_trending, AppState},
    config::Config,
    services::{providers::GeminiProvider, SuggestionService},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("voyage_api=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let provider = GeminiProvider::from_config(&config);
    tracing::info!(model = %config.gemini_model, "Using Gemini provider");

    let state = AppState::new(Arc::new(SuggestionService::new(Arc::new(provider))));

    // Trending runs once, independently of any search
    tokio::spawn(load_trending(state.clone()));

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!(address = %config.bind_address(), "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
