use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use expense_tracker_server::{
    app, config::Config, database, state::AppState, token::TokenService,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // load environment variables
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "expense_tracker_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let db = database::init_db(&config.data_path)
        .await
        .context("Failed to initialize database")?;
    let tokens = TokenService::new(&config.token_secret, config.token_ttl);

    let bind_address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    tracing::info!("server running on http://{}", bind_address);

    axum::serve(listener, app(AppState::new(db, tokens))).await?;
    Ok(())
}
