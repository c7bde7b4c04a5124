use std::sync::Arc;

use anyhow::Context;
use tokengate_api::config::AppConfig;
use tokengate_users::{InMemoryUserRepository, UserRepository};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; real environment variables still apply.
    let _ = dotenvy::dotenv();

    let config = AppConfig::from_env().context("failed to load configuration")?;
    tokengate_observability::init(config.log_format);

    let users: Arc<dyn UserRepository> = if config.seed_users {
        Arc::new(InMemoryUserRepository::seeded())
    } else {
        Arc::new(InMemoryUserRepository::new())
    };

    let app = tokengate_api::app::build_app(&config, users);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(
        addr = %listener.local_addr()?,
        token_ttl_secs = config.token_ttl.num_seconds(),
        "listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c; running until killed");
        std::future::pending::<()>().await;
    }
}
