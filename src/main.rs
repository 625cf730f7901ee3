use anyhow::Context;
use tenantchat::{app, AppState, Config};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    std::fs::create_dir_all(&config.db_base_path)
        .with_context(|| format!("creating {}", config.db_base_path.display()))?;

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, base = %config.db_base_path.display(), "listening");

    axum::serve(listener, app(AppState { config })).await?;
    Ok(())
}
