use anyhow::Context;

use flow_api::config::{self, AppConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // `.env` must be applied before the subscriber reads RUST_LOG.
    let dotenv = config::load_dotenv();

    flow_observability::init();

    match dotenv {
        Ok(path) => tracing::info!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => tracing::info!("no .env file; using process environment"),
        Err(e) => tracing::warn!(error = %e, "failed to load .env"),
    }

    let config = AppConfig::from_env().context("invalid configuration")?;
    let app = flow_api::app::build_app(&config);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
