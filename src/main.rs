use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use sirius_user_management::args::Args;
use sirius_user_management::config::{self, LoggingConfig};
use sirius_user_management::server;
use sirius_user_management::sirius::Client;
use sirius_user_management::templates::PageShell;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so PORT, SIRIUS_URL etc. can live there
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    let config = args.apply(config::config().clone());

    init_tracing(&config.logging);
    tracing::info!(
        environment = ?config.environment,
        sirius = %config.sirius.url,
        prefix = %config.server.prefix,
        "starting user management"
    );

    let client = Client::from_config(&config.sirius).context("failed to build platform client")?;
    let app = server::app(Arc::new(client), Arc::new(PageShell), &config);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    tracing::info!("listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.filter));

    if logging.json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
