use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use gridcast::{AppState, ForecastClient, GridcastConfig, Lifecycle, router};

#[tokio::main]
async fn main() -> Result<()> {
    let config = GridcastConfig::load().context("failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone())),
        )
        .init();

    let forecast = ForecastClient::new(&config.upstream)?;
    let state = AppState {
        forecast,
        request_budget: config.request_budget(),
    };

    let lifecycle = Lifecycle::new();
    let addr = lifecycle.start(&config.bind_addr(), router(state)).await?;

    info!(
        "Use SIGINT/Ctrl-C to stop. For example, run the following for Kansas City weather:\n\tcurl 'http://{addr}/weather?lat=39.0997&lon=-94.5786'"
    );

    shutdown_signal().await?;
    info!("shutdown signal received");

    lifecycle.stop().await
}

/// Wait for SIGINT or, on unix, SIGTERM.
async fn shutdown_signal() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut terminate =
            signal(SignalKind::terminate()).context("failed to install SIGTERM handler")?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result.context("failed to listen for SIGINT")?;
            }
            _ = terminate.recv() => {}
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .context("failed to listen for SIGINT")?;
    }

    Ok(())
}
