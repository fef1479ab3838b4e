//! # chartdoc
//!
//! Chart image and PDF report rendering service.

use std::net::SocketAddr;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use chartdoc_server::artifacts::spawn_reaper;
use chartdoc_server::metrics;
use chartdoc_server::{router, AppState, ServerConfig};

/// Initialize structured tracing with optional JSON format.
///
/// Set `RUST_LOG` to control log levels
/// (default: info,chartdoc_server=debug,chartdoc_renderer=debug,tower_http=debug).
/// Set `RUST_LOG_FORMAT=json` for JSON output (recommended for production).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info,chartdoc_server=debug,chartdoc_renderer=debug,tower_http=debug")
    });

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true);

    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let config = ServerConfig::parse();

    let metrics_handle = metrics::init_metrics()
        .map_err(|e| anyhow::anyhow!("Failed to initialize Prometheus metrics: {}", e))?;
    tracing::info!("Prometheus metrics initialized");

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid bind address {}:{}: {}", config.host, config.port, e))?;

    let reap_interval = config.reap_interval();
    let state = AppState::new(config).await?.with_metrics(metrics_handle);

    if let Some(interval) = reap_interval {
        spawn_reaper(state.stores(), interval);
        tracing::info!(interval_secs = interval.as_secs(), "Artifact reaper started");
    }

    tracing::info!(
        assets = %state.config.assets_dir.display(),
        public_url = %state.config.base_url(),
        "Serving artifacts"
    );

    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("chartdoc server starting on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
