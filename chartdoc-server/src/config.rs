//! Service configuration.
//!
//! Every option can come from a flag or from the environment, so the service
//! runs unchanged from a `.env`-style deployment.

use std::path::PathBuf;
use std::time::Duration;

use chartdoc_renderer::RendererConfig;
use clap::Parser;

/// Default listen port.
pub const DEFAULT_PORT: u16 = 4000;
/// Default artifact retention: 24 hours.
pub const DEFAULT_MAX_FILE_AGE_MS: u64 = 86_400_000;
/// Default request body limit: 50 MiB.
pub const DEFAULT_MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

/// Command-line and environment configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "chartdoc")]
#[command(about = "Chart image and PDF report rendering service")]
#[command(version)]
pub struct ServerConfig {
    /// Interface to bind.
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind.
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Public base URL artifacts are linked under. Defaults to
    /// `http://{host}:{port}`.
    #[arg(long = "public-url", env = "URL")]
    pub public_url: Option<String>,

    /// Directory holding `reports/` and `documents/`; served at `/assets`.
    #[arg(long, env = "ASSETS_DIR", default_value = "assets")]
    pub assets_dir: PathBuf,

    /// Artifact retention in milliseconds.
    #[arg(long = "max-file-age", env = "MAX_FILE_AGE", default_value_t = DEFAULT_MAX_FILE_AGE_MS)]
    pub max_file_age_ms: u64,

    /// Seconds between background reaper sweeps; 0 disables the sweep.
    #[arg(long, env = "REAP_INTERVAL_SECS", default_value_t = 3600)]
    pub reap_interval_secs: u64,

    /// Per-chart render deadline in milliseconds; 0 disables the deadline.
    #[arg(long, env = "RENDER_TIMEOUT_MS", default_value_t = 30_000)]
    pub render_timeout_ms: u64,

    /// Largest accepted request body in bytes.
    #[arg(long, env = "MAX_BODY_BYTES", default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            public_url: None,
            assets_dir: PathBuf::from("assets"),
            max_file_age_ms: DEFAULT_MAX_FILE_AGE_MS,
            reap_interval_secs: 3600,
            render_timeout_ms: 30_000,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl ServerConfig {
    /// Defaults with artifacts under `assets_dir`.
    #[must_use]
    pub fn with_assets_dir(assets_dir: impl Into<PathBuf>) -> Self {
        Self {
            assets_dir: assets_dir.into(),
            ..Self::default()
        }
    }

    /// Base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> String {
        match &self.public_url {
            Some(url) if !url.trim().is_empty() => url.trim().trim_end_matches('/').to_string(),
            _ => format!("http://{}:{}", self.host, self.port),
        }
    }

    /// Where chart images are written.
    #[must_use]
    pub fn reports_dir(&self) -> PathBuf {
        self.assets_dir.join("reports")
    }

    /// Where PDFs are written.
    #[must_use]
    pub fn documents_dir(&self) -> PathBuf {
        self.assets_dir.join("documents")
    }

    /// Artifact retention window.
    #[must_use]
    pub fn max_file_age(&self) -> Duration {
        Duration::from_millis(self.max_file_age_ms)
    }

    /// Interval of the background sweep, if enabled.
    #[must_use]
    pub fn reap_interval(&self) -> Option<Duration> {
        (self.reap_interval_secs > 0).then(|| Duration::from_secs(self.reap_interval_secs))
    }

    /// Render deadline, if enabled.
    #[must_use]
    pub fn render_timeout(&self) -> Option<Duration> {
        (self.render_timeout_ms > 0).then(|| Duration::from_millis(self.render_timeout_ms))
    }

    /// Renderer settings derived from this configuration.
    #[must_use]
    pub fn renderer_config(&self) -> RendererConfig {
        RendererConfig {
            render_timeout: self.render_timeout(),
            ..RendererConfig::default()
        }
    }
}
