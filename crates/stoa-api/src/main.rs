//! stoa account API server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), builds the
//! HTTP source for the configured upstream storefront API, and serves
//! the reconciled account collections under `/api`.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use serde::Deserialize;
use stoa_client::{HttpSource, SourceConfig};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "stoa account API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

/// Runtime server configuration, deserialised from `config.toml` with
/// `STOA_*` environment overrides.
#[derive(Deserialize, Clone)]
struct ServerConfig {
  host:         String,
  port:         u16,
  /// Base URL of the upstream storefront order/returns API.
  upstream_url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("STOA"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let source = HttpSource::new(SourceConfig {
    base_url: server_cfg.upstream_url.clone(),
  })
  .context("failed to build upstream HTTP source")?;

  let app = axum::Router::new()
    .nest("/api", stoa_api::account_router(Arc::new(source)))
    .layer(TraceLayer::new_for_http());

  let addr = format!("{}:{}", server_cfg.host, server_cfg.port);
  let listener = TcpListener::bind(&addr)
    .await
    .with_context(|| format!("failed to bind {addr}"))?;

  tracing::info!(%addr, upstream = %server_cfg.upstream_url, "serving account API");
  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
