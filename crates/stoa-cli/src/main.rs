//! `stoa` — one-shot account reconciliation against a storefront API.
//!
//! # Usage
//!
//! ```
//! stoa --url https://shop.example/api --email customer@example.com
//! stoa --config ~/.config/stoa/config.toml --phone +15550100
//! ```

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use stoa_client::{HttpSource, SourceConfig};
use stoa_core::{source::CustomerIdentity, view::OrderView};
use stoa_engine::reconcile;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "stoa", about = "Reconcile a customer's storefront account")]
struct Args {
  /// Path to a TOML config file (url, email, phone).
  #[arg(short, long, value_name = "FILE")]
  config: Option<std::path::PathBuf>,

  /// Base URL of the upstream storefront API.
  #[arg(long, env = "STOA_URL")]
  url: Option<String>,

  /// Customer email to query orders for.
  #[arg(long, env = "STOA_EMAIL")]
  email: Option<String>,

  /// Customer phone number to query orders for.
  #[arg(long, env = "STOA_PHONE")]
  phone: Option<String>,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:   String,
  #[serde(default)]
  email: String,
  #[serde(default)]
  phone: String,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  let args = Args::parse();

  // Load config file if provided.
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let url = args
    .url
    .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
    .unwrap_or_else(|| "http://localhost:8080".to_string());

  let identity = CustomerIdentity {
    email: args
      .email
      .or_else(|| (!file_cfg.email.is_empty()).then(|| file_cfg.email.clone())),
    phone: args
      .phone
      .or_else(|| (!file_cfg.phone.is_empty()).then(|| file_cfg.phone.clone())),
  };
  if identity.validate().is_err() {
    bail!("provide --email and/or --phone (or set them in the config file)");
  }

  let source = HttpSource::new(SourceConfig { base_url: url })
    .context("building HTTP source")?;

  let snapshot = reconcile(&source, &identity).await;

  if let Some(advisory) = &snapshot.advisory {
    println!("! {advisory}");
  }

  print_section("Orders", &snapshot.orders);
  print_section("Cancelled (refund owed)", &snapshot.cancelled_prepaid);
  print_section("Eligible for return", &snapshot.returnable);

  Ok(())
}

// ─── Output ───────────────────────────────────────────────────────────────────

fn print_section(title: &str, views: &[OrderView]) {
  println!("\n{title} ({})", views.len());
  if views.is_empty() {
    println!("  (none)");
    return;
  }
  for view in views {
    let mut badges = Vec::new();
    if view.cancelled_prepaid {
      badges.push("refund owed".to_string());
    }
    if view.return_eligible {
      badges.push("returnable".to_string());
    }
    if let Some(status) = &view.latest_return_status {
      badges.push(format!("return: {status}"));
    }
    if view.return_approved {
      badges.push("return approved".to_string());
    }
    let badges = if badges.is_empty() {
      String::new()
    } else {
      format!("  [{}]", badges.join(", "))
    };

    println!(
      "  #{:<10} {:<30} {:<16} x{:<3} {:>10.2}{badges}",
      view.id, view.name, view.status, view.items_count, view.offer_price,
    );
  }
}
