//! Items API
//!
//! JSON CRUD over a single `items` collection, backed by MongoDB and
//! instrumented with OpenTelemetry spans.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ request id ─▶ request span ─▶ timeout ─▶ router
//!                                                                │
//!                                                                ▼
//!                                              handler span ─▶ ItemStore
//!                                                                │
//!     Client Response                                            ▼
//!     ◀────────────── JSON body / ApiError ◀──────────────── MongoDB
//! ```
//!
//! Configuration comes from an optional TOML file (`--config`) with
//! `MONGO_URI`, `JAEGER_AGENT_HOST`, `JAEGER_AGENT_PORT` and
//! `ITEMS_API_BIND` overriding it.

use std::path::PathBuf;

use clap::Parser;

use items_api::config::load_config;
use items_api::lifecycle;

#[derive(Parser)]
#[command(name = "items-api")]
#[command(about = "JSON CRUD API over a MongoDB items collection", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "ITEMS_API_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;
    lifecycle::run(config).await?;
    Ok(())
}
