//! spa-proxy
//!
//! Fronts a single-page application served from a sub-path of a remote
//! application server.
//!
//! # Architecture Overview
//!
//! ```text
//!                          ┌────────────────────────────────────────────────┐
//!                          │                   SPA PROXY                    │
//!                          │                                                │
//!     Client Request       │  ┌─────────┐    ┌─────────────┐    ┌─────────┐ │
//!     ─────────────────────┼─▶│  http   │───▶│   routing   │───▶│ reqwest │─┼──▶ Remote
//!                          │  │ server  │    │ entry point │    │   or    │ │    Server
//!                          │  └─────────┘    │ classifier  │    │   ws    │ │
//!                          │       ▲         │  resolver   │    │ client  │ │
//!     Client Response      │       │         └─────────────┘    └────┬────┘ │
//!     ◀────────────────────┼───────┴─────────────────────────────────┘      │
//!                          │                                                │
//!                          │  config · lifecycle · observability            │
//!                          └────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use spa_proxy::lifecycle::{self, StartupOptions};

#[derive(Parser)]
#[command(name = "spa-proxy", version)]
#[command(about = "Reverse proxy for single-page applications hosted under a sub-path", long_about = None)]
struct Cli {
    /// Settings file (JSON, or TOML with a .toml extension).
    #[arg(short, long, default_value = "settings.json")]
    config: PathBuf,

    /// Listening host, overrides proxy_server.host.
    #[arg(long)]
    host: Option<String>,

    /// Listening port, overrides proxy_server.port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Log filter, overrides observability.log_level.
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let options = StartupOptions {
        config_path: cli.config,
        host: cli.host,
        port: cli.port,
        log_level: cli.log_level,
    };

    match lifecycle::run(options).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("spa-proxy: {e}");
            ExitCode::FAILURE
        }
    }
}
