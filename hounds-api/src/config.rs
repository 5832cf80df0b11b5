//! Command-line and environment configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// Hare and Hounds match server.
#[derive(Debug, Clone, Parser)]
#[command(name = "hounds-api", version, about)]
pub struct Config {
    /// Address to listen on.
    #[arg(long, env = "HOUNDS_BIND", default_value = "0.0.0.0:8000")]
    pub bind: SocketAddr,

    /// SQLite database file. Matches are kept in memory when omitted.
    #[arg(long, env = "HOUNDS_DATABASE")]
    pub database: Option<PathBuf>,

    /// Tracing filter directive, e.g. "info" or "hounds_api=debug".
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_filter: String,
}
