use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "gosd")]
#[command(author, version, about = "Device policy API front")]
pub struct Cli {
    #[command(flatten)]
    pub overrides: Overrides,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load and validate the configuration, print it as TOML and exit
    CheckConfig,
}

/// Flags that take precedence over file and environment configuration.
#[derive(Args, Debug, Default)]
pub struct Overrides {
    /// Configuration file (.toml or .json). Defaults to ./gosd.toml if present
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Address to listen on, e.g. 127.0.0.1:3000
    #[arg(long, global = true)]
    pub addr: Option<String>,

    /// Log filter directive, e.g. "info" or "gosd_server=debug"
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Human-readable logs instead of JSON
    #[arg(long, global = true)]
    pub pretty: bool,
}
