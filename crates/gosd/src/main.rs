//! gosd: the device policy API front.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use gosd_config::{ConfigLoader, GosdConfig, LogFormat};
use gosd_core::{Handlers, StaticPolicy};
use gosd_server::{Server, ServerConfig};

use crate::cli::{Cli, Commands, Overrides};

const DEFAULT_CONFIG_FILE: &str = "gosd.toml";
const ENV_PREFIX: &str = "GOSD";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli.overrides)?;

    if let Some(Commands::CheckConfig) = cli.command {
        print!("{}", config.to_toml().context("failed to render configuration")?);
        return Ok(());
    }

    gosd_telemetry::init_logging(&config.logging.to_log_config())
        .context("failed to initialise logging")?;

    let policy = match config.policy.path.as_deref() {
        Some(path) => StaticPolicy::from_file(path)
            .with_context(|| format!("failed to load policy document {path}"))?,
        None => {
            tracing::info!("no policy file configured, serving built-in policy");
            StaticPolicy::builtin()
        }
    };

    let server = Server::new(server_config(&config), Handlers::with_policy(policy));
    server.run().await.context("server failed")?;
    Ok(())
}

/// Defaults, then the config file, `.env` and `GOSD__*` variables, then flags.
fn load_config(overrides: &Overrides) -> Result<GosdConfig> {
    let loader = match &overrides.config {
        Some(path) => ConfigLoader::new()
            .with_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => ConfigLoader::new()
            .with_optional_file(DEFAULT_CONFIG_FILE)
            .with_context(|| format!("failed to load {DEFAULT_CONFIG_FILE}"))?,
    };

    let mut config = loader
        .with_dotenv()
        .with_env_prefix(ENV_PREFIX)
        .load()
        .context("invalid configuration")?;

    apply_overrides(&mut config, overrides);
    config.validate().context("invalid command line override")?;
    Ok(config)
}

fn apply_overrides(config: &mut GosdConfig, overrides: &Overrides) {
    if let Some(addr) = &overrides.addr {
        config.server.http_addr.clone_from(addr);
    }
    if let Some(level) = &overrides.log_level {
        config.logging.level.clone_from(level);
    }
    if overrides.pretty {
        config.logging.format = LogFormat::Pretty;
        config.logging.ansi_enabled = true;
    }
}

fn server_config(config: &GosdConfig) -> ServerConfig {
    ServerConfig::builder()
        .http_addr(config.server.http_addr.as_str())
        .api_prefix(config.server.api_prefix.as_str())
        .shutdown_timeout(config.server.shutdown_timeout())
        .request_timeout(config.server.request_timeout())
        .build()
}
