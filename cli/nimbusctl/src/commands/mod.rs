//! CLI commands.

mod auth;
mod droplets;
mod images;
mod keys;
mod regions;
mod sizes;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use nimbus_digitalocean::{ComputeAdapter, Config as ProviderConfig, DigitalOceanClient};

use crate::config::Config;
use crate::error::CliError;
use crate::output::OutputFormat;

/// nimbus - manage cloud compute resources and wait for them to settle.
#[derive(Debug, Parser)]
#[command(name = "nimbus")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Log progress of API calls and polling to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// API endpoint URL.
    #[arg(long, global = true, env = "DIGITALOCEAN_API_URL")]
    api_url: Option<String>,

    /// API token. Overrides the token saved by `nimbus auth login`.
    #[arg(long, global = true, env = "DIGITALOCEAN_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Save or clear API credentials.
    Auth(auth::AuthCommand),

    /// Manage droplets.
    Droplets(droplets::DropletsCommand),

    /// Manage images and snapshots.
    Images(images::ImagesCommand),

    /// List droplet sizes.
    Sizes(sizes::SizesCommand),

    /// List regions.
    Regions(regions::RegionsCommand),

    /// Manage SSH keys.
    Keys(keys::KeysCommand),

    /// Show CLI version.
    Version,
}

impl Cli {
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Run the CLI command.
    pub async fn run(self) -> Result<()> {
        let config = Config::load()?;

        let ctx = CommandContext {
            config,
            format: self.format,
            api_url: self.api_url,
            token: self.token,
        };

        match self.command {
            Commands::Auth(cmd) => cmd.run(ctx).await,
            Commands::Droplets(cmd) => cmd.run(ctx).await,
            Commands::Images(cmd) => cmd.run(ctx).await,
            Commands::Sizes(cmd) => cmd.run(ctx).await,
            Commands::Regions(cmd) => cmd.run(ctx).await,
            Commands::Keys(cmd) => cmd.run(ctx).await,
            Commands::Version => {
                println!("nimbus {}", env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

/// Shared command context.
pub struct CommandContext {
    pub config: Config,
    pub format: OutputFormat,
    pub api_url: Option<String>,
    pub token: Option<String>,
}

impl CommandContext {
    /// Resolve the token, preferring flag/env over the saved config.
    pub fn resolve_token(&self) -> Option<&str> {
        self.token.as_deref().or(self.config.token.as_deref())
    }

    /// Resolve the API URL, preferring flag/env over the saved config.
    pub fn resolve_api_url(&self) -> Option<&str> {
        self.api_url.as_deref().or(self.config.api_url.as_deref())
    }

    /// Provider configuration for this invocation.
    pub fn provider_config(&self) -> Result<ProviderConfig> {
        let token = self.resolve_token().ok_or(CliError::NotAuthenticated)?;
        let mut config = ProviderConfig::new(token)
            .apply_env()
            .context("Invalid provider configuration")?;

        if let Some(url) = self.resolve_api_url() {
            config = config.with_api_url(url);
        }

        Ok(config)
    }

    /// Get an authenticated API client.
    pub fn client(&self) -> Result<DigitalOceanClient> {
        Ok(DigitalOceanClient::new(&self.provider_config()?)?)
    }

    /// Get a compute adapter with the configured poll timing.
    pub fn compute(&self) -> Result<ComputeAdapter> {
        self.compute_with(|config| config)
    }

    /// Like [`compute`](Self::compute), with a final adjustment to the configuration.
    pub fn compute_with(
        &self,
        adjust: impl FnOnce(ProviderConfig) -> ProviderConfig,
    ) -> Result<ComputeAdapter> {
        let config = adjust(self.provider_config()?);
        Ok(ComputeAdapter::from_config(&config)?)
    }
}
