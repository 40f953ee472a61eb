//! Authentication commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use nimbus_digitalocean::{Config as ProviderConfig, DigitalOceanClient};

use crate::output::{print_info, print_success};

use super::CommandContext;

/// Authentication commands.
#[derive(Debug, Args)]
pub struct AuthCommand {
    #[command(subcommand)]
    command: AuthSubcommand,
}

#[derive(Debug, Subcommand)]
enum AuthSubcommand {
    /// Verify a token and save it.
    Login(LoginArgs),

    /// Remove the saved token.
    Logout,

    /// Show where credentials come from.
    Status,
}

#[derive(Debug, Args)]
struct LoginArgs {
    /// API token. Falls back to --token / DIGITALOCEAN_TOKEN.
    #[arg(long = "with-token", value_name = "TOKEN")]
    token: Option<String>,
}

impl AuthCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        match self.command {
            AuthSubcommand::Login(args) => login(ctx, args).await,
            AuthSubcommand::Logout => logout(ctx).await,
            AuthSubcommand::Status => status(ctx).await,
        }
    }
}

/// Verify and save a token.
async fn login(ctx: CommandContext, args: LoginArgs) -> Result<()> {
    let Some(token) = args.token.or_else(|| ctx.token.clone()) else {
        print_info("Create a personal access token in the DigitalOcean control panel.");
        print_info("Then run `nimbus auth login --with-token <TOKEN>` or set DIGITALOCEAN_TOKEN.");
        return Ok(());
    };

    // Validate the token before saving it.
    let mut provider = ProviderConfig::new(token.clone());
    if let Some(url) = ctx.resolve_api_url() {
        provider = provider.with_api_url(url);
    }
    let keys = DigitalOceanClient::new(&provider)?.list_keys().await?;
    tracing::debug!(keys = keys.len(), "Token verified");

    let mut config = ctx.config;
    config.token = Some(token);
    if let Some(url) = ctx.api_url {
        config.api_url = Some(url);
    }
    config.save()?;

    print_success("Logged in successfully.");
    Ok(())
}

/// Remove the saved token.
async fn logout(ctx: CommandContext) -> Result<()> {
    let mut config = ctx.config;
    config.token = None;
    config.save()?;
    print_success("Logged out successfully.");
    Ok(())
}

/// Show authentication status.
async fn status(ctx: CommandContext) -> Result<()> {
    let source = if ctx.token.is_some() {
        Some("--token / DIGITALOCEAN_TOKEN")
    } else if ctx.config.token.is_some() {
        Some("saved config")
    } else {
        None
    };

    match source {
        Some(source) => {
            println!("{} Token configured ({})", "Status:".green().bold(), source);
            if let Some(url) = ctx.resolve_api_url() {
                println!("  API URL: {}", url);
            }
        }
        None => {
            println!("{} Not authenticated", "Status:".red().bold());
            println!("\nRun {} to log in.", "nimbus auth login".cyan());
        }
    }

    Ok(())
}
