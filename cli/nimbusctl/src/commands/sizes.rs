//! Size commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use nimbus_digitalocean::domain::Size;
use serde::Serialize;
use tabled::Tabled;

use crate::output::{print_output, OutputFormat};

use super::CommandContext;

/// Size commands.
#[derive(Debug, Args)]
pub struct SizesCommand {
    #[command(subcommand)]
    command: SizesSubcommand,
}

#[derive(Debug, Subcommand)]
enum SizesSubcommand {
    /// List droplet sizes.
    List,
}

impl SizesCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        match self.command {
            SizesSubcommand::List => list_sizes(ctx).await,
        }
    }
}

#[derive(Debug, Clone, Serialize, Tabled)]
struct SizeRow {
    #[tabled(rename = "Slug")]
    slug: String,

    #[tabled(rename = "vCPUs")]
    vcpus: u32,

    #[tabled(rename = "Memory (MiB)")]
    memory: u64,

    #[tabled(rename = "Disk (GiB)")]
    disk: u64,

    #[tabled(rename = "$/month")]
    price_monthly: String,

    #[tabled(rename = "Available")]
    available: bool,
}

impl From<&Size> for SizeRow {
    fn from(size: &Size) -> Self {
        Self {
            slug: size.slug.clone(),
            vcpus: size.vcpus,
            memory: size.memory,
            disk: size.disk,
            price_monthly: format!("{:.2}", size.price_monthly),
            available: size.available,
        }
    }
}

/// List sizes.
async fn list_sizes(ctx: CommandContext) -> Result<()> {
    let sizes = ctx.compute()?.list_sizes().await?;

    match ctx.format {
        OutputFormat::Table => {
            let rows: Vec<SizeRow> = sizes.iter().map(SizeRow::from).collect();
            print_output(&rows, ctx.format);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&sizes)?),
    }
    Ok(())
}
