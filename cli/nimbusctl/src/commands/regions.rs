//! Region commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use nimbus_digitalocean::domain::Region;
use serde::Serialize;
use tabled::Tabled;

use crate::output::{print_output, OutputFormat};

use super::CommandContext;

/// Region commands.
#[derive(Debug, Args)]
pub struct RegionsCommand {
    #[command(subcommand)]
    command: RegionsSubcommand,
}

#[derive(Debug, Subcommand)]
enum RegionsSubcommand {
    /// List regions accepting new droplets.
    List,
}

impl RegionsCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        match self.command {
            RegionsSubcommand::List => list_regions(ctx).await,
        }
    }
}

#[derive(Debug, Clone, Serialize, Tabled)]
struct RegionRow {
    #[tabled(rename = "Slug")]
    slug: String,

    #[tabled(rename = "Name")]
    name: String,

    #[tabled(rename = "Features")]
    features: String,
}

impl From<&Region> for RegionRow {
    fn from(region: &Region) -> Self {
        Self {
            slug: region.slug.clone(),
            name: region.name.clone(),
            features: region.features.join(","),
        }
    }
}

/// List regions.
async fn list_regions(ctx: CommandContext) -> Result<()> {
    let regions = ctx.compute()?.list_regions().await?;

    match ctx.format {
        OutputFormat::Table => {
            let rows: Vec<RegionRow> = regions.iter().map(RegionRow::from).collect();
            print_output(&rows, ctx.format);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&regions)?),
    }
    Ok(())
}
