//! Droplet commands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use nimbus_digitalocean::domain::{Droplet, DropletSpec};
use nimbus_id::{DropletId, ImageId, KeyId, ResourceRef};
use serde::Serialize;
use tabled::Tabled;

use crate::error::CliError;
use crate::output::{
    colored_status, display_option, print_info, print_output, print_single, print_success,
    OutputFormat,
};

use super::CommandContext;

/// Droplet commands.
#[derive(Debug, Args)]
pub struct DropletsCommand {
    #[command(subcommand)]
    command: DropletsSubcommand,
}

#[derive(Debug, Subcommand)]
enum DropletsSubcommand {
    /// List droplets.
    List(ListDropletsArgs),

    /// Get droplet details.
    Get(DropletArg),

    /// Create a droplet and wait until it is active.
    Create(CreateDropletArgs),

    /// Delete a droplet and wait until it is gone.
    Delete(DeleteDropletArgs),

    /// Power a droplet on and wait until it is active.
    PowerOn(DropletArg),

    /// Power a droplet off and wait until it is off.
    PowerOff(DropletArg),

    /// Gracefully shut a droplet down and wait until it is off.
    Shutdown(DropletArg),

    /// Reboot a droplet and wait until it is active again.
    Reboot(DropletArg),

    /// Hard-reset a droplet and wait until it is active again.
    PowerCycle(DropletArg),
}

#[derive(Debug, Args)]
struct ListDropletsArgs {
    /// Only show these droplet IDs.
    #[arg(long = "id", value_name = "ID")]
    ids: Vec<DropletId>,
}

#[derive(Debug, Args)]
struct DropletArg {
    /// Droplet ID.
    droplet: DropletId,
}

#[derive(Debug, Args)]
struct CreateDropletArgs {
    /// Droplet name.
    #[arg(long)]
    name: String,

    /// Region slug (e.g. nyc3).
    #[arg(long)]
    region: String,

    /// Size slug (e.g. s-1vcpu-1gb).
    #[arg(long)]
    size: String,

    /// Image ID or slug.
    #[arg(long)]
    image: ResourceRef<ImageId>,

    /// SSH key ID or fingerprint. Repeatable.
    #[arg(long = "ssh-key", value_name = "KEY")]
    ssh_keys: Vec<ResourceRef<KeyId>>,

    /// Enable automated backups.
    #[arg(long)]
    backups: bool,

    /// Enable IPv6.
    #[arg(long)]
    ipv6: bool,

    /// Enable private networking.
    #[arg(long)]
    private_networking: bool,

    /// File with cloud-init user data.
    #[arg(long)]
    user_data_file: Option<PathBuf>,

    /// Tag to apply. Repeatable.
    #[arg(long = "tag", value_name = "TAG")]
    tags: Vec<String>,
}

#[derive(Debug, Args)]
struct DeleteDropletArgs {
    /// Droplet ID.
    droplet: DropletId,

    /// Return once the delete is accepted instead of waiting for the droplet to disappear.
    #[arg(long)]
    no_wait: bool,
}

impl DropletsCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        match self.command {
            DropletsSubcommand::List(args) => list_droplets(ctx, args).await,
            DropletsSubcommand::Get(args) => get_droplet(ctx, args).await,
            DropletsSubcommand::Create(args) => create_droplet(ctx, args).await,
            DropletsSubcommand::Delete(args) => delete_droplet(ctx, args).await,
            DropletsSubcommand::PowerOn(args) => power_on(ctx, args).await,
            DropletsSubcommand::PowerOff(args) => power_off(ctx, args).await,
            DropletsSubcommand::Shutdown(args) => shutdown(ctx, args).await,
            DropletsSubcommand::Reboot(args) => reboot(ctx, args).await,
            DropletsSubcommand::PowerCycle(args) => power_cycle(ctx, args).await,
        }
    }
}

/// Table row for a droplet.
#[derive(Debug, Clone, Serialize, Tabled)]
pub(crate) struct DropletRow {
    #[tabled(rename = "ID")]
    id: u64,

    #[tabled(rename = "Name")]
    name: String,

    #[tabled(rename = "Status")]
    status: String,

    #[tabled(rename = "Region", display = "display_option")]
    region: Option<String>,

    #[tabled(rename = "Size", display = "display_option")]
    size: Option<String>,

    #[tabled(rename = "Public IPv4", display = "display_option")]
    public_ipv4: Option<String>,

    #[tabled(rename = "Created", display = "display_option")]
    created_at: Option<String>,
}

impl From<&Droplet> for DropletRow {
    fn from(droplet: &Droplet) -> Self {
        Self {
            id: droplet.id.value(),
            name: droplet.name.clone(),
            status: colored_status(&droplet.status.to_string()),
            region: droplet.region_slug().map(String::from),
            size: droplet.size_slug.clone(),
            public_ipv4: droplet.public_ipv4().map(String::from),
            created_at: droplet.created_at.map(|t| t.format("%Y-%m-%d %H:%M").to_string()),
        }
    }
}

/// Print a droplet: a row for tables, the full record for JSON.
fn show(ctx: &CommandContext, droplet: &Droplet) {
    match ctx.format {
        OutputFormat::Table => print_single(&DropletRow::from(droplet), ctx.format),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(droplet).unwrap_or_default())
        }
    }
}

/// Print the outcome of a lifecycle command.
fn report(ctx: &CommandContext, message: &str, droplet: &Droplet) {
    if ctx.format == OutputFormat::Table {
        print_success(message);
    }
    show(ctx, droplet);
}

/// List droplets.
async fn list_droplets(ctx: CommandContext, args: ListDropletsArgs) -> Result<()> {
    let compute = ctx.compute()?;

    let droplets = if args.ids.is_empty() {
        compute.list_droplets().await?
    } else {
        compute.list_droplets_by_ids(&args.ids).await?
    };

    match ctx.format {
        OutputFormat::Table => {
            let rows: Vec<DropletRow> = droplets.iter().map(DropletRow::from).collect();
            print_output(&rows, ctx.format);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&droplets)?)
        }
    }
    Ok(())
}

/// Get droplet details.
async fn get_droplet(ctx: CommandContext, args: DropletArg) -> Result<()> {
    let compute = ctx.compute()?;

    let droplet = compute
        .get_droplet(args.droplet)
        .await?
        .ok_or_else(|| CliError::not_found(DropletId::KIND, args.droplet))?;

    show(&ctx, &droplet);
    Ok(())
}

/// Create a droplet.
async fn create_droplet(ctx: CommandContext, args: CreateDropletArgs) -> Result<()> {
    let compute = ctx.compute()?;

    let mut spec = DropletSpec::new(args.name, args.region, args.size, args.image);
    spec.ssh_keys = args.ssh_keys;
    spec.backups = args.backups;
    spec.ipv6 = args.ipv6;
    spec.private_networking = args.private_networking;
    spec.tags = args.tags;
    if let Some(path) = args.user_data_file {
        let user_data = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read user data from {:?}", path))?;
        spec.user_data = Some(user_data);
    }

    print_info(&format!("Creating droplet '{}'...", spec.name));
    let droplet = compute.create_and_await_running(&spec).await?;

    report(&ctx, &format!("Droplet {} is {}.", droplet.id, droplet.status), &droplet);
    Ok(())
}

/// Delete a droplet.
async fn delete_droplet(ctx: CommandContext, args: DeleteDropletArgs) -> Result<()> {
    let compute = if args.no_wait {
        ctx.compute_with(|mut config| {
            config.await_termination_on_delete = false;
            config
        })?
    } else {
        ctx.compute()?
    };

    compute.delete_and_await_termination(args.droplet).await?;

    print_success(&format!("Droplet {} deleted.", args.droplet));
    Ok(())
}

/// Power a droplet on.
async fn power_on(ctx: CommandContext, args: DropletArg) -> Result<()> {
    let droplet = ctx.compute()?.power_on_and_await(args.droplet).await?;
    report(&ctx, &format!("Droplet {} is {}.", droplet.id, droplet.status), &droplet);
    Ok(())
}

/// Power a droplet off.
async fn power_off(ctx: CommandContext, args: DropletArg) -> Result<()> {
    let droplet = ctx.compute()?.power_off_and_await(args.droplet).await?;
    report(&ctx, &format!("Droplet {} is {}.", droplet.id, droplet.status), &droplet);
    Ok(())
}

async fn shutdown(ctx: CommandContext, args: DropletArg) -> Result<()> {
    let droplet = ctx.compute()?.shutdown_and_await(args.droplet).await?;
    report(&ctx, &format!("Droplet {} is {}.", droplet.id, droplet.status), &droplet);
    Ok(())
}

/// Reboot a droplet.
async fn reboot(ctx: CommandContext, args: DropletArg) -> Result<()> {
    let droplet = ctx.compute()?.reboot_and_await(args.droplet).await?;
    report(&ctx, &format!("Droplet {} rebooted.", droplet.id), &droplet);
    Ok(())
}

async fn power_cycle(ctx: CommandContext, args: DropletArg) -> Result<()> {
    let droplet = ctx.compute()?.power_cycle_and_await(args.droplet).await?;
    report(&ctx, &format!("Droplet {} power cycled.", droplet.id), &droplet);
    Ok(())
}
