//! Image commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use nimbus_digitalocean::domain::Image;
use nimbus_id::DropletId;
use serde::Serialize;
use tabled::Tabled;

use crate::error::CliError;
use crate::output::{display_option, print_info, print_output, print_single, print_success, OutputFormat};

use super::CommandContext;

/// Image commands.
#[derive(Debug, Args)]
pub struct ImagesCommand {
    #[command(subcommand)]
    command: ImagesSubcommand,
}

#[derive(Debug, Subcommand)]
enum ImagesSubcommand {
    /// List images.
    List(ListImagesArgs),

    /// Get an image by ID or slug.
    Get(GetImageArgs),

    /// Power a droplet off, snapshot it and wait for the image.
    Snapshot(SnapshotArgs),

    /// Delete a private image by ID.
    Delete(GetImageArgs),
}

#[derive(Debug, Args)]
struct ListImagesArgs {
    /// Only show private images (snapshots and backups).
    #[arg(long)]
    private: bool,
}

#[derive(Debug, Args)]
struct GetImageArgs {
    /// Image ID or slug.
    image: String,
}

#[derive(Debug, Args)]
struct SnapshotArgs {
    /// Droplet to snapshot.
    droplet: DropletId,

    /// Name of the resulting image.
    #[arg(long)]
    name: String,
}

impl ImagesCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        match self.command {
            ImagesSubcommand::List(args) => list_images(ctx, args).await,
            ImagesSubcommand::Get(args) => get_image(ctx, args).await,
            ImagesSubcommand::Snapshot(args) => snapshot(ctx, args).await,
            ImagesSubcommand::Delete(args) => delete_image(ctx, args).await,
        }
    }
}

/// Table row for an image.
#[derive(Debug, Clone, Serialize, Tabled)]
struct ImageRow {
    #[tabled(rename = "ID")]
    id: u64,

    #[tabled(rename = "Name")]
    name: String,

    #[tabled(rename = "Slug", display = "display_option")]
    slug: Option<String>,

    #[tabled(rename = "Distribution", display = "display_option")]
    distribution: Option<String>,

    #[tabled(rename = "Type", display = "display_option")]
    kind: Option<String>,

    #[tabled(rename = "Public")]
    public: bool,

    #[tabled(rename = "Regions")]
    regions: String,
}

impl From<&Image> for ImageRow {
    fn from(image: &Image) -> Self {
        Self {
            id: image.id.value(),
            name: image.name.clone(),
            slug: image.slug.clone(),
            distribution: image.distribution.clone(),
            kind: image.kind.clone(),
            public: image.public,
            regions: image.regions.join(","),
        }
    }
}

fn show(ctx: &CommandContext, image: &Image) {
    match ctx.format {
        OutputFormat::Table => print_single(&ImageRow::from(image), ctx.format),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(image).unwrap_or_default()),
    }
}

/// List images.
async fn list_images(ctx: CommandContext, args: ListImagesArgs) -> Result<()> {
    let mut images = ctx.compute()?.list_images().await?;
    if args.private {
        images.retain(|image| !image.public);
    }

    match ctx.format {
        OutputFormat::Table => {
            let rows: Vec<ImageRow> = images.iter().map(ImageRow::from).collect();
            print_output(&rows, ctx.format);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&images)?),
    }
    Ok(())
}

/// Get an image.
async fn get_image(ctx: CommandContext, args: GetImageArgs) -> Result<()> {
    let image = ctx
        .compute()?
        .get_image(&args.image)
        .await?
        .ok_or_else(|| CliError::not_found("image", &args.image))?;

    show(&ctx, &image);
    Ok(())
}

/// Snapshot a droplet.
async fn snapshot(ctx: CommandContext, args: SnapshotArgs) -> Result<()> {
    let compute = ctx.compute()?;
    let images = compute.images();

    let template = images.build_image_template(&args.name, args.droplet).await?;
    print_info(&format!(
        "Powering off droplet {} and taking snapshot '{}'...",
        template.source, template.name
    ));

    let image = images.create_image(&template).await?;

    if ctx.format == OutputFormat::Table {
        print_success(&format!("Image {} '{}' is available.", image.id, image.name));
    }
    show(&ctx, &image);
    Ok(())
}

/// Delete an image.
async fn delete_image(ctx: CommandContext, args: GetImageArgs) -> Result<()> {
    ctx.compute()?.delete_image(&args.image).await?;
    print_success(&format!("Image {} deleted.", args.image));
    Ok(())
}
