//! SSH key commands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use nimbus_digitalocean::domain::{Key, NewKey};
use nimbus_id::KeyId;
use serde::Serialize;
use tabled::Tabled;

use crate::output::{print_output, print_single, print_success, OutputFormat};

use super::CommandContext;

/// SSH key commands.
#[derive(Debug, Args)]
pub struct KeysCommand {
    #[command(subcommand)]
    command: KeysSubcommand,
}

#[derive(Debug, Subcommand)]
enum KeysSubcommand {
    /// List SSH keys on the account.
    List,

    /// Upload a public key.
    Add(AddKeyArgs),

    /// Remove a key by ID.
    Remove(RemoveKeyArgs),
}

#[derive(Debug, Args)]
struct AddKeyArgs {
    /// Key name.
    #[arg(long)]
    name: String,

    /// Path to the public key file (e.g. ~/.ssh/id_ed25519.pub).
    #[arg(long)]
    public_key_file: PathBuf,
}

#[derive(Debug, Args)]
struct RemoveKeyArgs {
    /// Key ID.
    key: KeyId,
}

impl KeysCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        match self.command {
            KeysSubcommand::List => list_keys(ctx).await,
            KeysSubcommand::Add(args) => add_key(ctx, args).await,
            KeysSubcommand::Remove(args) => remove_key(ctx, args).await,
        }
    }
}

#[derive(Debug, Clone, Serialize, Tabled)]
struct KeyRow {
    #[tabled(rename = "ID")]
    id: u64,

    #[tabled(rename = "Name")]
    name: String,

    #[tabled(rename = "Fingerprint")]
    fingerprint: String,
}

impl From<&Key> for KeyRow {
    fn from(key: &Key) -> Self {
        Self {
            id: key.id.value(),
            name: key.name.clone(),
            fingerprint: key.fingerprint.clone(),
        }
    }
}

/// List keys.
async fn list_keys(ctx: CommandContext) -> Result<()> {
    let keys = ctx.compute()?.list_keys().await?;

    match ctx.format {
        OutputFormat::Table => {
            let rows: Vec<KeyRow> = keys.iter().map(KeyRow::from).collect();
            print_output(&rows, ctx.format);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&keys)?),
    }
    Ok(())
}

/// Add a key.
async fn add_key(ctx: CommandContext, args: AddKeyArgs) -> Result<()> {
    let public_key = std::fs::read_to_string(&args.public_key_file)
        .with_context(|| format!("Failed to read public key from {:?}", args.public_key_file))?;

    let key = ctx
        .client()?
        .create_key(&NewKey {
            name: args.name,
            public_key: public_key.trim().to_string(),
        })
        .await?;

    match ctx.format {
        OutputFormat::Table => {
            print_success(&format!("Key {} added.", key.id));
            print_single(&KeyRow::from(&key), ctx.format);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&key)?),
    }
    Ok(())
}

/// Remove a key.
async fn remove_key(ctx: CommandContext, args: RemoveKeyArgs) -> Result<()> {
    ctx.client()?.delete_key(args.key).await?;
    print_success(&format!("Key {} removed.", args.key));
    Ok(())
}
