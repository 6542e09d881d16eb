//! `plm` — CLI for the PLM entity store sync operations.
//!
//! Credentials are sourced from the environment: `PLM_STORE_URL`,
//! `PLM_STORE_ORG`, `PLM_STORE_EMAIL`, `PLM_STORE_PASSWORD`.

mod logging;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use plm_client::{
    Credentials, EntityStore, ItemPayload, LinkAttributes, RemoteEntityStore, StoreConfig,
    StoreHealth,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "plm", version, about = "Sync utilities for the PLM entity store")]
struct Cli {
    /// Base URL of the entity store API.
    #[arg(long, env = "PLM_STORE_URL")]
    base_url: String,

    /// Emit logs as JSON lines.
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check connectivity and credentials against the store.
    Ping,

    /// Create or update an item, keyed on its federated id.
    UpsertItem {
        /// Path to a JSON item payload.
        #[arg(long, value_name = "FILE")]
        payload: PathBuf,
    },

    /// Find or create the project for a season.
    EnsureProject {
        #[arg(long)]
        season: String,
    },

    /// Find or create an integration assortment under a project.
    EnsureAssortment {
        #[arg(long)]
        project_id: String,
        #[arg(long)]
        channel: String,
        #[arg(long)]
        division: String,
    },

    /// Link an item into a project.
    EnsureProjectItem {
        #[arg(long)]
        item_id: String,
        #[arg(long)]
        project_id: String,
    },

    /// Link an item into an assortment.
    EnsureAssortmentItem {
        #[arg(long)]
        item_id: String,
        #[arg(long)]
        assortment_id: String,
    },

    /// Link an item into a project and update the link's attributes.
    UpsertProjectItem {
        #[arg(long)]
        item_id: String,
        #[arg(long)]
        project_id: String,
        /// Path to a JSON attribute map.
        #[arg(long, value_name = "FILE")]
        attrs: PathBuf,
    },

    /// Link an item into an assortment and update the link's attributes.
    UpsertAssortmentItem {
        #[arg(long)]
        item_id: String,
        #[arg(long)]
        assortment_id: String,
        /// Path to a JSON attribute map.
        #[arg(long, value_name = "FILE")]
        attrs: PathBuf,
    },

    /// Upsert an item and wire it into a project and an assortment.
    Provision {
        /// Path to a JSON item payload.
        #[arg(long, value_name = "FILE")]
        payload: PathBuf,
        /// Path to a JSON attribute map for the project link.
        #[arg(long, value_name = "FILE")]
        attrs: Option<PathBuf>,
        #[arg(long)]
        project_id: String,
        #[arg(long)]
        assortment_id: String,
    },
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn print_entity<T: Serialize>(entity: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(entity)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.json_logs);

    let credentials =
        Credentials::from_env().context("loading store credentials from the environment")?;
    let store = RemoteEntityStore::new(StoreConfig::new("plm-store", &cli.base_url), credentials)
        .context("initializing the store client")?;

    match cli.command {
        Command::Ping => {
            store.login().await.context("logging in to the store")?;
            match store.health_check().await? {
                StoreHealth::Healthy => {
                    println!("{} store is healthy", "ok".green());
                }
                StoreHealth::Unhealthy(reason) => {
                    bail!("store is unhealthy: {}", reason.red());
                }
                StoreHealth::Unknown => {
                    println!("{} store health unknown", "warn".yellow());
                }
            }
        }
        Command::UpsertItem { payload } => {
            let item: ItemPayload = read_json(&payload)?;
            let item = plm_sync::upsert_item(&store, &item).await?;
            print_entity(&item)?;
        }
        Command::EnsureProject { season } => {
            let project = plm_sync::ensure_project_for_season(&store, &season).await?;
            print_entity(&project)?;
        }
        Command::EnsureAssortment {
            project_id,
            channel,
            division,
        } => {
            let assortment =
                plm_sync::ensure_assortment_for_project(&store, &project_id, &channel, &division)
                    .await?;
            print_entity(&assortment)?;
        }
        Command::EnsureProjectItem {
            item_id,
            project_id,
        } => {
            let link = plm_sync::ensure_item_in_project(&store, &item_id, &project_id).await?;
            print_entity(&link)?;
        }
        Command::EnsureAssortmentItem {
            item_id,
            assortment_id,
        } => {
            let link =
                plm_sync::ensure_item_in_assortment(&store, &item_id, &assortment_id).await?;
            print_entity(&link)?;
        }
        Command::UpsertProjectItem {
            item_id,
            project_id,
            attrs,
        } => {
            let attrs: LinkAttributes = read_json(&attrs)?;
            let link =
                plm_sync::upsert_project_item(&store, &attrs, &item_id, &project_id).await?;
            print_entity(&link)?;
        }
        Command::UpsertAssortmentItem {
            item_id,
            assortment_id,
            attrs,
        } => {
            let attrs: LinkAttributes = read_json(&attrs)?;
            let link =
                plm_sync::upsert_assortment_item(&store, &attrs, &item_id, &assortment_id).await?;
            print_entity(&link)?;
        }
        Command::Provision {
            payload,
            attrs,
            project_id,
            assortment_id,
        } => {
            let item: ItemPayload = read_json(&payload)?;
            let attrs: LinkAttributes = match attrs {
                Some(path) => read_json(&path)?,
                None => LinkAttributes::new(),
            };
            let link = plm_sync::provision_assortment_item(
                &store,
                &item,
                &attrs,
                &project_id,
                &assortment_id,
            )
            .await?;
            print_entity(&link)?;
        }
    }

    Ok(())
}
