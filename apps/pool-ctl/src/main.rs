mod cli;
mod config;
mod telemetry;

use std::sync::Arc;

use anyhow::{anyhow, Context};
use clap::Parser;
use tracing::{info, warn};
use vim_sdk::proto::types::ImportSpec;
use vim_sdk::proto::ManagedObjectReference;
use vim_sdk::{Client, Folder, HostSystem, HttpTransport, Reference, ResourcePool};

use crate::cli::{Cli, Command};
use crate::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let (cfg, config_error) = match AppConfig::from_env() {
        Ok(cfg) => (cfg, None),
        Err(err) => (AppConfig::default(), Some(err)),
    };
    telemetry::init_tracing(cfg.log_filter.as_deref());
    if let Some(err) = config_error {
        warn!(error = %err, "invalid POOL_CTL__ settings, falling back to defaults");
    }

    let url = cli
        .url
        .clone()
        .or_else(|| cfg.url.clone())
        .ok_or_else(|| anyhow!("no endpoint: pass --url or set POOL_CTL__URL"))?;
    let session_id = cli
        .session_id
        .clone()
        .or_else(|| cfg.session_id.clone())
        .ok_or_else(|| anyhow!("no session: pass --session-id or set POOL_CTL__SESSION_ID"))?;
    let mut options = cfg.transport_options();
    options.insecure |= cli.insecure;

    let transport = HttpTransport::new(&url, session_id, options)
        .with_context(|| format!("invalid endpoint {url}"))?;
    let client = Client::new(Arc::new(transport));
    let mut pool = ResourcePool::new(
        client.clone(),
        ManagedObjectReference::new("ResourcePool", cli.pool.clone()),
    );
    if let Some(path) = &cli.path {
        pool = pool.with_inventory_path(path.clone());
    }
    info!(pool = %pool, "connected");

    run(cli.command, &client, &pool, &cfg).await
}

async fn run(
    command: Command,
    client: &Client,
    pool: &ResourcePool,
    cfg: &AppConfig,
) -> anyhow::Result<()> {
    match command {
        Command::Name => {
            println!("{}", pool.name().await?);
        }
        Command::Create { name, allocation } => {
            let child = pool.create(&name, allocation.create_spec()).await?;
            println!("{}", child.reference());
        }
        Command::CreateVapp {
            name,
            folder,
            annotation,
            allocation,
        } => {
            let folder = folder.map(|id| folder_handle(client, id));
            let vapp = pool
                .create_vapp(
                    &name,
                    allocation.create_spec(),
                    cli::vapp_config(annotation),
                    folder.as_ref(),
                )
                .await?;
            println!("{}", vapp.reference());
        }
        Command::ImportVapp {
            spec,
            folder,
            host,
            wait,
        } => {
            let raw = std::fs::read_to_string(&spec)
                .with_context(|| format!("failed to read {}", spec.display()))?;
            let import: ImportSpec = serde_json::from_str(&raw)
                .with_context(|| format!("invalid import spec in {}", spec.display()))?;
            let folder = folder.map(|id| folder_handle(client, id));
            let host = host.map(|id| {
                HostSystem::new(client.clone(), ManagedObjectReference::new("HostSystem", id))
            });
            let lease = pool
                .import_vapp(import, folder.as_ref(), host.as_ref())
                .await?
                .with_poll_interval(cfg.task_poll_interval());
            println!("{}", lease.reference());
            if wait {
                let info = lease.wait().await?;
                for device in info.device_url {
                    println!("{}\t{}", device.import_key, device.url);
                }
            }
        }
        Command::UpdateConfig { name, allocation } => {
            let spec = allocation.update_spec();
            pool.update_config(name.as_deref(), spec.as_ref()).await?;
            info!(pool = %pool, "configuration updated");
        }
        Command::DestroyChildren => {
            pool.destroy_children().await?;
            info!(pool = %pool, "children destroyed");
        }
        Command::Destroy { wait } => {
            let task = pool
                .destroy()
                .await?
                .with_poll_interval(cfg.task_poll_interval());
            println!("{}", task.reference());
            if wait {
                task.wait().await?;
            }
        }
    }
    Ok(())
}

fn folder_handle(client: &Client, id: String) -> Folder {
    Folder::new(client.clone(), ManagedObjectReference::new("Folder", id))
}
