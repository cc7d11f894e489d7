use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bunnyhop::{AppState, Server, Settings, StaticStorefront};
use storefront_client::Storefront;

#[derive(Parser, Debug)]
#[command(name = "bunnyhop")]
#[command(about = "Storefront homepage server for the BUNNYHOP shop")]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on, overriding server.listen_addr
    #[arg(short, long)]
    listen: Option<String>,

    /// Serve a canned catalog instead of querying the Storefront API
    #[arg(long)]
    demo: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("bunnyhop=info,storefront_client=info")),
        )
        .init();

    let settings = Settings::load(args.config.as_deref()).context("Failed to load settings")?;
    let default_locale = settings.default_locale()?;

    let storefront: Arc<dyn Storefront> = if args.demo {
        info!("demo mode: serving canned catalog");
        Arc::new(StaticStorefront::demo())
    } else {
        info!(endpoint = %settings.storefront.endpoint, "using storefront API");
        Arc::new(settings.storefront_client()?)
    };

    let listen_addr = args
        .listen
        .unwrap_or_else(|| settings.server.listen_addr.clone());

    let server = Server::bind(&listen_addr, AppState::new(storefront, default_locale))
        .await
        .with_context(|| format!("Failed to bind {}", listen_addr))?;

    info!(addr = %server.local_addr()?, "storefront listening");

    server.run_until(shutdown_signal()).await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
