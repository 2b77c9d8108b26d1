use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use subscription_reaper::Config;
use subscription_reaper::SubscriptionReaper;
use subscription_reaper_ext as k8s;
use subscription_reaper_kubeapi::KubeApi;

use axum::Router;
use axum::routing::get;

mod cli;
mod health;
mod signal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
    tracing::info!("Starting subscription-reaper");

    let health_listener = match cli.health_addr {
        Some(addr) => Some(health::bind(addr).await?),
        None => None,
    };

    let kubeapi = KubeApi::new(cli.kubeconfig.as_deref()).await?;
    let reaper = SubscriptionReaper::new(kubeapi, cli.config());

    if let Some(listener) = health_listener {
        tokio::spawn(health::serve(listener));
    }

    if cli.once {
        reaper.reap().await?;
    } else {
        reaper.run(signal::shutdown()).await?;
    }

    Ok(())
}
