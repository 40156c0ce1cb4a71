//! Audio Device API Server
//!
//! Resolves the bind address, mounts the API and serves until Ctrl+C.

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use audio_device_api::{
    api::{build_app, ApiContext, WebServer, ROUTES},
    audio::SystemAudio,
    cli::{resolve, wait_for_exit, Args, Console},
    config::FileConfig,
};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    if let Err(e) = run(args).await {
        tracing::error!("Startup failed: {:#}", e);
        println!("[❌] Error While Running main: {:#}", e);
        wait_for_exit(&mut Console::stdio());
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    tracing::info!("Starting Audio Device API");

    let file = FileConfig::discover(args.config.as_deref())?;

    // The prompt must finish before anything binds
    let resolution = tokio::task::spawn_blocking(move || resolve(&args, &file, &mut Console::stdio()))
        .await
        .context("bind address prompt aborted")??;
    tracing::info!(source = ?resolution.source, "Bind address resolved: {}", resolution.config);

    let mut ctx = ApiContext::new();
    match tokio::task::spawn_blocking(SystemAudio::probe).await? {
        Ok(backend) => ctx = ctx.with_audio(Arc::new(backend)),
        Err(e) => tracing::error!("Audio backend unavailable: {}", e),
    }

    let (app, report) = build_app(&ctx, ROUTES);
    tracing::info!(
        "{} endpoint group(s) registered, {} failed",
        report.mounted.len(),
        report.failed.len()
    );

    let server = WebServer::bind(resolution.config.socket_addr(), app)
        .await
        .with_context(|| format!("failed to bind {}", resolution.config))?;

    println!("[✅] HTTP Server running on http://{}", resolution.config);
    server.run().await?;

    Ok(())
}
