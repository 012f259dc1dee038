// ABOUTME: Standalone TweakKit server with a handful of demonstration tweaks
// ABOUTME: Loads configuration from the environment, applies CLI overrides and serves until Ctrl-C
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TweakKit Contributors

//! # TweakKit Server Binary
//!
//! Registers a few demonstration tweaks and serves them to remote consoles.

use anyhow::Result;
use clap::Parser;
use tokio::signal;
use tracing::info;
use tweakkit::config::{NetworkMode, ServerConfig};
use tweakkit::server::TweakServer;
use tweakkit::{Constraints, Registry, Tweak};

#[derive(Parser)]
#[command(name = "tweakkit-server")]
#[command(about = "TweakKit - live runtime tweaks over a WebSocket console")]
pub struct Args {
    /// Override the listening port
    #[arg(short, long)]
    port: Option<u16>,

    /// Listen on all interfaces instead of localhost only
    #[arg(long)]
    lan: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(port) = args.port {
        config.port = port;
    }
    if args.lan {
        config.network_mode = NetworkMode::Lan;
    }

    config.logging.init()?;
    info!("{}", config.summary());

    let registry = Registry::with_history_capacity(config.history_capacity);
    register_demo_tweaks(&registry);

    registry.add_observer(|event| {
        info!(
            key = %event.key,
            old = %event.old_value,
            new = %event.new_value,
            source = %event.source,
            "Tweak changed"
        );
    });

    let handle = TweakServer::new(registry, config).start().await?;
    info!(
        "Console available at http://{}/ (WebSocket at /ws)",
        handle.local_addr()
    );

    signal::ctrl_c().await?;
    info!("Shutdown signal received");
    handle.stop().await;
    Ok(())
}

fn register_demo_tweaks(registry: &Registry) {
    Tweak::new("physics.speed", 1.0_f64)
        .with_constraints(Constraints::new().range(0.0, 10.0).step(0.5))
        .register(registry);
    Tweak::new("physics.gravity", 9.81_f64)
        .with_constraints(Constraints::new().min(0.0))
        .register(registry);
    Tweak::new("spawn.count", 10_i32)
        .with_constraints(Constraints::new().range(0, 100).step(5))
        .register(registry);
    Tweak::new("ui.title", "TweakKit Demo".to_owned()).register(registry);
    Tweak::new("debug.show_fps", false).register(registry);

    info!(count = registry.len(), "Registered demonstration tweaks");
}
