//! Locale-Aware Routing Gateway
//!
//! An HTTP edge service that resolves the locale for every request
//! (prefix > cookie > Accept-Language > default), canonicalizes request
//! paths to their localized form, and forwards rewrites to the upstream
//! renderer.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌────────────────────────────────────────────┐
//!                        │               LOCALE GATEWAY               │
//!                        │                                            │
//!   Client Request       │  ┌─────────┐   ┌──────────┐   ┌─────────┐ │
//!   ────────────────────▶│  │  http   │──▶│ resolver │──▶│ matcher │ │
//!                        │  │ server  │   │ (locale) │   │ (paths) │ │
//!                        │  └─────────┘   └────┬─────┘   └────┬────┘ │
//!                        │                     └───────┬──────┘      │
//!                        │                             ▼             │
//!                        │                       ┌──────────┐        │
//!   308 → canonical path │                       │ planner  │        │
//!   ◀────────────────────│───────── redirect ────│(directive│        │
//!                        │                       └────┬─────┘        │
//!                        │                            │ rewrite      │
//!                        │                            ▼              │
//!   Client Response      │                      ┌───────────┐        │     Upstream
//!   ◀────────────────────│──────────────────────│  forward  │◀───────┼──── Renderer
//!                        │                      └───────────┘        │
//!                        │                                            │
//!                        │  config · observability · lifecycle        │
//!                        └────────────────────────────────────────────┘
//! ```

use std::path::Path;

use tokio::net::TcpListener;

use locale_gateway::config::loader::load_config;
use locale_gateway::lifecycle::{signals, Shutdown};
use locale_gateway::observability::{logging, metrics};
use locale_gateway::{GatewayConfig, HttpServer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration: first CLI argument, or built-in defaults.
    let config = match std::env::args().nth(1) {
        Some(path) => load_config(Path::new(&path))?,
        None => GatewayConfig::default(),
    };

    logging::init(&config.observability.log_level);

    tracing::info!("locale-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.address,
        locales = ?config.locales.supported,
        default_locale = %config.locales.default,
        routes = config.pathnames.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    let shutdown_rx = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_terminate().await;
        shutdown.trigger();
    });

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown_rx).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
