//! webscaffold server
//!
//! # Architecture Overview
//!
//! ```text
//!     config/app.toml ──▶ config ──▶ routing::Router ──▶ http::AxumServer
//!                                        │
//!                        app (controllers, middlewares, UserStore)
//!
//!     Client ──▶ request id / trace / timeout ──▶ middleware chain ──▶ controller action
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use webscaffold::app::{self, UserStore};
use webscaffold::config::{load_config, load_manifest};
use webscaffold::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "webscaffold")]
#[command(about = "Serve a controller-based web application from route definitions", long_about = None)]
struct Cli {
    /// Path to the application config file
    #[arg(short, long, default_value = "config/app.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Default)]
enum Commands {
    /// Wire the routes and serve HTTP until Ctrl+C
    #[default]
    Serve,
    /// Resolve every route and print the route table without serving
    Routes,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)?;
    logging::init_logging(&config.observability);

    tracing::info!(
        config = %cli.config.display(),
        bind_address = %config.server.bind_address,
        routes = config.routes.web.len() + config.routes.api.len(),
        "webscaffold v0.1.0 starting"
    );

    let manifest = load_manifest(&config.routing.middleware_manifest)?;
    let router = app::build_router(&config, manifest, Arc::new(UserStore::new()))?;

    match cli.command.unwrap_or_default() {
        Commands::Routes => {
            for route in router.routes() {
                println!("{route}");
            }
            Ok(())
        }
        Commands::Serve => {
            if config.observability.metrics_enabled {
                match config.observability.metrics_address.parse() {
                    Ok(addr) => metrics::init_metrics(addr)?,
                    Err(e) => tracing::error!(
                        metrics_address = %config.observability.metrics_address,
                        error = %e,
                        "Failed to parse metrics address"
                    ),
                }
            }

            let server = router.into_server()?;
            let listener = TcpListener::bind(&config.server.bind_address).await?;
            server.run(listener).await?;

            tracing::info!("Shutdown complete");
            Ok(())
        }
    }
}
