//! auth-routes
//!
//! Builds the authentication routes declared in a TOML file and either prints
//! them or serves them with demo endpoints.
//!
//! # Architecture Overview
//!
//! ```text
//!     config.toml ──▶ config (load + validate)
//!                        │
//!                        ▼
//!                  routing::RouteRegistrar ──▶ options ──▶ path / hooks / session
//!                        │                 └─▶ strategy (auth_for)
//!                        ▼
//!          ┌─────────────┴─────────────┐
//!          ▼                           ▼
//!    RouteTable (routes)        AxumHost (serve) ──▶ handlers ──▶ security::ReturnTo
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use auth_routes::config::{load_config, AppConfig};
use auth_routes::http::HttpServer;
use auth_routes::observability::{logging, metrics};
use auth_routes::routing::registrar::register_config;
use auth_routes::routing::RouteTable;

#[derive(Parser)]
#[command(name = "auth-routes")]
#[command(about = "Resolve and serve authentication routes", long_about = None)]
struct Cli {
    /// TOML configuration file. Built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Raise log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resolved route table
    Routes {
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Serve the declared routes with demo endpoints
    Serve {
        /// Override the configured bind address
        #[arg(short, long)]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };

    let level = logging::level_from_verbosity(cli.verbose, &config.observability.log_level);
    logging::init_logging(&level)?;

    tracing::info!(
        config = ?cli.config,
        resources = config.resources.len(),
        routes = config.routes.len(),
        "Configuration loaded"
    );

    match cli.command {
        Commands::Routes { json } => {
            let table = register_config(&config, RouteTable::new())?;
            let summaries = table.summaries();

            if json {
                println!("{}", serde_json::to_string_pretty(&summaries)?);
            } else {
                for route in &summaries {
                    println!(
                        "{:<7} {:<45} {:<40} {}",
                        route.method, route.path, route.name, route.handler
                    );
                }
            }
        }
        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                config.listener.bind_address = bind;
            }

            if config.observability.metrics_enabled {
                let addr: SocketAddr = config.observability.metrics_address.parse()?;
                metrics::init_metrics(addr)?;
            }

            let listener = TcpListener::bind(&config.listener.bind_address).await?;
            tracing::info!(address = %listener.local_addr()?, "Listening for connections");

            let server = HttpServer::new(config)?;
            server.run(listener).await?;

            tracing::info!("Shutdown complete");
        }
    }

    Ok(())
}
