//! RecipeKit Web CLI
//!
//! Serves the recipe API, or extracts a single recipe from a URL or a saved
//! HTML file.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use recipekit_web::handlers::{app_router, AppState};
use recipekit_web::{RecipeService, ServerConfig};
use tracing_subscriber::EnvFilter;

/// RecipeKit Web
#[derive(Parser, Debug)]
#[command(name = "rk-recipe")]
#[command(version)]
#[command(about = "Extract structured recipes from web pages")]
struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API
    Serve {
        /// Host to bind to (overrides RECIPEKIT_BIND_ALL)
        #[arg(short = 'H', long)]
        host: Option<std::net::IpAddr>,

        /// Port to listen on (overrides RECIPEKIT_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Fetch a URL and print the extracted recipe as JSON
    Parse {
        /// Recipe page URL
        url: String,
    },

    /// Extract a recipe from a local HTML file
    Extract {
        /// Path to the HTML file
        file: PathBuf,

        /// Source URL to record on the recipe
        #[arg(long, default_value = "about:blank")]
        url: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = ServerConfig::from_env().context("loading configuration")?;

    match args.command {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.bind_addr = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            serve(config).await
        }
        Command::Parse { url } => {
            let service = RecipeService::new(&config.fetch)?;
            let output = service
                .parse_url(&url)
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            tracing::info!("Extracted via {} layer", output.layer);
            println!("{}", serde_json::to_string_pretty(&output.recipe)?);
            Ok(())
        }
        Command::Extract { file, url } => {
            let html = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let service = RecipeService::new(&config.fetch)?;
            let output = service.parse_html(&html, &url)?;
            tracing::info!("Extracted via {} layer", output.layer);
            println!("{}", serde_json::to_string_pretty(&output.recipe)?);
            Ok(())
        }
    }
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let service = RecipeService::new(&config.fetch)?;
    let state = Arc::new(AppState::new(service));
    let app = app_router(state, &config.allowed_origins);

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;

    tracing::info!("RecipeKit Web listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
