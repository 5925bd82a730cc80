use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use iptv_catalog::{
    catalog::{strategy_for, CatalogStrategy},
    config::{AddonConfig, CatalogStyle},
    proxy::{PassthroughRewriter, PrefixRewriter, UrlRewriter},
};

#[derive(Parser)]
#[command(name = "iptv-catalog")]
#[command(version = "0.1.0")]
#[command(about = "Inspect a live TV playlist catalog from the command line")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the rows of a catalog
    Catalog {
        /// Catalog id; defaults to the first catalog of the configured style
        #[arg(long)]
        id: Option<String>,
        /// Case-insensitive title search
        #[arg(long)]
        search: Option<String>,
        /// Pagination offset
        #[arg(long, default_value_t = 0)]
        skip: usize,
    },
    /// Show the full meta shape of one catalog item
    Meta {
        /// Opaque meta id as issued by a catalog listing
        id: String,
    },
    /// Resolve a stream request id into playable stream descriptors
    Streams {
        /// Opaque stream id as issued by a meta lookup
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("iptv_catalog={}", cli.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting iptv-catalog v{}", env!("CARGO_PKG_VERSION"));

    std::env::set_var("CONFIG_FILE", &cli.config);
    let config = Arc::new(AddonConfig::load()?);
    info!(
        "Configuration loaded from {}: {} sources, {:?} style",
        cli.config,
        config.sources.len(),
        config.style
    );

    let rewriter: Arc<dyn UrlRewriter> = match &config.proxy_endpoint {
        Some(endpoint) => Arc::new(PrefixRewriter::new(endpoint.clone())),
        None => Arc::new(PassthroughRewriter),
    };
    let strategy = strategy_for(Arc::clone(&config), rewriter);

    match cli.command {
        Commands::Catalog { id, search, skip } => {
            let id = id.unwrap_or_else(|| match config.style {
                CatalogStyle::Channels => format!("{}cat", config.prefix),
                CatalogStyle::Catalogs => format!("{}cat_0", config.prefix),
            });
            let metas = strategy.list(&id, search.as_deref(), skip).await?;
            println!("{}", serde_json::to_string_pretty(&metas)?);
        }
        Commands::Meta { id } => {
            let meta = strategy.lookup_one(&id).await?;
            println!("{}", serde_json::to_string_pretty(&meta)?);
        }
        Commands::Streams { id } => {
            let streams = strategy.resolve_streams(&id).await?;
            println!("{}", serde_json::to_string_pretty(&streams)?);
        }
    }

    Ok(())
}
