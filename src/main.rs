//! # tg-apidoc CLI (`tgapi`)
//!
//! Runs the inline bot and offers terminal access to the same search.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `tgapi serve` | Fetch the Bot API description and run the inline bot |
//! | `tgapi search "<query>"` | Print one page of inline results |
//! | `tgapi check` | Fetch and validate the description, print counts |
//!
//! ## Examples
//!
//! ```bash
//! # Run the bot (token from the environment or a .env file)
//! TELEGRAM_BOT_TOKEN=123:abc tgapi serve
//!
//! # Second page of all results, from a local copy of the document
//! tgapi search "" --offset 50 --spec ./openapi.json
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use teloxide::Bot;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tg_apidoc::catalog::{self, Catalog, FetchOptions};
use tg_apidoc::config::{self, Config};
use tg_apidoc::models::ApiDescription;
use tg_apidoc::{bot, search};

/// tg-apidoc — search the Telegram Bot API reference from any chat.
#[derive(Parser)]
#[command(name = "tgapi", version, about)]
struct Cli {
    /// Path to configuration file (TOML). Optional; defaults apply when absent.
    #[arg(long, global = true, default_value = "./config/tg-apidoc.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the inline bot.
    ///
    /// Fetches the Bot API description, then answers `/start` and inline
    /// queries until interrupted. If the fetch fails the bot still starts
    /// and answers with an empty catalog.
    Serve {
        /// Telegram bot token.
        #[arg(long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true)]
        token: String,

        /// Serve a local OpenAPI file instead of fetching.
        #[arg(long)]
        spec: Option<PathBuf>,
    },

    /// Search the description and print one page of results.
    Search {
        /// Query string; empty matches everything.
        query: String,

        /// Offset token, as sent by Telegram for the next page.
        #[arg(long, default_value = "")]
        offset: String,

        /// Use a local OpenAPI file instead of fetching.
        #[arg(long)]
        spec: Option<PathBuf>,

        /// Print each result's MarkdownV2 body.
        #[arg(long)]
        body: bool,
    },

    /// Fetch and validate the description.
    Check {
        /// Validate a local OpenAPI file instead of fetching.
        #[arg(long)]
        spec: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tg_apidoc=info,tgapi=info,teloxide=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Serve { token, spec } => run_serve(&cfg, token, spec.as_deref()).await?,
        Commands::Search {
            query,
            offset,
            spec,
            body,
        } => {
            let api = load_description(&cfg, spec.as_deref()).await?;
            print_page(&query, &offset, &api, body);
        }
        Commands::Check { spec } => {
            let api = load_description(&cfg, spec.as_deref()).await?;
            print_stats(&api);
        }
    }

    Ok(())
}

async fn load_description(cfg: &Config, spec: Option<&Path>) -> Result<ApiDescription> {
    match spec {
        Some(path) => catalog::load_catalog_file(path)
            .with_context(|| format!("Failed to load {}", path.display())),
        None => catalog::fetch_catalog(&FetchOptions::from(&cfg.catalog))
            .await
            .with_context(|| format!("Failed to fetch {}", cfg.catalog.url)),
    }
}

async fn run_serve(cfg: &Config, token: String, spec: Option<&Path>) -> Result<()> {
    info!("Starting tg-apidoc bot");

    let catalog = match load_description(cfg, spec).await {
        Ok(api) => Catalog::new(api),
        Err(e) => {
            error!("{:#}", e);
            Catalog::empty()
        }
    };
    if catalog.snapshot().is_empty() {
        warn!("Serving with an empty catalog until the description can be fetched");
    }

    if spec.is_none() && cfg.catalog.refresh_enabled() {
        let every = Duration::from_secs(cfg.catalog.refresh_interval_secs);
        info!("Refreshing the description every {:?}", every);
        catalog::spawn_refresh(catalog.clone(), FetchOptions::from(&cfg.catalog), every);
    }

    bot::run_bot(Bot::new(token), catalog, &cfg.bot).await
}

fn print_page(query: &str, offset: &str, api: &ApiDescription, with_body: bool) {
    let page = search::answer(query, offset, api);

    if page.results.is_empty() {
        println!("No results.");
    }
    for result in &page.results {
        match &result.description {
            Some(desc) => println!("{}  {}", result.id, desc),
            None => println!("{}", result.id),
        }
        if with_body {
            println!("{}\n", result.body);
        }
    }
    println!("next_offset: {}", page.next_offset);
}

fn print_stats(api: &ApiDescription) {
    let params: usize = api.methods.iter().map(|m| m.parameters.len()).sum();
    let props: usize = api.types.iter().map(|t| t.properties.len()).sum();
    println!("methods: {} ({} parameters)", api.methods.len(), params);
    println!("types: {} ({} properties)", api.types.len(), props);
    println!("OK");
}
