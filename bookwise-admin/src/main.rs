//! bookwise-admin: catalog maintenance CLI
//!
//! The only writer of the catalog database. The web server opens the same
//! file read-only.

use anyhow::{Context, Result};
use bookwise_admin::commands;
use bookwise_admin::google_books::GoogleBooksClient;
use bookwise_admin::prompt::{AssumeYes, Confirm, StdinConfirm};
use bookwise_admin::DEFAULT_SEED;
use bookwise_common::config::{AppConfig, CliOverrides, ENV_BASE_URL, ENV_CONFIG, ENV_DATABASE};
use bookwise_common::db::init_database;
use bookwise_common::db::seed::SeedCatalog;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "bookwise-admin")]
#[command(about = "BookWise catalog maintenance")]
#[command(version)]
struct Args {
    /// Config file path (TOML)
    #[arg(short, long, env = ENV_CONFIG, global = true)]
    config: Option<PathBuf>,

    /// SQLite database path
    #[arg(short, long, env = ENV_DATABASE, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the database file and tables
    Init,
    /// Load genres, books and summaries from a JSON seed file
    Seed {
        /// Seed file; the bundled catalog is used when omitted
        #[arg(long)]
        file: Option<PathBuf>,
        /// Clear all catalog rows first
        #[arg(long)]
        reset: bool,
    },
    /// Delete books duplicating an earlier title and author
    Dedupe {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Delete generated placeholder books
    RemoveDummy {
        #[arg(short, long)]
        yes: bool,
    },
    /// Fetch cover images from Google Books
    RefreshCovers {
        #[arg(short, long)]
        yes: bool,
    },
    /// Write sitemap.xml and robots.txt
    Sitemap {
        /// Output directory
        #[arg(long, default_value = ".")]
        out: PathBuf,
        /// Public site URL used in every <loc>
        #[arg(long, env = ENV_BASE_URL)]
        base_url: Option<String>,
    },
    /// Print catalog counts
    Report,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let base_url = match &args.command {
        Command::Sitemap { base_url, .. } => base_url.clone(),
        _ => None,
    };
    let config = AppConfig::resolve(&CliOverrides {
        config_path: args.config,
        database_path: args.database,
        base_url,
        ..Default::default()
    })
    .context("Failed to load configuration")?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!(
        "BookWise (bookwise-admin) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    info!("Database path: {}", config.database_path.display());

    let pool = init_database(&config.database_path)
        .await
        .context("Failed to open catalog database")?;
    let mut stdout = std::io::stdout();

    match args.command {
        Command::Init => {
            println!("✓ Database ready: {}", config.database_path.display());
        }
        Command::Seed { file, reset } => {
            let catalog = match &file {
                Some(path) => SeedCatalog::load(path)
                    .with_context(|| format!("Failed to read seed file {}", path.display()))?,
                None => SeedCatalog::from_json(DEFAULT_SEED).context("Bundled seed is invalid")?,
            };
            commands::seed(&pool, &catalog, reset, &mut stdout).await?;
        }
        Command::Dedupe { yes } => {
            commands::dedupe(&pool, confirmer(yes).as_mut(), &mut stdout).await?;
        }
        Command::RemoveDummy { yes } => {
            commands::remove_dummy(&pool, confirmer(yes).as_mut(), &mut stdout).await?;
        }
        Command::RefreshCovers { yes } => {
            let client = GoogleBooksClient::new()?;
            commands::refresh_covers(&pool, &client, confirmer(yes).as_mut(), &mut stdout).await?;
        }
        Command::Sitemap { out, .. } => {
            let today = chrono::Local::now().date_naive();
            commands::sitemap(&pool, &out, &config.base_url, today, &mut stdout).await?;
        }
        Command::Report => {
            commands::report(&pool, &mut stdout).await?;
        }
    }

    pool.close().await;
    Ok(())
}

fn confirmer(yes: bool) -> Box<dyn Confirm> {
    if yes {
        Box::new(AssumeYes)
    } else {
        Box::new(StdinConfirm)
    }
}
