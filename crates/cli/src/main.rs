use anyhow::Result;
use clap::{Parser, Subcommand};
use discovery_tags_core::{
    DATABASE_URL_VAR, DEFAULT_QUERY_LIMIT, DowngradeTarget, PoolConfig, UpgradeTarget,
};
use discovery_tags_storage::connect;
use sqlx::PgPool;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "discovery-tags")]
#[command(about = "Tag search view migrations for the discovery provider", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the revision recorded in the database
    Current,
    /// List known revisions, base first
    History,
    /// Apply migrations up to TARGET (`head`, `+N` or a revision id)
    Upgrade {
        #[arg(default_value = "head")]
        target: UpgradeTarget,
    },
    /// Revert migrations down to TARGET (`base`, `-N` or a revision id)
    Downgrade {
        #[arg(default_value = "-1", allow_hyphen_values = true)]
        target: DowngradeTarget,
    },
    /// Recompute the tag_track_user view from tracks
    Refresh {
        /// Keep the view readable while it rebuilds
        #[arg(long)]
        concurrently: bool,
    },
    /// Look up tracks carrying TAG in the current snapshot
    Search {
        tag: String,
        #[arg(short, long, default_value_t = DEFAULT_QUERY_LIMIT)]
        limit: usize,
    },
    /// Show how a raw tags value is split into indexed tags (no database needed)
    Split { tags: String },
}

fn get_database_url() -> Result<String> {
    std::env::var(DATABASE_URL_VAR)
        .map_err(|_| anyhow::anyhow!("{DATABASE_URL_VAR} environment variable must be set"))
}

async fn get_pool() -> Result<PgPool> {
    let url = get_database_url()?;
    Ok(connect(&url, &PoolConfig::from_env()).await?)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Current => commands::migrate::run_current().await,
        Commands::History => commands::migrate::run_history(),
        Commands::Upgrade { target } => commands::migrate::run_upgrade(&target).await,
        Commands::Downgrade { target } => commands::migrate::run_downgrade(&target).await,
        Commands::Refresh { concurrently } => commands::tags::run_refresh(concurrently).await,
        Commands::Search { tag, limit } => commands::tags::run_search(&tag, limit).await,
        Commands::Split { tags } => commands::tags::run_split(&tags),
    }
}
