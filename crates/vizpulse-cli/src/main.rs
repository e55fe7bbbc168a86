mod snapshot;
mod social;
mod watch;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "vizpulse-cli")]
#[command(about = "Inspect business snapshots and social scores")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show the latest review snapshot and the recommended next action
    Snapshot {
        /// Business to show; defaults to the most recently updated one
        #[arg(long)]
        place_id: Option<String>,
    },
    /// Score the enabled social channels of a business
    Social {
        /// Business to score; defaults to the most recently updated one
        #[arg(long)]
        place_id: Option<String>,
    },
    /// Print the snapshot and reprint it whenever its raw data changes
    Watch {
        /// Business to watch; without it the most recently updated business is
        /// followed, switching when another one becomes more recent
        #[arg(long)]
        place_id: Option<String>,

        /// Refresh interval used when live change notifications are unavailable
        #[arg(long, default_value_t = 60)]
        poll_secs: u64,
    },
    /// Apply pending database migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("vizpulse-cli: no command given; run with --help for usage");
        return Ok(());
    };

    let config = vizpulse_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = vizpulse_db::PoolConfig::from_app_config(&config);
    let pool = vizpulse_db::connect_pool(&config.database_url, pool_config).await?;

    match command {
        Commands::Snapshot { place_id } => {
            snapshot::run_snapshot(&pool, place_id.as_deref()).await?;
        }
        Commands::Social { place_id } => {
            social::run_social(&pool, place_id.as_deref()).await?;
        }
        Commands::Watch {
            place_id,
            poll_secs,
        } => {
            watch::run_watch(
                &pool,
                place_id.as_deref(),
                std::time::Duration::from_secs(poll_secs.max(1)),
            )
            .await?;
        }
        Commands::Migrate => {
            vizpulse_db::run_migrations(&pool).await?;
            println!("migrations applied");
        }
    }

    Ok(())
}
