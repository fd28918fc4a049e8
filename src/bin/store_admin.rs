use anyhow::Result;
use clap::{Parser, Subcommand};
use salamawy_store::cli;
use salamawy_store::storage::{self, PgStore};
use salamawy_store::telemetry::init_tracing;
use salamawy_store::util::db::Db;
use salamawy_store::util::env as env_util;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "store_admin", version, about = "Salamawy Store maintenance CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "kebab-case")]
enum Commands {
    /// Create a dashboard admin account
    CreateAdmin {
        #[arg(long)]
        username: String,
        /// Falls back to ADMIN_PASSWORD so the secret stays out of shell history
        #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Insert the sample catalog (skips items that already exist)
    SeedSamples,
    /// Apply pending SQL files from ./migrations
    Migrate {
        /// Optional override for the database URL
        #[arg(long)]
        db_url: Option<String>,
    },
    /// Print row counts for the storefront tables
    Counts,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_util::init_env();
    init_tracing("info,sqlx=warn")?;

    let args = Cli::parse();

    match args.command {
        Commands::CreateAdmin { username, password } => {
            let store = storage::open_from_env().await?;
            let admin = cli::create_admin::run(store.as_ref(), &username, &password).await?;
            info!(admin_id = admin.id, username = %admin.username, "create-admin: done");
        }
        Commands::SeedSamples => {
            let store = storage::open_from_env().await?;
            let summary = cli::seed::run(store.as_ref()).await?;
            info!(
                products = summary.products_created,
                services = summary.services_created,
                skipped = summary.skipped,
                "seed-samples: done"
            );
        }
        Commands::Migrate { db_url } => {
            let database_url = match db_url {
                Some(url) => url,
                None => env_util::db_url()?,
            };
            let db = Db::connect_no_migrate(&database_url, 2).await?;
            let applied = db.run_migrations().await?;
            info!(applied = ?applied, "migrate: done");
            // Confirms the schema is usable after migrating
            let counts = cli::counts::run(&PgStore::new(db)).await?;
            print!("{counts}");
        }
        Commands::Counts => {
            let store = storage::open_from_env().await?;
            print!("{}", cli::counts::run(store.as_ref()).await?);
        }
    }

    Ok(())
}
