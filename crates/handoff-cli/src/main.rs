mod records;
mod signoff;

use clap::{Parser, Subcommand};
use handoff_core::{AppConfig, SignoffReconciler};
use handoff_db::PgGateway;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "handoff-cli")]
#[command(about = "Intake hand-off dashboard from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// List intake records, newest first
    Records,
    /// Show one record's sections and sign-offs
    Show {
        /// Record id
        id: Uuid,
    },
    /// Print record counts by phase
    Summary,
    /// Sign off a record, then print its refreshed sign-offs
    Signoff {
        /// Record id
        id: Uuid,
        #[arg(long)]
        name: String,
        #[arg(long)]
        role: String,
        /// Defaults to the record's own phase when sign-offs are logged
        #[arg(long)]
        phase: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check database connectivity
    Ping,
    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("handoff-cli ready; see --help for commands");
        return Ok(());
    };

    let config = handoff_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let pool = handoff_db::connect_pool(
        &config.database_url,
        handoff_db::PoolConfig::from_app_config(&config),
    )
    .await?;

    match command {
        Commands::Db {
            command: DbCommands::Ping,
        } => {
            handoff_db::ping(&pool).await?;
            println!("database reachable");
        }
        Commands::Db {
            command: DbCommands::Migrate,
        } => {
            let applied = handoff_db::run_migrations(&pool).await?;
            println!("migrations applied: {applied}");
        }
        Commands::Records => {
            records::run_records_list(&PgGateway::new(pool), &config).await?;
        }
        Commands::Show { id } => {
            records::run_show(&reconciler(pool, &config), &config, id).await?;
        }
        Commands::Summary => {
            records::run_summary(&PgGateway::new(pool)).await?;
        }
        Commands::Signoff {
            id,
            name,
            role,
            phase,
            notes,
        } => {
            let input = signoff::SignoffArgs {
                name,
                role,
                phase,
                notes,
            };
            signoff::run_signoff(&reconciler(pool, &config), &config, id, input).await?;
        }
    }

    Ok(())
}

fn reconciler(pool: sqlx::PgPool, config: &AppConfig) -> SignoffReconciler<PgGateway> {
    SignoffReconciler::new(PgGateway::new(pool), config.signoff_strategy)
}

#[cfg(test)]
mod tests;
