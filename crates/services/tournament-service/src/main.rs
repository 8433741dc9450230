//! Tournament Service - CLI for the tournament data store.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use common::Pagination;
use domain::TournamentFilter;
use tournament_service_lib::config::TournamentServiceConfig;
use tournament_service_lib::infra::SeedOutcome;
use tournament_service_lib::MigrateAction;

#[derive(Parser)]
#[command(name = "tournament-service")]
#[command(about = "Tournament and game data store")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Database migration commands
    Migrate {
        #[command(subcommand)]
        action: MigrateCommands,
    },
    /// Insert baseline data if it is not present yet
    Seed,
    /// Connect, migrate and seed according to configuration
    Bootstrap,
    /// Print a page of tournaments as JSON
    List {
        #[arg(long, default_value = "1")]
        page: u64,
        #[arg(long, default_value = "20")]
        per_page: u64,
        /// Only tournaments whose title contains this text
        #[arg(long)]
        title: Option<String>,
        /// Include each tournament's games
        #[arg(long)]
        games: bool,
    },
}

#[derive(Subcommand)]
enum MigrateCommands {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset database and run all migrations
    Fresh,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Migrate { action } => {
            let migrate_action = match action {
                MigrateCommands::Up => MigrateAction::Up,
                MigrateCommands::Down => MigrateAction::Down,
                MigrateCommands::Status => MigrateAction::Status,
                MigrateCommands::Fresh => MigrateAction::Fresh,
            };
            tournament_service_lib::run_migrations(migrate_action).await?;
        }
        Commands::Seed => match tournament_service_lib::run_seed().await? {
            SeedOutcome::Seeded { records } => println!("Seeded {} records", records),
            SeedOutcome::AlreadySeeded => println!("Baseline data already present"),
        },
        Commands::Bootstrap => {
            let config = TournamentServiceConfig::from_env();
            let db = tournament_service_lib::bootstrap(&config).await?;
            db.ping().await?;
            println!("Tournament store ready");
        }
        Commands::List {
            page,
            per_page,
            title,
            games,
        } => {
            let config = TournamentServiceConfig::from_env();
            let db = tournament_service_lib::infra::Database::connect(&config.database).await?;
            let filter = TournamentFilter {
                title,
                include_games: games,
                ..TournamentFilter::default()
            };

            let tournaments =
                tournament_service_lib::list_tournaments(&db, filter, Pagination::page(page, per_page))
                    .await?;
            println!("{}", serde_json::to_string_pretty(&tournaments)?);
        }
    }

    Ok(())
}
