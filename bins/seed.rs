//! seed: insert (or remove) the demo companies.
//!
//! ```text
//! seed                              # insert fixtures/companies.toml, skipping existing names
//! seed --fixtures other.toml
//! seed --clear                      # delete companies whose names are in the fixture file
//! ```

use clap::Parser;
use dotenvy::dotenv;
use migration::{Migrator, MigratorTrait};
use tracing::{error, info};

use configs::{AppConfig, SeedConfig};
use service::company::repo::seaorm::SeaOrmCompanyRepository;
use service::company::repository::CompanyRepository;
use service::seed::{clear_seed_companies, seed_companies};

#[derive(Parser)]
#[command(name = "seed", about = "Seed the company table with demo fixtures")]
struct Cli {
    /// Delete the fixture companies instead of inserting them.
    #[arg(long)]
    clear: bool,

    /// TOML file with `[[companies]]` entries.
    #[arg(long, default_value = "fixtures/companies.toml")]
    fixtures: String,
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let fixtures = SeedConfig::load_from_file(&cli.fixtures)?;
    fixtures.validate()?;

    let cfg = AppConfig::load_and_validate()?;
    let db = models::db::connect_with_config(&models::db::DatabaseConfig::from_settings(&cfg.database)).await?;
    Migrator::up(&db, None).await?;
    let repo = SeaOrmCompanyRepository::new(db);

    if cli.clear {
        info!(event = "clear_start", fixtures = %cli.fixtures, "clearing seed data");
        let deleted = clear_seed_companies(&repo, &fixtures).await?;
        info!(event = "clear_done", deleted, "seed data cleared");
        return Ok(());
    }

    info!(event = "seed_start", fixtures = %cli.fixtures, count = fixtures.companies.len(), "seeding companies");
    let report = seed_companies(&repo, &fixtures).await?;
    let total = repo.count().await?;
    info!(event = "seed_done", created = report.created, skipped = report.skipped, total, "seeding completed");
    Ok(())
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    dotenv().ok();
    common::utils::logging::init_logging_from_env();

    match run(Cli::parse()).await {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            error!(event = "seed_failed", error = %e, "seed failed");
            std::process::ExitCode::FAILURE
        }
    }
}
