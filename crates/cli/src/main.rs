use std::path::PathBuf;

use clap::Parser;

mod commands;
mod logging;

#[derive(Parser)]
#[command(
    name = "cutover",
    about = "Migrate identity accounts and profile tables from one store to another",
    version
)]
struct Cli {
    /// Path to a TOML configuration file. Without it, connection parameters
    /// are read from CUTOVER_* environment variables.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Wipe the target, migrate everything from the source, verify, promote grades
    Run {
        /// Skip the interactive confirmation
        #[arg(long)]
        yes: bool,
    },
    /// Show table and account counts for both stores
    Status,
    /// Ban every account listed in a graduating-cohort CSV on the target
    BanGraduates {
        /// Cohort file written by `run`
        csv: PathBuf,
        /// List the accounts without banning them
        #[arg(long)]
        dry_run: bool,
        /// Skip the interactive confirmation
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_level);

    let config = cli.config.as_deref();
    match cli.command {
        Commands::Run { yes } => {
            commands::run::run(config, yes).await?;
        }
        Commands::Status => {
            commands::status::run(config).await?;
        }
        Commands::BanGraduates {
            csv,
            dry_run,
            force,
        } => {
            commands::ban_graduates::run(config, &csv, dry_run, force).await?;
        }
    }

    Ok(())
}
