use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

/// Station climate observations CLI tool
#[derive(Parser)]
#[command(name = "surfsup")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// SQLite URL or path of the dataset
    #[arg(short, long, env = "SURFSUP_DATABASE_URL", global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every station with its location
    Stations,

    /// Rank stations by number of measurements
    Activity,

    /// Minimum, average and maximum temperature for a date range
    Stats {
        /// First date included (YYYY-MM-DD)
        start: String,

        /// Last date included (YYYY-MM-DD); open-ended if omitted
        end: Option<String>,

        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Last year of temperature observations for the most active station
    Tobs {
        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Export precipitation by date as CSV
    Precipitation {
        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let store = commands::open_store(cli.database_url).await?;

    let result = match cli.command {
        Commands::Stations => commands::stations::run(&store).await,
        Commands::Activity => commands::activity::run(&store).await,
        Commands::Stats { start, end, json } => {
            commands::stats::run(&store, &start, end.as_deref(), json).await
        }
        Commands::Tobs { json } => commands::tobs::run(&store, json).await,
        Commands::Precipitation { output } => commands::precipitation::run(&store, output).await,
    };

    store.close().await;
    result
}
