use anyhow::{Context, Result};
use clap::Parser;
use encore_ingest::Config;
use std::path::PathBuf;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "encore", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the database (default: ~/.local/share/encore/encore.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Search for concerts near a location, by band, or both
    ///
    /// With --latitude, --longitude and --radius (all three or none), lists
    /// concerts at venues within that many kilometres of the point. Band ids
    /// given with --band-ids then narrow the result to those bands.
    ///
    /// Without a location, lists every concert of the bands in --band-ids.
    ///
    /// Results are ordered by date, newest first.
    ///
    /// Examples:
    ///   encore search --latitude 52.5183113 --longitude 13.4717676 --radius 2
    ///   encore search --latitude 52.5183113 --longitude 13.4717676 --radius 2 --band-ids 223,146
    ///   encore search --band-ids 1,2,3 --json
    Search {
        /// Latitude of the search center in degrees
        #[arg(long, allow_negative_numbers = true)]
        latitude: Option<f64>,

        /// Longitude of the search center in degrees
        #[arg(long, allow_negative_numbers = true)]
        longitude: Option<f64>,

        /// Search radius in kilometres
        #[arg(long)]
        radius: Option<f64>,

        /// Comma-separated band ids, e.g. 1,2,3
        #[arg(long)]
        band_ids: Option<String>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Load band, venue and concert fixtures from a directory
    ///
    /// The directory must contain data_bands.json, data_venues.json and
    /// data_concerts.json. Existing documents with the same keys are
    /// replaced.
    Load {
        /// Directory holding the fixture files
        dir: PathBuf,
    },
    /// Show document counts
    Status,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Debug, clap::Subcommand)]
enum ConfigCommand {
    /// Show the current effective configuration
    Show,
    /// Get a config value, or the whole file when no key is given
    Get {
        /// Config key (database_path, envelope_km)
        key: Option<String>,
    },
    /// Set a config value in the config file
    Set {
        /// Config key (database_path, envelope_km)
        key: String,
        /// New value
        value: String,
    },
    /// Show the config file path
    Path,
    /// Show an example config file
    Example,
    /// Create the config file with defaults if it doesn't exist
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match cli.db {
        Some(db) => Config::load_with_db_path(db)?,
        None => Config::load()?,
    };

    twyg::setup(config.logging.clone())
        .map_err(|e| anyhow::anyhow!("Failed to set up logging: {e}"))?;

    match cli.command {
        Commands::Search {
            latitude,
            longitude,
            radius,
            band_ids,
            json,
        } => {
            let db = open_database(&config)?;
            commands::run_search(
                &db,
                &config,
                latitude,
                longitude,
                radius,
                band_ids.as_deref(),
                json,
            )
            .await?;
        }
        Commands::Load { dir } => {
            let db = open_database(&config)?;
            commands::run_load(&db, &dir)?;
        }
        Commands::Status => {
            let db = open_database(&config)?;
            commands::show_status(&db, &config)?;
        }
        Commands::Config { command } => match command {
            ConfigCommand::Show => commands::config::show_config(&config)?,
            ConfigCommand::Get { key } => commands::config::get_config(&config, key)?,
            ConfigCommand::Set { key, value } => commands::config::set_config(&key, &value)?,
            ConfigCommand::Path => commands::config::show_path(),
            ConfigCommand::Example => commands::config::show_example(),
            ConfigCommand::Init => commands::config::init_config()?,
        },
    }

    Ok(())
}

fn open_database(config: &Config) -> Result<encore_core::schema::Database> {
    // Ensure database directory exists
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create database directory {}", parent.display())
        })?;
    }

    encore_core::schema::Database::open(&config.database_path).with_context(|| {
        format!("Failed to open database {}", config.database_path.display())
    })
}
