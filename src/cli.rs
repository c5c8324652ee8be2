use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "dailyplant",
    version,
    about = "Plant encyclopedia TUI with a seasonal plant of the day"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to config.yaml
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Path to the plant database (plantdb.sqlite3)
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Override the data directory used for logs and the default database
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Re-run interactive setup
    Init,
    /// Validate config, database and recognition API credentials
    Check,
    /// Print the plant of the day
    Today {
        /// Season to pick for instead of today's (e.g. spring, 冬)
        #[arg(short, long)]
        season: Option<String>,
    },
    /// Search the encyclopedia
    Search {
        /// Text matched against name, description and seasons
        #[arg(default_value = "")]
        query: String,
        /// Only plants in this category
        #[arg(short = 'k', long)]
        category: Option<String>,
    },
    /// Show one plant by its database id
    Show { id: i64 },
    /// List plant categories
    Categories,
    /// Identify a plant from a photo
    Identify {
        /// Image file (.jpg, .jpeg, .png, .bmp)
        image: Option<PathBuf>,
        /// Take a photo with the configured camera app instead
        #[arg(long, conflicts_with = "image")]
        camera: bool,
    },
    /// Load plants from a JSON or YAML file
    Import {
        file: PathBuf,
        /// Delete existing plants first
        #[arg(long)]
        replace: bool,
    },
}
