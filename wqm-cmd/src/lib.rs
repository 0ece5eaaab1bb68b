//! Command implementations for WQM CLI.
//!
//! Provides subcommands that load the site and sample spreadsheets,
//! classify each located site and emit its map marker.

use clap::{Args, Subcommand};
use std::path::PathBuf;

pub mod render;
pub mod source;

/// Where the streams come from and how to classify them.
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Site list (CSV or JSON file, or http(s) URL)
    #[arg(short = 's', long)]
    pub sites: String,

    /// Historical samples (CSV or JSON file, or http(s) URL)
    #[arg(short = 'd', long)]
    pub samples: String,

    /// Labels table: header names the sample columns, first row their labels
    #[arg(short = 'l', long)]
    pub labels: Option<String>,

    /// Sample columns to keep when no labels table is given
    #[arg(long, value_delimiter = ',')]
    pub columns: Vec<String>,

    /// JSON config file; command-line values override it
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Reference time for the staleness window (RFC 3339 or YYYY-MM-DD)
    #[arg(long)]
    pub now: Option<String>,

    /// Samples older than this many days leave a site unknown
    #[arg(long)]
    pub staleness_days: Option<i64>,

    /// Highest count still rated good
    #[arg(long)]
    pub good: Option<f64>,

    /// Highest count still rated caution
    #[arg(long)]
    pub caution: Option<f64>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Write one marker per located site as JSON
    Markers {
        #[command(flatten)]
        input: InputArgs,

        /// Output path for the markers JSON (stdout when omitted)
        #[arg(short = 'o', long)]
        output: Option<String>,
    },

    /// Print the health status of each located site
    Classify {
        #[command(flatten)]
        input: InputArgs,

        /// Print how many sites have each status instead of one line per site
        #[arg(long)]
        counts: bool,
    },
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Markers { input, output } => render::run_markers(&input, output.as_deref()).await,
        Command::Classify { input, counts } => render::run_classify(&input, counts).await,
    }
}
