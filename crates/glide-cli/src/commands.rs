use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "glide-cache")]
#[command(about = "Maintenance tool for the glide folder-size cache", long_about = None)]
pub struct Cli {
    /// Cache database path (defaults to the configured cache_db_path)
    #[arg(long)]
    pub db_path: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List every cached folder-size record
    List,
    /// Delete records older than N days, or every record when no age is given
    Clean {
        /// Only delete records not updated in the last N days
        #[arg(long)]
        days: Option<i64>,
    },
    /// Delete the record for one folder path
    Delete { path: String },
    /// Show record count and total cached bytes
    Stats,
    /// Print configuration values
    PrintConfig,
}
