use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "unit-converter")]
#[command(version, about = "Unit conversion with an optional AI explanation", long_about = None)]
pub struct Cli {
    /// Settings file (default: platform config directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a value between two units
    Convert {
        /// Value to convert
        #[arg(allow_negative_numbers = true)]
        value: f64,

        /// Source unit (e.g. "foot", "°C", "miles per hour")
        from: String,

        /// Target unit
        to: String,

        /// Decimal places in the result
        #[arg(short, long)]
        decimals: Option<usize>,
    },

    /// List unit categories
    Units {
        /// Only show this category, or the category of this unit
        #[arg(short, long)]
        category: Option<String>,

        /// List every unit name instead of the categories
        #[arg(long, conflicts_with = "category")]
        all: bool,
    },

    /// Ask the AI assistant to explain a conversion
    Ask {
        /// Question, e.g. "5 feet to meters"
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Override the model
        #[arg(long)]
        model: Option<String>,

        /// Override the request timeout
        #[arg(long, value_name = "SECS")]
        timeout_secs: Option<u64>,
    },

    /// Interactive session with history
    Session,
}
