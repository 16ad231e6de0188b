use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for metrorank-cli
#[derive(Debug, Parser)]
#[command(
    name = "metrorank",
    version,
    about = "Reconcile city, traffic and airport tables into ranked CSV lists"
)]
pub struct CliArgs {
    /// JSON configuration file (default: built-in paths and weights)
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output switches shared by the ranking commands.
#[derive(Debug, Args)]
pub struct OutputArgs {
    /// Output CSV path (default: from configuration)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Write the CSV to stdout instead of a file
    #[arg(long = "stdout", conflicts_with = "output")]
    pub stdout: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build the weighted-sum city ranking
    Cities {
        /// Population table; repeat to merge several (replaces the configured list)
        #[arg(long = "population")]
        population: Vec<PathBuf>,

        /// Airport traffic table
        #[arg(long = "traffic")]
        traffic: Option<PathBuf>,

        /// City-code reference table for indirect traffic matching
        #[arg(long = "city-codes")]
        city_codes: Option<PathBuf>,

        /// Replacement intangible score list (city,iso2,score,reason)
        #[arg(long = "intangible")]
        intangible: Option<PathBuf>,

        /// Pinned core list
        #[arg(long = "pinned", conflicts_with = "no_pinned")]
        pinned: Option<PathBuf>,

        /// Ignore the configured pinned list
        #[arg(long = "no-pinned")]
        no_pinned: bool,

        /// Total rows to keep, pinned rows included
        #[arg(short = 'n', long = "target", conflicts_with = "all")]
        target: Option<usize>,

        /// Keep every candidate
        #[arg(long = "all")]
        all: bool,

        /// Weight preset (master, global)
        #[arg(long = "preset")]
        preset: Option<String>,

        #[command(flatten)]
        out: OutputArgs,
    },

    /// Build the component-score metro-area ranking
    Metros {
        /// Airports reference table
        #[arg(long = "airports")]
        airports: Option<PathBuf>,

        /// City-code reference table
        #[arg(long = "city-codes")]
        city_codes: Option<PathBuf>,

        /// Metros shown in the console report
        #[arg(long = "top")]
        top: Option<usize>,

        #[command(flatten)]
        out: OutputArgs,
    },

    /// Run whichever strategy the configuration selects
    Rank {
        #[command(flatten)]
        out: OutputArgs,
    },

    /// Search merged cities by name (accent- and case-insensitive)
    Find {
        /// Substring to search
        query: String,
    },

    /// Print a ranked city CSV as an AP-style numbered list
    ApList {
        /// Ranked city CSV (default: the configured city output)
        #[arg(short = 'i', long = "input")]
        input: Option<PathBuf>,
    },

    /// Compile a population table into a JSON city list
    Compile {
        /// Population table
        #[arg(
            short = 'i',
            long = "input",
            default_value = "data/raw_data/simplemaps-worldcities.csv"
        )]
        input: PathBuf,

        /// JSON output path
        #[arg(
            short = 'o',
            long = "output",
            default_value = "data/processed_data/cities.json"
        )]
        output: PathBuf,
    },

    /// Check a compiled JSON city list; exits non-zero on any issue
    Validate {
        /// Compiled city list
        #[arg(
            short = 'i',
            long = "input",
            default_value = "data/processed_data/cities.json"
        )]
        input: PathBuf,
    },

    /// Print the effective configuration as JSON
    ShowConfig,
}
