//! Command-line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Astrocal: astronomical event calendar generator.
#[derive(Parser)]
#[command(
    name = "astrocal",
    version,
    about = "Generate astronomical event calendars"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Run the full event-generation pipeline.
    Generate(GenerateArgs),
}

/// Output mode override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputModeArg {
    /// Write one file per calendar.
    CalendarFiles,
    /// Print grouped event records to stdout.
    RawData,
}

/// Arguments for the `generate` subcommand.
#[derive(clap::Args)]
pub struct GenerateArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "astrocal.toml")]
    pub config: PathBuf,

    /// Override the first year to generate events for.
    #[arg(long)]
    pub start_year: Option<i32>,

    /// Override the last year (inclusive).
    #[arg(long)]
    pub end_year: Option<i32>,

    /// Override the observer city from config.
    #[arg(long)]
    pub city: Option<String>,

    /// Override the output directory from config.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override the output mode from config.
    #[arg(long, value_enum)]
    pub mode: Option<OutputModeArg>,
}
