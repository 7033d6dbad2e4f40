//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Academic room allocation.
///
/// Assigns course sections to rooms and weekly time slots, honoring room
/// capacity, room kind, and professor availability.
#[derive(Debug, Parser)]
#[command(name = "ra", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Allocate every section of a snapshot and print the results.
    Run {
        /// Snapshot file (JSON).
        snapshot: PathBuf,

        /// Output the full run report as JSON.
        #[arg(long)]
        json: bool,

        /// Group allocated sections by time slot.
        #[arg(long, conflicts_with = "json")]
        timetable: bool,
    },

    /// Check a snapshot without allocating.
    Validate {
        /// Snapshot file (JSON).
        snapshot: PathBuf,
    },

    /// Show the slot grid of the effective configuration.
    Grid,
}
