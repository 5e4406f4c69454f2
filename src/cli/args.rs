//! CLI argument definitions.
//!
//! The main entry point is the [`Cli`] struct.

use clap::Parser;

/// goci - Run the build, test, format and push pipeline for a Go project.
#[derive(Debug, Parser)]
#[command(name = "goci")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Project directory
    #[arg(short, long, default_value = "")]
    pub project: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}
