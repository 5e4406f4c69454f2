//! Command-line interface for goci.
//!
//! Argument parsing uses clap's derive macros; see [`args`].

pub mod args;

pub use args::Cli;
