//! CLI command definitions for kanban-board
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

pub mod export;

use clap::{Parser, Subcommand};
use export::ExportArgs;
use std::net::IpAddr;
use std::path::PathBuf;

/// Kanban board server and maintenance tools
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to database file (overrides config)
    #[arg(short, long, global = true)]
    pub database: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP API (default if no subcommand given)
    Serve(ServeArgs),

    /// Apply pending schema migrations and exit
    Migrate,

    /// Replace all data with the sample boards
    Seed,

    /// Export all boards as nested JSON
    Export(ExportArgs),
}

/// Arguments for the serve subcommand
#[derive(clap::Args, Debug, Default)]
pub struct ServeArgs {
    /// Address to listen on (overrides config)
    #[arg(long)]
    pub host: Option<IpAddr>,

    /// Port to listen on (overrides config)
    #[arg(short, long)]
    pub port: Option<u16>,
}
