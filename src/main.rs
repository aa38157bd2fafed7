//! Kanban Board Server
//!
//! Serves boards, columns, tasks and subtasks over a JSON HTTP API backed by
//! SQLite.

use anyhow::Result;
use clap::Parser;
use kanban_board::api::{self, ApiServer};
use kanban_board::cli::export::{ExportArgs, write_snapshot};
use kanban_board::cli::{Cli, Command, ServeArgs};
use kanban_board::config::Config;
use kanban_board::db::Database;
use kanban_board::logging::{self, LogTarget};
use std::fs::File;
use std::io::BufWriter;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(&LogTarget::parse(&cli.log), cli.verbose)?;

    let (mut config, config_path) = Config::discover(cli.config.as_deref())?;
    match &config_path {
        Some(path) => info!("Loaded configuration from {}", path.display()),
        None => info!("No configuration file found; using defaults"),
    }

    // Override paths from CLI arguments
    if let Some(db_path) = &cli.database {
        config.server.db_path = db_path.clone();
    }

    match cli.command {
        Some(Command::Migrate) => run_migrate(&config)?,
        Some(Command::Seed) => run_seed(&config)?,
        Some(Command::Export(args)) => run_export(&config, args)?,
        Some(Command::Serve(args)) => run_server(config, args).await?,
        None => run_server(config, ServeArgs::default()).await?,
    }

    Ok(())
}

fn open_database(config: &Config) -> Result<Database> {
    config.ensure_db_dir()?;
    let db = Database::open(&config.server.db_path)?;
    info!("Database: {:?}", config.server.db_path);
    Ok(db)
}

/// Run the HTTP server until Ctrl-C.
async fn run_server(mut config: Config, args: ServeArgs) -> Result<()> {
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    info!("Starting Kanban Board Server v{}", env!("CARGO_PKG_VERSION"));
    let db = open_database(&config)?;
    info!("Database initialized successfully");

    let state = ApiServer::new(db, config.board.clone());
    api::serve(state, config.listen_addr(), api::shutdown_signal()).await
}

/// Run the migrate command
fn run_migrate(config: &Config) -> Result<()> {
    let db = open_database(config)?;
    match db.schema_version()? {
        Some(version) => println!("Database schema is at version {}", version),
        None => println!("Database schema has no recorded migrations"),
    }
    Ok(())
}

/// Run the seed command
fn run_seed(config: &Config) -> Result<()> {
    let db = open_database(config)?;
    let summary = db.seed()?;
    println!("Seeded sample data:");
    println!("  boards: {}", summary.boards);
    println!("  columns: {}", summary.columns);
    println!("  tasks: {}", summary.tasks);
    println!("  subtasks: {}", summary.subtasks);
    Ok(())
}

/// Run the export command
fn run_export(config: &Config, args: ExportArgs) -> Result<()> {
    let db = open_database(config)?;
    let boards = db.export_boards()?;
    let compress = args.should_compress();

    match &args.output {
        Some(path) => {
            let file = BufWriter::new(File::create(path)?);
            write_snapshot(&boards, compress, file)?;
            eprintln!(
                "Exported {} board(s) to {}{}",
                boards.len(),
                path.display(),
                if compress { " (gzipped)" } else { "" }
            );
        }
        None => {
            let stdout = std::io::stdout();
            write_snapshot(&boards, compress, stdout.lock())?;
        }
    }

    Ok(())
}
