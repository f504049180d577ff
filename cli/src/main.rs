use std::path::PathBuf;

use clap::Parser;
use odie_cli::config::{Config, data_dir};
use odie_cli::term::StdTerminal;
use odie_cli::ui::{self, Session};
use odie_cli::{CliError, logging, screens};
use odie_sqlite::Database;

#[derive(Debug, Parser)]
#[command(name = "odie")]
#[command(about = "Track file migrations across sites, clients and projects")]
#[command(version)]
struct Cli {
    /// Database file (default: odie.db in the data directory).
    #[arg(long)]
    db: Option<PathBuf>,
    /// YAML configuration file (default: config.yaml in the data directory).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Rows shown per list page.
    #[arg(long)]
    page_size: Option<usize>,
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = Config::load_or_default(cli.config.as_deref())?;
    if let Some(db) = cli.db {
        config.database = Some(db);
    }
    if let Some(page_size) = cli.page_size {
        config.page_size = page_size;
    }
    config.validate()?;

    logging::init(&data_dir().join("odie.log"), &config.log_level)?;

    let db_path = config.database_path();
    tracing::info!(path = %db_path.display(), "opening database");
    let db = Database::open(&db_path)?;

    let mut term = StdTerminal::new();
    let mut session = Session::new(&db, &mut term, &config);
    let start = screens::dashboard(&session)?;
    ui::run(&mut session, start)?;

    tracing::info!("session ended");
    Ok(())
}
