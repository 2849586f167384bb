//! Folio CLI - Command-line reader for manga and novels

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Parse a chapter number argument (must be at least 1)
fn parse_chapter(s: &str) -> Result<u32, String> {
    let n: u32 = s.parse().map_err(|_| format!("'{}' is not a valid chapter number", s))?;
    if n < 1 {
        Err("chapters are numbered from 1".to_string())
    } else {
        Ok(n)
    }
}

#[derive(Parser)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Session config file (JSON)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the works in the built-in catalog
    Catalog {
        /// Only list one kind of work (manga, novel)
        #[arg(short, long)]
        kind: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Open a chapter and print it
    Read {
        /// Kind of work (manga, novel)
        kind: String,

        /// Work id from the catalog
        work_id: String,

        /// Chapter number
        #[arg(default_value = "1", value_parser = parse_chapter)]
        chapter: u32,

        #[command(flatten)]
        options: commands::ReadOptions,
    },

    /// Replay a reader command script against a session
    Script {
        /// Script file path
        input: String,

        /// Output the final session snapshot as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "folio_cli=debug,folio_core=debug"
    } else {
        "folio_cli=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Catalog { kind, json } => commands::catalog(kind.as_deref(), json),

        Commands::Read {
            kind,
            work_id,
            chapter,
            options,
        } => commands::read(&kind, &work_id, chapter, &options, config).await,

        Commands::Script { input, json } => commands::script(&input, json, config).await,
    }
}
