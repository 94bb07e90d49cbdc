use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use eventgraph::config::{get_config_path, load_config, save_config, DisplayMode, ImporterConfig};
use eventgraph::display::{format_event_as_json, format_event_report};
use eventgraph::errors::ImportError;
use eventgraph::importer::EventImporter;
use eventgraph::report::TracingSink;
use tracing_subscriber::EnvFilter;

/// Imports Sessionize event data and prints the resolved event.
#[derive(Parser)]
#[command(
    name = "eventgraph",
    about = "Resolve Sessionize event data into a cross-referenced graph"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init {
        /// Directory to hold `.eventgraph/` (default: current directory)
        path: Option<String>,
    },
    /// Import an event from a file or URL
    Import {
        /// JSON file or http(s) URL (default: configured source)
        source: Option<String>,
        /// Directory holding `.eventgraph/` (default: current directory)
        #[arg(short, long)]
        path: Option<String>,
        /// Print the resolved event as JSON
        #[arg(short, long)]
        json: bool,
        /// Print every resolved reference
        #[arg(short, long)]
        long: bool,
        /// Fail when more references than this cannot be resolved
        #[arg(short, long)]
        max_unresolved: Option<usize>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> eventgraph::errors::Result<()> {
    match cli.command {
        Commands::Init { path } => {
            let root = resolve_path(path);
            save_config(&root, &ImporterConfig::default())?;
            println!("Wrote {}", get_config_path(&root).display());
        }
        Commands::Import {
            source,
            path,
            json,
            long,
            max_unresolved,
        } => {
            let root = resolve_path(path);
            let mut config = load_config(&root)?;
            if max_unresolved.is_some() {
                config.max_unresolved = max_unresolved;
            }
            if long {
                config.display = DisplayMode::Long;
            }

            let source = source
                .or_else(|| config.default_source.clone())
                .ok_or_else(|| ImportError::Config {
                    message: "no source given and no default_source configured".to_string(),
                })?;

            let importer = EventImporter::new(config);
            let mut sink = TracingSink::new();
            let event = importer.import(&source, &mut sink)?;

            if json {
                println!("{}", format_event_as_json(&event)?);
            } else {
                print!("{}", format_event_report(&event, importer.config().display));
            }
            if sink.reported() > 0 {
                eprintln!("{} problem(s) reported during import", sink.reported());
            }
        }
    }
    Ok(())
}

/// Resolves an optional path argument, defaulting to the current directory.
fn resolve_path(path: Option<String>) -> PathBuf {
    match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}
