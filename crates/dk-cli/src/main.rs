//! Command-line front end for the Dachkammer text adventure engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use dk_engine::Registry;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "dk",
    about = "Dachkammer: a content-driven text adventure engine",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a world in the terminal
    Play {
        /// World directory or bundled JSON file
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// Start at this location instead of the world's start
        #[arg(short, long)]
        start: Option<String>,

        /// Describe every location in full on every turn
        #[arg(short, long)]
        verbose: bool,
    },

    /// Validate a world and report every problem
    Check {
        /// World directory or bundled JSON file
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },

    /// Tabulate the definitions in a world
    List {
        /// What to list
        #[arg(value_enum, default_value_t = commands::list::Section::Items)]
        what: commands::list::Section,

        /// World directory or bundled JSON file
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let registry = Registry::standard();

    let result = match cli.command {
        Commands::Play {
            dir,
            start,
            verbose,
        } => commands::play::run(&registry, &dir, start.as_deref(), verbose),
        Commands::Check { dir } => commands::check::run(&registry, &dir),
        Commands::List { what, dir } => commands::list::run(&registry, &dir, what),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
