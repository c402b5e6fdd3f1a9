//! Wayfarer CLI - inspect the persisted session and the marker catalog.
//!
//! # Usage
//!
//! ```bash
//! # Who is signed in?
//! wayfarer-cli session show
//!
//! # Sign out without starting the app
//! wayfarer-cli session clear
//!
//! # List the built-in markers with directions links
//! wayfarer-cli markers
//! ```
//!
//! The slot directory defaults to `WAYFARER_DATA_DIR` (or `.wayfarer`) and
//! can be overridden with `--data-dir`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "wayfarer-cli")]
#[command(author, version, about = "Wayfarer CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect or reset the persisted session
    Session {
        #[command(subcommand)]
        action: SessionAction,

        /// Slot directory (defaults to `WAYFARER_DATA_DIR`)
        #[arg(short, long, global = true)]
        data_dir: Option<PathBuf>,
    },
    /// List the marker catalog
    Markers {
        /// Include share links
        #[arg(short, long)]
        share: bool,
    },
}

#[derive(Subcommand)]
enum SessionAction {
    /// Show the signed-in identity
    Show,
    /// Remove the persisted identity
    Clear,
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(output) => print(&output),
        Err(e) => {
            tracing::error!("Command failed: {e}");
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<String, Box<dyn std::error::Error>> {
    let output = match cli.command {
        Commands::Session { action, data_dir } => {
            let slot = commands::session::open(data_dir);
            match action {
                SessionAction::Show => commands::session::show(&slot)?,
                SessionAction::Clear => commands::session::clear(&slot)?,
            }
        }
        Commands::Markers { share } => commands::markers::list(share)?,
    };
    Ok(output)
}

#[allow(clippy::print_stdout)]
fn print(output: &str) {
    println!("{output}");
}
