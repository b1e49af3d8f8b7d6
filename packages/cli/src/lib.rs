//! # zettings-cli
//!
//! Read and edit a zettings settings file from the shell.
//!
//! ## Usage
//!
//! ```bash
//! # Values are TOML literals; anything else is taken as a string
//! zettings my-app set window.width 800
//! zettings my-app set theme dark
//! zettings my-app get window
//! zettings my-app show
//!
//! # Point at an explicit file instead of ~/.my-app/settings.toml
//! zettings my-app --file ./settings.toml keys
//! ```
//!
//! Logging goes through `env_logger`; set `RUST_LOG=debug` to see file
//! reads and writes.

pub mod commands;

use std::path::PathBuf;

use clap::Parser;
use zettings::Settings;

pub use commands::{execute, Command};

/// zettings - inspect and edit application settings
#[derive(Parser, Debug)]
#[command(name = "zettings")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Settings name; the file defaults to ~/.<NAME>/settings.toml
    pub name: String,

    /// Use this settings file instead of the default location
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Refuse to modify the settings
    #[arg(long)]
    pub read_only: bool,

    /// Do not stamp the file with metadata
    #[arg(long)]
    pub no_metadata: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Open the settings described by `args`.
pub fn open(args: &Args) -> Result<Settings, zettings::Error> {
    let mut builder = Settings::builder(args.name.as_str())
        .read_only(args.read_only)
        .save_metadata(!args.no_metadata);
    if let Some(file) = &args.file {
        builder = builder.location(file);
    }
    builder.build()
}

/// Open the settings and run the requested command, returning what to print.
pub fn run(args: &Args) -> Result<Option<String>, zettings::Error> {
    let settings = open(args)?;
    log::debug!("Opened {}", settings);
    execute(&args.command, &settings)
}
