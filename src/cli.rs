use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(subcommand_value_name = "SUBCOMMAND")]
#[command(subcommand_help_heading = "Subcommands")]
pub struct Cli {
    /// Path to config file (default: `$XDG_CONFIG_HOME/casement/config.kdl`).
    ///
    /// This can also be set with the `CASEMENT_CONFIG` environment variable. If both are set,
    /// the command line argument takes precedence.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub subcommand: Sub,
}

#[derive(Subcommand)]
pub enum Sub {
    /// Apply requests to a fresh engine, one JSON request per line.
    ///
    /// Prints one JSON reply per line to stdout.
    Run {
        /// Request script to read (default: stdin).
        script: Option<PathBuf>,
        /// Initial container width.
        #[arg(long, default_value_t = 1280.)]
        width: f64,
        /// Initial container height.
        #[arg(long, default_value_t = 720.)]
        height: f64,
    },
    /// Validate the config file.
    Validate,
}
