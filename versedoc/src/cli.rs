//! Command-line interface definitions for versedoc

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI structure for the versedoc application
#[derive(Parser)]
#[command(name = "versedoc")]
#[command(version)]
#[command(about = "Export Bible verses and notes to Word documents", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for versedoc
#[derive(Subcommand)]
pub enum Commands {
    /// Build a .docx document from an export directory
    Export {
        /// Export directory containing versedoc.toml (defaults to current directory)
        #[arg(value_name = "PATH", default_value = ".")]
        input: PathBuf,

        /// Output file path
        #[arg(short, long, default_value = "output.docx")]
        output: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the verse blocks an export would be laid out in
    Blocks {
        /// Export directory containing versedoc.toml (defaults to current directory)
        #[arg(value_name = "PATH", default_value = ".")]
        input: PathBuf,

        /// Group by chapter instead of by consecutive verses
        #[arg(long)]
        by_chapter: bool,
    },
}
