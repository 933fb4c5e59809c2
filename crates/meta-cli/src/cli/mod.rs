use std::path::PathBuf;

use clap::Parser;

pub mod global;
pub mod root_commands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::{Commands, SchemaCommands};

/// Top-level CLI parser for the `metaedit` binary.
#[derive(Debug, Parser)]
#[command(name = "metaedit", version, about = "Schema-aware editing of metadata documents")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Schema version (defaults to `schema.default_version` from config)
    #[arg(long, global = true)]
    pub schema_version: Option<String>,

    /// Use this schema file instead of fetching one
    #[arg(long, global = true)]
    pub schema_file: Option<PathBuf>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            schema_version: self.schema_version.clone(),
            schema_file: self.schema_file.clone(),
        }
    }
}
