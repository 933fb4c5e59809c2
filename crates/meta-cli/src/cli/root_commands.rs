use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Validate a document, or a single proposed change to it.
    Validate(ValidateArgs),
    /// Write the change log that turns one document into another.
    Diff(DiffArgs),
    /// Replay a JSONL change log over a base document.
    Apply(ApplyArgs),
    /// Apply validated `path=value` edits to a document.
    Edit(EditArgs),
    /// Inspect schemas.
    Schema {
        #[command(subcommand)]
        action: SchemaCommands,
    },
}

#[derive(Clone, Debug, Args)]
pub struct ValidateArgs {
    /// Document to validate (JSON).
    pub document: PathBuf,

    /// Dotted path of a proposed change, e.g. `contributor.0.name`.
    #[arg(long, requires = "value")]
    pub path: Option<String>,

    /// New value for `--path`, as JSON.
    #[arg(long, requires = "path")]
    pub value: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct DiffArgs {
    /// Document before the edit.
    pub old: PathBuf,

    /// Document after the edit.
    pub new: PathBuf,

    /// Write the change log to this JSONL file instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Clone, Debug, Args)]
pub struct ApplyArgs {
    /// Base document.
    pub base: PathBuf,

    /// JSONL change log produced by `diff` or `edit --log`.
    pub changes: PathBuf,

    /// Collapse repeated writes to the same path before replaying.
    #[arg(long)]
    pub squash: bool,

    /// Write the merged document here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Clone, Debug, Args)]
pub struct EditArgs {
    /// Document to edit.
    pub document: PathBuf,

    /// Edit as `path=json`; repeatable, applied in order.
    #[arg(long = "set", value_name = "PATH=JSON", required = true)]
    pub sets: Vec<String>,

    /// Write the edited document here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Also append the accepted changes to this JSONL log, creating it if needed.
    #[arg(long)]
    pub log: Option<PathBuf>,
}

#[derive(Clone, Debug, Subcommand)]
pub enum SchemaCommands {
    /// List named definitions of the schema version and any that failed to compile.
    Definitions,
    /// Print the JSON Schema of an output type, or list them.
    Output {
        /// Output type name, e.g. `validation_result`.
        name: Option<String>,
    },
}
