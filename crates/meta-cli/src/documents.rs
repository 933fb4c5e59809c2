//! Reading and writing JSON files named on the command line.

use std::path::Path;

use anyhow::Context;
use meta_core::document::parse_value;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::output::render;

pub fn read(path: &Path) -> anyhow::Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_value(&text).with_context(|| format!("{} is not a JSON document", path.display()))
}

pub fn write(path: &Path, value: &Value, format: OutputFormat) -> anyhow::Result<()> {
    let mut text = render(value, format)?;
    text.push('\n');
    std::fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))
}

/// Write `value` to `out` if given, print it otherwise.
pub fn emit(out: Option<&Path>, value: &Value, format: OutputFormat) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            write(path, value, format)?;
            tracing::info!(path = %path.display(), "document written");
            Ok(())
        }
        None => crate::output::output(value, format),
    }
}
