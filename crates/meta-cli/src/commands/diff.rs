use meta_changes::{PendingChangeStore, diff};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::DiffArgs;
use crate::documents;
use crate::output::output;

#[derive(Debug, Serialize)]
struct LogWritten {
    path: String,
    changes: usize,
}

/// Handle `metaedit diff`.
pub fn handle(args: &DiffArgs, flags: &GlobalFlags) -> anyhow::Result<bool> {
    let old = documents::read(&args.old)?;
    let new = documents::read(&args.new)?;
    let changes: PendingChangeStore = diff(&old, &new)?.into_iter().collect();

    match &args.out {
        Some(path) => {
            changes.write_jsonl(path)?;
            output(
                &LogWritten {
                    path: path.display().to_string(),
                    changes: changes.len(),
                },
                flags.format,
            )?;
        }
        None => output(changes.list(), flags.format)?,
    }
    Ok(true)
}
