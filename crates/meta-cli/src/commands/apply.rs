use meta_changes::PendingChangeStore;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ApplyArgs;
use crate::documents;

/// Handle `metaedit apply`.
pub fn handle(args: &ApplyArgs, flags: &GlobalFlags) -> anyhow::Result<bool> {
    let base = documents::read(&args.base)?;
    let mut changes = PendingChangeStore::read_jsonl(&args.changes)?;
    if args.squash {
        changes = changes.squash();
    }

    let merged = changes.apply_to(&base)?;
    documents::emit(args.out.as_deref(), &merged, flags.format)?;
    Ok(true)
}
