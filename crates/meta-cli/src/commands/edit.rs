use std::sync::Arc;

use anyhow::Context;
use meta_changes::{EditSession, PendingChangeStore};
use meta_core::ValidationResult;
use meta_core::document::parse_value;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::EditArgs;
use crate::context::AppContext;
use crate::documents;
use crate::output::output;

#[derive(Debug, Serialize)]
struct Rejected<'a> {
    path: &'a str,
    result: ValidationResult,
}

/// Handle `metaedit edit`.
///
/// Edits are proposed in order; the first rejected edit stops the command and
/// nothing is written. Accepted edits extend an existing `--log`, so repeated
/// runs build one log for the relay.
pub async fn handle(args: &EditArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<bool> {
    let base = documents::read(&args.document)?;
    let mut session = EditSession::new(Arc::clone(&ctx.engine), ctx.version.clone(), base);

    for assignment in &args.sets {
        let (path, raw) = split_assignment(assignment)?;
        let value = parse_value(raw).with_context(|| format!("value for '{path}' is not valid JSON"))?;
        let result = session.propose(path, value).await?;
        if !result.is_valid() {
            output(&Rejected { path, result }, flags.format)?;
            return Ok(false);
        }
    }

    if let Some(log) = &args.log {
        for change in session.changes().list() {
            PendingChangeStore::append_jsonl(log, change)?;
        }
    }
    let merged = session.commit()?;
    documents::emit(args.out.as_deref(), &merged, flags.format)?;
    Ok(true)
}

fn split_assignment(assignment: &str) -> anyhow::Result<(&str, &str)> {
    assignment
        .split_once('=')
        .with_context(|| format!("expected PATH=JSON, got '{assignment}'"))
}
