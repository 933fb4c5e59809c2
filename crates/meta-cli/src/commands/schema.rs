use meta_schema::{CompileWarning, OutputSchemas};
use serde::Serialize;

use crate::cli::root_commands::SchemaCommands;
use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct Definitions<'a> {
    version: &'a str,
    definitions: Vec<&'a str>,
    skipped: &'a [CompileWarning],
}

/// Handle `metaedit schema`.
pub async fn handle(action: &SchemaCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<bool> {
    match action {
        SchemaCommands::Definitions => {
            let schema = ctx.engine.registry().get_or_fetch(ctx.version()).await?;
            output(
                &Definitions {
                    version: schema.version(),
                    definitions: schema.named_types(),
                    skipped: schema.warnings(),
                },
                flags.format,
            )?;
            Ok(true)
        }
        SchemaCommands::Output { name } => handle_output(name.as_deref(), flags),
    }
}

/// Handle `metaedit schema output`, which needs no configuration.
pub fn handle_output(name: Option<&str>, flags: &GlobalFlags) -> anyhow::Result<bool> {
    let catalog = OutputSchemas::new();
    match name {
        Some(name) => output(catalog.require(name)?, flags.format)?,
        None => output(&catalog.list(), flags.format)?,
    }
    Ok(true)
}
