use anyhow::Context;
use meta_core::DocPath;
use meta_core::document::parse_value;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ValidateArgs;
use crate::context::AppContext;
use crate::documents;
use crate::output::output;

/// Handle `metaedit validate`.
pub async fn handle(args: &ValidateArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<bool> {
    let document = documents::read(&args.document)?;

    let result = match (&args.path, &args.value) {
        (Some(path), Some(value)) => {
            let path = DocPath::parse(path)?;
            let value = parse_value(value).context("--value is not valid JSON")?;
            ctx.engine
                .validate_change(ctx.version(), &path, &value, &document)
                .await?
        }
        _ => ctx.engine.validate_document(ctx.version(), &document).await?,
    };

    output(&result, flags.format)?;
    Ok(result.is_valid())
}
