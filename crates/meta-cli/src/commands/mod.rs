pub mod apply;
pub mod diff;
pub mod edit;
pub mod schema;
pub mod validate;

use crate::cli::{Commands, GlobalFlags};
use crate::context::AppContext;

/// Dispatch a parsed command to its handler.
///
/// Returns `Ok(false)` when the command ran but the input was rejected.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<bool> {
    match command {
        Commands::Validate(args) => validate::handle(&args, ctx, flags).await,
        Commands::Diff(args) => diff::handle(&args, flags),
        Commands::Apply(args) => apply::handle(&args, flags),
        Commands::Edit(args) => edit::handle(&args, ctx, flags).await,
        Commands::Schema { action } => schema::handle(&action, ctx, flags).await,
    }
}
