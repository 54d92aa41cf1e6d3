pub mod auth;
pub mod booking;
pub mod catalog;
pub mod health;
pub mod session;

use crate::cli::{Commands, GlobalFlags};
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Auth { action } => auth::handle(&action, ctx, flags).await,
        Commands::Health => health::handle(ctx, flags).await,
        Commands::Catalog { action } => catalog::handle(&action, ctx, flags).await,
        Commands::Booking { action } => booking::handle(&action, ctx, flags).await,
        Commands::Session { action } => session::handle(&action, ctx, flags).await,
    }
}
