use harbor_core::YachtSearch;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::CatalogCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `harbor catalog`. Browsing never needs a session.
pub async fn handle(
    action: &CatalogCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        CatalogCommands::List(args) => {
            let yachts = ctx.api.list_yachts(args.available).await?;
            output(&yachts, flags.format)
        }
        CatalogCommands::Get { id } => {
            let yacht = ctx.api.get_yacht(*id).await?;
            output(&yacht, flags.format)
        }
        CatalogCommands::Search(args) => {
            let search = YachtSearch {
                location: args.location.clone(),
                yacht_type: args.yacht_type.clone(),
                min_capacity: args.min_capacity,
                max_price: args.max_price,
            };
            let yachts = ctx.api.search_yachts(&search).await?;
            output(&yachts, flags.format)
        }
    }
}
