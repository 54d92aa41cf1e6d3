use anyhow::Context;
use harbor_core::NewBooking;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::BookingCommands;
use crate::cli::subcommands::booking::BookingCreateArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct BookingCancelResponse {
    id: i64,
    cancelled: bool,
}

/// Handle `harbor booking`. Every call goes through the session gate.
pub async fn handle(
    action: &BookingCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let api = &ctx.api;
    match action {
        BookingCommands::Create(args) => create(args, ctx, flags).await,
        BookingCommands::List => {
            ctx.session.restore().await;
            let bookings = ctx
                .session
                .authorized(|token| async move { api.list_bookings(&token).await })
                .await?;
            output(&bookings, flags.format)
        }
        BookingCommands::Get { id } => {
            ctx.session.restore().await;
            let booking = ctx
                .session
                .authorized(|token| async move { api.get_booking(*id, &token).await })
                .await?;
            output(&booking, flags.format)
        }
        BookingCommands::Cancel { id } => {
            ctx.session.restore().await;
            ctx.session
                .authorized(|token| async move { api.delete_booking(*id, &token).await })
                .await?;
            output(
                &BookingCancelResponse {
                    id: *id,
                    cancelled: true,
                },
                flags.format,
            )
        }
        BookingCommands::Pay { id } => {
            ctx.session.restore().await;
            let booking = ctx
                .session
                .authorized(|token| async move { api.confirm_payment(*id, &token).await })
                .await?;
            output(&booking, flags.format)
        }
    }
}

async fn create(args: &BookingCreateArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let user_id = ctx.signed_in_user_id().await?;
    let yacht = ctx
        .api
        .get_yacht(args.yacht)
        .await
        .with_context(|| format!("failed to load yacht {}", args.yacht))?;
    let booking = NewBooking::quote(&user_id, &yacht, args.start, args.end)?;
    tracing::debug!(
        yacht = booking.yacht_id,
        total = booking.total_price,
        "booking quoted"
    );

    let api = &ctx.api;
    let booking = &booking;
    let created = ctx
        .session
        .authorized(|token| async move { api.create_booking(booking, &token).await })
        .await?;
    output(&created, flags.format)
}
