use harbor_core::Role;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::auth::AuthLoginArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct AuthLoginResponse {
    authenticated: bool,
    email: String,
    name: String,
    role: Role,
    expires_at: Option<String>,
}

pub async fn handle(args: &AuthLoginArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let profile = ctx.session.login(&args.email, &args.password).await?;
    let expires_at = ctx
        .session
        .token()
        .and_then(|token| harbor_auth::TokenClaims::decode(&token).ok())
        .map(|claims| claims.expires_at.to_rfc3339());

    output(
        &AuthLoginResponse {
            authenticated: true,
            email: profile.email,
            name: profile.display_name,
            role: profile.role,
            expires_at,
        },
        flags.format,
    )
}
