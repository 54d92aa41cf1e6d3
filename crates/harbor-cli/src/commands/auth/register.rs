use harbor_core::{Profile, Registration};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::auth::AuthRegisterArgs;
use crate::context::AppContext;
use crate::output::{notice, output};

#[derive(Serialize)]
struct AuthRegisterResponse {
    registered: bool,
    authenticated: bool,
    profile: Profile,
}

pub async fn handle(
    args: &AuthRegisterArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let registration = Registration {
        name: args.name.trim().to_string(),
        email: args.email.trim().to_string(),
        password: args.password.clone(),
    };
    let profile = ctx.session.register(&registration).await?;
    notice(
        flags.quiet,
        "Account created. Run `harbor auth login` to start a session.",
    );

    output(
        &AuthRegisterResponse {
            registered: true,
            authenticated: false,
            profile,
        },
        flags.format,
    )
}
