use harbor_auth::TokenClaims;
use harbor_core::{HealthState, Role};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct AuthStatusResponse {
    authenticated: bool,
    email: Option<String>,
    name: Option<String>,
    role: Option<Role>,
    token: Option<String>,
    expires_at: Option<String>,
    backend: HealthState,
    note: Option<String>,
}

pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let snapshot = ctx.session.restore().await;
    let expires_at = snapshot
        .token
        .as_deref()
        .and_then(|token| TokenClaims::decode(token).ok())
        .map(|claims| claims.expires_at.to_rfc3339());
    let note = match (&snapshot.token, &snapshot.profile) {
        (None, Some(_)) => Some("registered but not logged in".to_string()),
        (None, None) => Some("no valid session found".to_string()),
        (Some(_), None) => Some("profile unavailable while the backend is unreachable".to_string()),
        (Some(_), Some(_)) => None,
    };

    let status = AuthStatusResponse {
        authenticated: snapshot.is_authenticated(),
        token: snapshot.token_preview(),
        email: snapshot.profile.as_ref().map(|p| p.email.clone()),
        name: snapshot.profile.as_ref().map(|p| p.display_name.clone()),
        role: snapshot.profile.as_ref().map(|p| p.role),
        expires_at,
        backend: snapshot.backend,
        note,
    };

    output(&status, flags.format)
}
