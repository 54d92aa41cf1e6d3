use std::sync::Arc;
use std::time::Duration;

use harbor_auth::{
    AuthError, ExpirationWatcher, ExpiryHooks, TokenClaims, WatcherState,
    spawn_revalidation,
};
use serde::Serialize;
use tokio::sync::watch;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::SessionCommands;
use crate::context::{AppContext, Session};
use crate::output::{notice, output};

#[derive(Serialize)]
struct SessionWatchResponse {
    ended: &'static str,
    authenticated: bool,
}

/// Terminal rendition of the expiry prompts.
struct TerminalHooks {
    session: Arc<Session>,
    quiet: bool,
}

impl ExpiryHooks for TerminalHooks {
    fn warn(&self, remaining: Duration) {
        notice(self.quiet, &expiry_notice(remaining));
    }

    fn expired(&self) {
        notice(
            self.quiet,
            "Your session has expired. Run `harbor auth login` to sign in again.",
        );
    }

    fn logout(&self) {
        if let Err(error) = self.session.logout() {
            tracing::warn!(%error, "automatic logout could not clear the session store");
        }
    }
}

/// Tokens cannot be refreshed, so "extending" means logging in again.
fn expiry_notice(remaining: Duration) -> String {
    let secs = remaining.as_secs();
    format!(
        "Your session expires in {}m {:02}s. To keep working, run `harbor auth login` again; \
         press Ctrl-C to stop watching.",
        secs / 60,
        secs % 60
    )
}

/// Handle `harbor session`.
pub async fn handle(
    action: &SessionCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        SessionCommands::Watch => watch_session(ctx, flags).await,
    }
}

async fn watch_session(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let snapshot = ctx.session.restore().await;
    if !snapshot.is_authenticated() {
        return Err(AuthError::Unauthenticated.into());
    }

    let settings = &ctx.config.session;
    let hooks = Arc::new(TerminalHooks {
        session: Arc::clone(&ctx.session),
        quiet: flags.quiet,
    });
    let watcher = ExpirationWatcher::new(
        Arc::clone(ctx.session.clock()),
        hooks,
        Duration::from_secs(settings.warning_lead_secs),
    );
    let follower = watcher.follow(ctx.session.subscribe());

    // A terminal has no visibility changes; only the interval applies.
    let (_visible, foreground) = watch::channel(true);
    let revalidation = spawn_revalidation(
        Arc::clone(&ctx.session),
        Duration::from_secs(settings.revalidate_interval_secs),
        foreground,
    );

    let mut sessions = ctx.session.subscribe();
    let period = Duration::from_secs(settings.notice_repeat_secs.max(1));
    let mut repeat = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let ended = loop {
        tokio::select! {
            _ = &mut ctrl_c => break "interrupted",
            changed = sessions.changed() => {
                if changed.is_err() || !sessions.borrow_and_update().is_authenticated() {
                    break "expired";
                }
            }
            _ = repeat.tick() => {
                if watcher.state() == WatcherState::WarningFired
                    && let Some(remaining) = remaining(&ctx.session)
                {
                    notice(flags.quiet, &expiry_notice(remaining));
                }
            }
        }
    };

    revalidation.abort();
    follower.abort();
    watcher.disarm();

    output(
        &SessionWatchResponse {
            ended,
            authenticated: ctx.session.snapshot().is_authenticated(),
        },
        flags.format,
    )
}

fn remaining(session: &Session) -> Option<Duration> {
    let token = session.token()?;
    let claims = TokenClaims::decode(&token).ok()?;
    Some(claims.expires_in(session.clock().now()))
}
