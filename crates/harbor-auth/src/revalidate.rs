//! Periodic and on-foreground re-validation of the held token.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::backend::{HealthProbe, UserDirectory};
use crate::manager::SessionManager;

/// Default re-validation period.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Re-check the session every `interval`, and whenever `foreground` turns
/// `true`, logging out as soon as the token is found expired.
///
/// Runs until the returned handle is aborted. If the `foreground` sender is
/// dropped only the interval remains.
pub fn spawn_revalidation<D, P>(
    manager: Arc<SessionManager<D, P>>,
    interval: Duration,
    foreground: watch::Receiver<bool>,
) -> JoinHandle<()>
where
    D: UserDirectory + 'static,
    P: HealthProbe + 'static,
{
    let mut foreground = Some(foreground);
    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    tracing::trace!("periodic session check");
                }
                () = regained(&mut foreground) => {
                    tracing::debug!("foreground regained; checking session");
                }
            }
            if let Err(error) = manager.revalidate() {
                tracing::warn!(%error, "session re-validation failed");
            }
        }
    })
}

/// Resolves the next time `foreground` becomes `true`; never once the
/// sender is gone.
async fn regained(foreground: &mut Option<watch::Receiver<bool>>) {
    loop {
        let Some(rx) = foreground.as_mut() else {
            return std::future::pending().await;
        };
        if rx.changed().await.is_err() {
            *foreground = None;
            continue;
        }
        if *rx.borrow_and_update() {
            return;
        }
    }
}
