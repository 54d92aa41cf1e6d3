//! Expiry timers for the held token.
//!
//! ```text
//! Idle ──arm──→ Armed ──lead reached──→ WarningFired ──exp──→ Expired
//!  ↑              │                         │                   │
//!  └──disarm / re-arm─────────────────────────────────────────────┘
//! ```
//!
//! Every `arm` cancels the previous timers first and bumps a generation
//! counter; a timer that wakes under a stale generation does nothing.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use harbor_core::SessionSnapshot;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::claims::TokenClaims;
use crate::clock::Clock;

/// Default time before expiry at which the warning fires.
pub const DEFAULT_WARNING_LEAD: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatcherState {
    Idle,
    Armed,
    WarningFired,
    Expired,
}

/// What the watcher does when its timers fire.
pub trait ExpiryHooks: Send + Sync + 'static {
    /// The session ends in `remaining`. Offer extend-or-logout.
    fn warn(&self, remaining: Duration);

    /// The session has ended. Show a blocking notice.
    fn expired(&self);

    /// Clear the session.
    fn logout(&self);
}

#[derive(Debug, Clone, Copy)]
enum Timer {
    Warning { remaining: Duration },
    Expiry,
}

struct Inner {
    state: WatcherState,
    generation: u64,
    timers: Vec<JoinHandle<()>>,
}

struct Shared {
    clock: Arc<dyn Clock>,
    hooks: Arc<dyn ExpiryHooks>,
    warning_lead: Duration,
    inner: Mutex<Inner>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn fire(&self, generation: u64, timer: Timer) {
        {
            let mut inner = self.lock();
            if inner.generation != generation {
                return;
            }
            match timer {
                Timer::Warning { .. } => {
                    if inner.state != WatcherState::Armed {
                        return;
                    }
                    inner.state = WatcherState::WarningFired;
                }
                Timer::Expiry => {
                    inner.state = WatcherState::Expired;
                    inner.timers.clear();
                }
            }
        }

        match timer {
            Timer::Warning { remaining } => {
                tracing::info!(remaining_secs = remaining.as_secs(), "session expiring soon");
                self.hooks.warn(remaining);
            }
            Timer::Expiry => {
                tracing::info!("session expired");
                self.hooks.expired();
                self.hooks.logout();
            }
        }
    }
}

/// Cheap to clone; clones share timers and state.
#[derive(Clone)]
pub struct ExpirationWatcher {
    shared: Arc<Shared>,
}

impl ExpirationWatcher {
    pub fn new(clock: Arc<dyn Clock>, hooks: Arc<dyn ExpiryHooks>, warning_lead: Duration) -> Self {
        Self {
            shared: Arc::new(Shared {
                clock,
                hooks,
                warning_lead,
                inner: Mutex::new(Inner {
                    state: WatcherState::Idle,
                    generation: 0,
                    timers: Vec::new(),
                }),
            }),
        }
    }

    #[must_use]
    pub fn state(&self) -> WatcherState {
        self.shared.lock().state
    }

    /// Schedule the warning and expiry for `token`, replacing any previous
    /// schedule. An already expired or undecodable token logs out at once.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn arm(&self, token: &str) {
        let generation = self.reset(WatcherState::Idle);

        let remaining = match TokenClaims::decode(token) {
            Ok(claims) => claims.expires_in(self.shared.clock.now()),
            Err(error) => {
                tracing::warn!(%error, "cannot schedule expiry for undecodable token");
                Duration::ZERO
            }
        };

        if remaining.is_zero() {
            self.shared.lock().state = WatcherState::Expired;
            tracing::info!("token already expired at arm time");
            self.shared.hooks.logout();
            return;
        }

        let warn_after = remaining.saturating_sub(self.shared.warning_lead);
        let timers = vec![
            self.spawn_timer(
                generation,
                warn_after,
                Timer::Warning {
                    remaining: remaining - warn_after,
                },
            ),
            self.spawn_timer(generation, remaining, Timer::Expiry),
        ];

        let mut inner = self.shared.lock();
        if inner.generation == generation {
            inner.state = WatcherState::Armed;
            inner.timers = timers;
            tracing::debug!(
                expires_in_secs = remaining.as_secs(),
                warn_in_secs = warn_after.as_secs(),
                "expiry timers armed"
            );
        } else {
            // Re-armed or disarmed while scheduling.
            for timer in timers {
                timer.abort();
            }
        }
    }

    /// Cancel both timers and return to `Idle`.
    pub fn disarm(&self) {
        self.reset(WatcherState::Idle);
    }

    /// Keep the watcher in step with the session: arm on every new token,
    /// disarm when it is cleared. Stops when the session sender is dropped.
    pub fn follow(&self, mut sessions: watch::Receiver<SessionSnapshot>) -> JoinHandle<()> {
        let watcher = self.clone();
        tokio::spawn(async move {
            let mut current: Option<String> = None;
            loop {
                let token = sessions.borrow_and_update().token.clone();
                if token != current {
                    match &token {
                        Some(token) => watcher.arm(token),
                        None => watcher.disarm(),
                    }
                    current = token;
                }
                if sessions.changed().await.is_err() {
                    break;
                }
            }
            watcher.disarm();
        })
    }

    fn reset(&self, state: WatcherState) -> u64 {
        let mut inner = self.shared.lock();
        inner.generation += 1;
        for timer in inner.timers.drain(..) {
            timer.abort();
        }
        inner.state = state;
        inner.generation
    }

    fn spawn_timer(&self, generation: u64, delay: Duration, timer: Timer) -> JoinHandle<()> {
        let shared = Arc::clone(&self.shared);
        let deadline = tokio::time::Instant::now() + delay;
        tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            shared.fire(generation, timer);
        })
    }
}
