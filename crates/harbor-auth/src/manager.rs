//! The single owner of the current session.
//!
//! Only [`SessionManager`] writes to the [`SessionStore`]. Everything else
//! observes the session through [`SessionManager::snapshot`] or a
//! [`watch::Receiver`] from [`SessionManager::subscribe`].
//!
//! Concurrent `login`/`restore` calls are not serialized here; callers that
//! can issue them concurrently must prevent it themselves.

use std::future::Future;
use std::sync::Arc;

use harbor_api::ApiError;
use harbor_core::session::preview;
use harbor_core::validation::{validate_login, validate_registration};
use harbor_core::{BackendHealth, LoginRequest, Profile, Registration, SessionSnapshot};
use tokio::sync::watch;

use crate::backend::{HealthProbe, UserDirectory};
use crate::claims;
use crate::clock::Clock;
use crate::error::AuthError;
use crate::retry::{RetryPolicy, retry};
use crate::token_store::{SessionStore, TOKEN_KEY, USER_KEY};

pub struct SessionManager<D, P> {
    directory: D,
    prober: P,
    store: Arc<dyn SessionStore>,
    clock: Arc<dyn Clock>,
    retry: RetryPolicy,
    state: watch::Sender<SessionSnapshot>,
}

/// Clears `is_loading` when dropped, whichever way the operation ends.
struct LoadingGuard<'a> {
    state: &'a watch::Sender<SessionSnapshot>,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.state.send_modify(|s| s.is_loading = false);
    }
}

impl<D, P> SessionManager<D, P>
where
    D: UserDirectory,
    P: HealthProbe,
{
    pub fn new(
        directory: D,
        prober: P,
        store: Arc<dyn SessionStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let (state, _) = watch::channel(SessionSnapshot::default());
        Self {
            directory,
            prober,
            store,
            clock,
            retry: RetryPolicy::default(),
            state,
        }
    }

    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    // ── Observation ──

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    /// Receiver that sees every session change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.state.borrow().token.clone()
    }

    #[must_use]
    pub fn profile(&self) -> Option<Profile> {
        self.state.borrow().profile.clone()
    }

    /// Whether `token` decodes and is unexpired right now.
    #[must_use]
    pub fn is_token_valid(&self, token: &str) -> bool {
        claims::is_token_valid(token, self.clock.now())
    }

    pub const fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Probe the backend and publish the resulting health state.
    pub async fn probe_health(&self) -> BackendHealth {
        let health = self.prober.probe().await;
        tracing::debug!(
            users = health.users,
            catalog = health.catalog,
            bookings = health.bookings,
            "backend probed"
        );
        self.state.send_modify(|s| s.backend = health.state());
        health
    }

    // ── Lifecycle ──

    /// Rebuild the session from persisted storage. Never fails: storage and
    /// refresh problems degrade to an empty or cached session.
    pub async fn restore(&self) -> SessionSnapshot {
        {
            let _loading = self.begin_loading();
            self.restore_session().await;
        }
        self.snapshot()
    }

    async fn restore_session(&self) {
        let token = match self.store.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(error) => {
                tracing::warn!(%error, "could not read persisted session; starting signed out");
                self.clear();
                return;
            }
        };

        let Some(token) = token else {
            self.probe_health().await;
            return;
        };

        if !self.is_token_valid(&token) {
            tracing::info!("persisted token expired; clearing session");
            self.clear();
            return;
        }

        let cached = self.cached_profile();
        self.state.send_modify(|s| s.token = Some(token.clone()));

        let health = self.probe_health().await;
        let profile = if health.can_authenticate() {
            match self.fetch_profile(&token).await {
                Ok(profile) => {
                    self.persist_profile(&profile);
                    Some(profile)
                }
                Err(error) => {
                    tracing::warn!(%error, "profile refresh failed; using cached profile");
                    cached
                }
            }
        } else {
            tracing::info!(
                state = %health.state(),
                "backend unavailable; using cached profile"
            );
            cached
        };

        self.state.send_modify(|s| s.profile = profile);
        tracing::info!(token = %preview(&token), "session restored");
    }

    /// Authenticate and establish a session.
    ///
    /// # Errors
    ///
    /// - `AuthError::Validation` for malformed input (no network call made).
    /// - `AuthError::BackendUnavailable` when the probe fails; no login call is made.
    /// - Errors from the login call itself, unchanged.
    /// - `AuthError::InvalidToken` when the response carries no usable token.
    /// - `AuthError::Store` when the token cannot be persisted.
    pub async fn login(&self, email: &str, password: &str) -> Result<Profile, AuthError> {
        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        validate_login(&request)?;

        let _loading = self.begin_loading();
        let health = self.probe_health().await;
        if !health.can_authenticate() {
            return Err(AuthError::BackendUnavailable { health });
        }

        let response = self.directory.login(&request).await?;
        let token = response
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AuthError::InvalidToken("login response carried no token".into()))?;
        if !self.is_token_valid(&token) {
            return Err(AuthError::InvalidToken(
                "server issued an expired or malformed token".into(),
            ));
        }

        self.store.set(TOKEN_KEY, &token)?;
        self.state.send_modify(|s| s.token = Some(token.clone()));

        let profile = match self.fetch_profile(&token).await {
            Ok(profile) => profile,
            Err(error) => {
                tracing::warn!(%error, "profile fetch failed after login; using fallback");
                response
                    .user
                    .unwrap_or_else(|| Profile::from_email(&request.email))
            }
        };

        self.persist_profile(&profile);
        self.state.send_modify(|s| s.profile = Some(profile.clone()));
        tracing::info!(email = %profile.email, role = %profile.role, "logged in");
        Ok(profile)
    }

    /// Create an account. Sets the returned profile as current but does
    /// not authenticate: no token is stored.
    ///
    /// # Errors
    ///
    /// - `AuthError::Validation` for malformed input (no network call made).
    /// - `AuthError::BackendUnavailable` when the probe fails.
    /// - Errors from the registration call, unchanged.
    pub async fn register(&self, registration: &Registration) -> Result<Profile, AuthError> {
        validate_registration(registration)?;

        let _loading = self.begin_loading();
        let health = self.probe_health().await;
        if !health.can_authenticate() {
            return Err(AuthError::BackendUnavailable { health });
        }

        let profile = self.directory.register(registration).await?;
        self.persist_profile(&profile);
        self.state.send_modify(|s| s.profile = Some(profile.clone()));
        tracing::info!(email = %profile.email, "registered");
        Ok(profile)
    }

    /// Clear the session in memory and on disk. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Store` if persisted entries cannot be removed. The
    /// in-memory session is cleared regardless.
    pub fn logout(&self) -> Result<(), AuthError> {
        let had_session = self.state.borrow().token.is_some();
        self.state.send_modify(|s| {
            s.token = None;
            s.profile = None;
        });
        self.store.remove(TOKEN_KEY)?;
        self.store.remove(USER_KEY)?;
        if had_session {
            tracing::info!("logged out");
        }
        Ok(())
    }

    /// Re-check the held token and log out if it has expired. Returns
    /// whether a valid session remains.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Store` if the automatic logout cannot clear storage.
    pub fn revalidate(&self) -> Result<bool, AuthError> {
        let Some(token) = self.token() else {
            return Ok(false);
        };
        if self.is_token_valid(&token) {
            return Ok(true);
        }
        tracing::info!("held token expired; logging out");
        self.logout()?;
        Ok(false)
    }

    /// Run `call` with the current token.
    ///
    /// # Errors
    ///
    /// - `AuthError::Unauthenticated` when no session is held.
    /// - `AuthError::InvalidToken` when the held token has expired (the
    ///   session is cleared).
    /// - Whatever `call` fails with, converted.
    pub async fn authorized<T, F, Fut>(&self, call: F) -> Result<T, AuthError>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let token = self.token().ok_or(AuthError::Unauthenticated)?;
        if !self.revalidate()? {
            return Err(AuthError::InvalidToken("session expired; log in again".into()));
        }
        Ok(call(token).await?)
    }

    // ── Internals ──

    fn begin_loading(&self) -> LoadingGuard<'_> {
        self.state.send_modify(|s| s.is_loading = true);
        LoadingGuard { state: &self.state }
    }

    async fn fetch_profile(&self, token: &str) -> Result<Profile, AuthError> {
        retry(
            &self.retry,
            |attempt| {
                tracing::debug!(attempt, "fetching profile");
                self.directory.current_user(token)
            },
            AuthError::is_retryable,
        )
        .await
    }

    fn cached_profile(&self) -> Option<Profile> {
        let raw = match self.store.get(USER_KEY) {
            Ok(raw) => raw?,
            Err(error) => {
                tracing::warn!(%error, "could not read cached profile");
                return None;
            }
        };
        match Profile::from_json(&raw) {
            Ok(profile) => Some(profile),
            Err(error) => {
                tracing::warn!(%error, "ignoring unreadable cached profile");
                None
            }
        }
    }

    fn persist_profile(&self, profile: &Profile) {
        let result = profile
            .to_json()
            .map_err(AuthError::from)
            .and_then(|raw| self.store.set(USER_KEY, &raw));
        if let Err(error) = result {
            tracing::warn!(%error, "could not persist profile");
        }
    }

    fn clear(&self) {
        if let Err(error) = self.logout() {
            tracing::warn!(%error, "could not clear persisted session");
        }
    }
}
