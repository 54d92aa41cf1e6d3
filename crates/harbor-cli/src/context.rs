use std::sync::Arc;

use anyhow::Context;
use harbor_api::ApiClient;
use harbor_auth::{FileStore, RetryPolicy, SessionManager, SystemClock};
use harbor_config::HarborConfig;

pub type Session = SessionManager<ApiClient, ApiClient>;

/// Everything a command handler needs, built once per invocation.
pub struct AppContext {
    pub config: HarborConfig,
    pub api: ApiClient,
    pub session: Arc<Session>,
}

impl AppContext {
    pub fn init(config: HarborConfig) -> anyhow::Result<Self> {
        let api = ApiClient::new(&config).context("failed to build HTTP clients")?;
        let store_path = config.session.resolved_store_path()?;
        tracing::debug!(path = %store_path.display(), "session store");

        let session = SessionManager::new(
            api.clone(),
            api.clone(),
            Arc::new(FileStore::new(store_path)),
            Arc::new(SystemClock),
        )
        .with_retry(RetryPolicy::from_config(&config.session));

        Ok(Self {
            config,
            api,
            session: Arc::new(session),
        })
    }

    /// Restore the persisted session and return the signed-in user's id.
    pub async fn signed_in_user_id(&self) -> anyhow::Result<String> {
        let snapshot = self.session.restore().await;
        if !snapshot.is_authenticated() {
            anyhow::bail!(harbor_auth::AuthError::Unauthenticated);
        }
        snapshot
            .profile
            .and_then(|profile| profile.id)
            .context("session profile has no user id; log in again while the backend is reachable")
    }
}
