//! # harbor-auth
//!
//! Session lifecycle for Harbor.
//!
//! - [`SessionManager`]: restore, login, register, logout, token validity
//! - [`ExpirationWatcher`]: warning and forced-logout timers for the held token
//! - [`spawn_revalidation`]: periodic and on-foreground expiry checks
//! - [`SessionStore`]: persisted `token`/`user` entries ([`FileStore`], [`MemoryStore`])
//! - [`TokenClaims`]: unverified decoding of the token's expiry
//!
//! The manager only talks to the backend through [`UserDirectory`] and
//! [`HealthProbe`], both implemented for [`harbor_api::ApiClient`].

pub mod backend;
pub mod claims;
pub mod clock;
pub mod error;
pub mod manager;
pub mod retry;
pub mod revalidate;
pub mod token_store;
pub mod watcher;

pub use backend::{HealthProbe, UserDirectory};
pub use claims::{TokenClaims, is_token_valid};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::AuthError;
pub use manager::SessionManager;
pub use retry::RetryPolicy;
pub use revalidate::spawn_revalidation;
pub use token_store::{FileStore, MemoryStore, SessionStore, TOKEN_KEY, USER_KEY};
pub use watcher::{ExpirationWatcher, ExpiryHooks, WatcherState};
