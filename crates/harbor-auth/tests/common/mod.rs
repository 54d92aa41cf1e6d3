//! Scripted backends and token helpers for session tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use harbor_auth::{
    AuthError, Clock, HealthProbe, ManualClock, MemoryStore, SessionManager, UserDirectory,
};
use harbor_core::{BackendHealth, LoginRequest, LoginResponse, Profile, Registration, Role};

type Reply<T> = Box<dyn Fn(u32) -> Result<T, AuthError> + Send + Sync>;

/// Scripted answers; each closure receives the 1-based call number.
pub struct Script {
    pub login: Reply<LoginResponse>,
    pub me: Reply<Profile>,
    pub register: Reply<Profile>,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            login: Box::new(|_| Err(AuthError::Unauthenticated)),
            me: Box::new(|_| Err(server_error())),
            register: Box::new(|_| Err(server_error())),
        }
    }
}

#[derive(Default)]
pub struct Calls {
    pub login: AtomicU32,
    pub me: AtomicU32,
    pub register: AtomicU32,
}

#[derive(Clone)]
pub struct FakeDirectory {
    script: Arc<Script>,
    pub calls: Arc<Calls>,
}

impl FakeDirectory {
    pub fn new(script: Script) -> Self {
        Self {
            script: Arc::new(script),
            calls: Arc::default(),
        }
    }

    pub fn login_calls(&self) -> u32 {
        self.calls.login.load(Ordering::SeqCst)
    }

    pub fn me_calls(&self) -> u32 {
        self.calls.me.load(Ordering::SeqCst)
    }

    pub fn register_calls(&self) -> u32 {
        self.calls.register.load(Ordering::SeqCst)
    }
}

impl UserDirectory for FakeDirectory {
    async fn login(&self, _request: &LoginRequest) -> Result<LoginResponse, AuthError> {
        let n = self.calls.login.fetch_add(1, Ordering::SeqCst) + 1;
        (self.script.login)(n)
    }

    async fn register(&self, _registration: &Registration) -> Result<Profile, AuthError> {
        let n = self.calls.register.fetch_add(1, Ordering::SeqCst) + 1;
        (self.script.register)(n)
    }

    async fn current_user(&self, _token: &str) -> Result<Profile, AuthError> {
        let n = self.calls.me.fetch_add(1, Ordering::SeqCst) + 1;
        (self.script.me)(n)
    }
}

#[derive(Clone)]
pub struct FakeProbe {
    health: Arc<Mutex<BackendHealth>>,
    calls: Arc<AtomicU32>,
}

impl FakeProbe {
    pub fn new(health: BackendHealth) -> Self {
        Self {
            health: Arc::new(Mutex::new(health)),
            calls: Arc::default(),
        }
    }

    pub fn healthy() -> Self {
        Self::new(BackendHealth::all_alive())
    }

    pub fn down() -> Self {
        Self::new(BackendHealth::default())
    }

    pub fn set(&self, health: BackendHealth) {
        *self.health.lock().unwrap() = health;
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl HealthProbe for FakeProbe {
    async fn probe(&self) -> BackendHealth {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.health.lock().unwrap()
    }
}

pub struct Harness {
    pub manager: Arc<SessionManager<FakeDirectory, FakeProbe>>,
    pub directory: FakeDirectory,
    pub probe: FakeProbe,
    pub store: Arc<MemoryStore>,
    pub clock: Arc<ManualClock>,
}

pub fn harness(script: Script, probe: FakeProbe) -> Harness {
    harness_with_store(script, probe, Arc::new(MemoryStore::new()))
}

pub fn harness_with_store(script: Script, probe: FakeProbe, store: Arc<MemoryStore>) -> Harness {
    let directory = FakeDirectory::new(script);
    let clock = Arc::new(ManualClock::new(whole_second_now()));
    let manager = SessionManager::new(
        directory.clone(),
        probe.clone(),
        store.clone(),
        clock.clone(),
    );
    Harness {
        manager: Arc::new(manager),
        directory,
        probe,
        store,
        clock,
    }
}

pub fn whole_second_now() -> DateTime<Utc> {
    DateTime::from_timestamp(Utc::now().timestamp(), 0).unwrap()
}

/// A token whose `exp` is `secs` from `clock`'s now.
pub fn token_expiring_in(clock: &dyn Clock, secs: i64) -> String {
    let exp = clock.now().timestamp() + secs;
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"a@b.com","exp":{exp}}}"#));
    let signature = URL_SAFE_NO_PAD.encode("fake_sig");
    format!("{header}.{payload}.{signature}")
}

pub fn profile(email: &str, name: &str) -> Profile {
    Profile {
        id: None,
        email: email.to_string(),
        display_name: name.to_string(),
        role: Role::User,
    }
}

pub fn server_error() -> AuthError {
    AuthError::Api {
        status: 500,
        message: "Internal Server Error".into(),
    }
}

/// A token whose `exp` is `secs` from the current wall-clock second.
pub fn token_from_now(secs: i64) -> String {
    token_expiring_in(&ManualClock::new(whole_second_now()), secs)
}

/// Script whose login issues `token` and whose profile endpoint uses `me`.
pub fn issuing(token: String, me: Reply<Profile>) -> Script {
    Script {
        login: Box::new(move |_| {
            Ok(LoginResponse {
                token: Some(token.clone()),
                user: None,
            })
        }),
        me,
        ..Script::default()
    }
}
