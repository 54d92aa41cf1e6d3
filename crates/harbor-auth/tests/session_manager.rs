//! Session manager behaviour against scripted backends.

mod common;

use std::sync::Arc;
use std::time::Duration;

use chrono::TimeDelta;
use common::{
    FakeDirectory, FakeProbe, Script, harness, issuing, profile, server_error, token_expiring_in,
    token_from_now, whole_second_now,
};
use harbor_api::ApiError;
use harbor_auth::{
    AuthError, FileStore, ManualClock, MemoryStore, SessionManager, SessionStore, TOKEN_KEY,
    USER_KEY,
};
use harbor_core::{BackendHealth, HealthState, LoginResponse, Profile, Registration, Role};
use pretty_assertions::assert_eq;
use tokio::time::Instant;

fn stored_profile(store: &MemoryStore) -> Option<Profile> {
    store
        .get(USER_KEY)
        .unwrap()
        .map(|raw| Profile::from_json(&raw).unwrap())
}

// ── login ──

#[tokio::test]
async fn happy_login_uses_fetched_profile() {
    let token = token_from_now(3600);
    let h = harness(
        issuing(token.clone(), Box::new(|_| Ok(profile("a@b.com", "A")))),
        FakeProbe::healthy(),
    );

    let result = h.manager.login("a@b.com", "x").await.unwrap();

    assert_eq!(result, profile("a@b.com", "A"));
    let snapshot = h.manager.snapshot();
    assert_eq!(snapshot.token.as_deref(), Some(token.as_str()));
    assert_eq!(snapshot.profile, Some(profile("a@b.com", "A")));
    assert!(!snapshot.is_loading);
    assert_eq!(snapshot.backend, HealthState::Connected);
    assert_eq!(h.store.get(TOKEN_KEY).unwrap(), Some(token));
    assert_eq!(stored_profile(&h.store), Some(profile("a@b.com", "A")));
    assert_eq!(h.directory.me_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn dead_profile_endpoint_falls_back_to_email_profile() {
    let h = harness(
        issuing(token_from_now(3600), Box::new(|_| Err(server_error()))),
        FakeProbe::healthy(),
    );
    let started = Instant::now();

    let result = h.manager.login("a@b.com", "x").await.unwrap();

    assert_eq!(
        result,
        Profile {
            id: None,
            email: "a@b.com".into(),
            display_name: "a".into(),
            role: Role::User,
        }
    );
    assert_eq!(h.directory.me_calls(), 3);
    assert_eq!(started.elapsed(), Duration::from_secs(3));
    assert_eq!(stored_profile(&h.store), Some(result));
    assert!(h.store.get(TOKEN_KEY).unwrap().is_some());
}

#[tokio::test(start_paused = true)]
async fn login_prefers_embedded_profile_when_fetch_fails() {
    let token = token_from_now(3600);
    let h = harness(
        Script {
            login: Box::new(move |_| {
                Ok(LoginResponse {
                    token: Some(token.clone()),
                    user: Some(profile("a@b.com", "Ana")),
                })
            }),
            ..Script::default()
        },
        FakeProbe::healthy(),
    );

    let result = h.manager.login("a@b.com", "x").await.unwrap();

    assert_eq!(result.display_name, "Ana");
}

#[tokio::test(start_paused = true)]
async fn rejected_token_is_not_retried() {
    let h = harness(
        issuing(token_from_now(3600), Box::new(|_| Err(AuthError::Unauthenticated))),
        FakeProbe::healthy(),
    );
    let started = Instant::now();

    h.manager.login("a@b.com", "x").await.unwrap();

    assert_eq!(h.directory.me_calls(), 1);
    assert_eq!(started.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn profile_fetch_recovers_on_second_attempt() {
    let h = harness(
        issuing(
            token_from_now(3600),
            Box::new(|n| {
                if n == 1 {
                    Err(AuthError::Timeout("/api/users/me".into()))
                } else {
                    Ok(profile("a@b.com", "A"))
                }
            }),
        ),
        FakeProbe::healthy(),
    );

    let result = h.manager.login("a@b.com", "x").await.unwrap();

    assert_eq!(result.display_name, "A");
    assert_eq!(h.directory.me_calls(), 2);
}

#[tokio::test]
async fn backend_down_rejects_login_without_calling_it() {
    let h = harness(Script::default(), FakeProbe::down());

    let err = h.manager.login("a@b.com", "x").await.unwrap_err();

    assert!(matches!(err, AuthError::BackendUnavailable { .. }));
    assert_eq!(h.directory.login_calls(), 0);
    assert!(h.store.is_empty());
    assert_eq!(h.manager.snapshot().backend, HealthState::Disconnected);
    assert!(!h.manager.snapshot().is_loading);
}

#[tokio::test]
async fn quorum_without_users_service_still_rejects_login() {
    let h = harness(
        Script::default(),
        FakeProbe::new(BackendHealth {
            users: false,
            catalog: true,
            bookings: true,
        }),
    );

    let err = h.manager.login("a@b.com", "x").await.unwrap_err();

    assert!(matches!(err, AuthError::BackendUnavailable { health } if !health.users));
    assert_eq!(h.directory.login_calls(), 0);
}

#[tokio::test]
async fn bad_credentials_propagate() {
    let h = harness(Script::default(), FakeProbe::healthy());

    let err = h.manager.login("a@b.com", "wrong").await.unwrap_err();

    assert!(matches!(err, AuthError::Unauthenticated));
    assert!(h.manager.snapshot().token.is_none());
}

#[tokio::test]
async fn login_without_token_is_invalid() {
    let h = harness(
        Script {
            login: Box::new(|_| Ok(LoginResponse::default())),
            ..Script::default()
        },
        FakeProbe::healthy(),
    );

    let err = h.manager.login("a@b.com", "x").await.unwrap_err();

    assert!(matches!(err, AuthError::InvalidToken(_)));
    assert!(h.store.get(TOKEN_KEY).unwrap().is_none());
}

#[tokio::test]
async fn already_expired_token_from_server_is_invalid() {
    let h = harness(
        issuing(token_from_now(-5), Box::new(|_| Err(server_error()))),
        FakeProbe::healthy(),
    );

    let err = h.manager.login("a@b.com", "x").await.unwrap_err();

    assert!(matches!(err, AuthError::InvalidToken(_)));
    assert!(h.store.is_empty());
    assert_eq!(h.directory.me_calls(), 0);
}

#[tokio::test]
async fn malformed_email_fails_before_any_network_call() {
    let h = harness(Script::default(), FakeProbe::healthy());

    let err = h.manager.login("not-an-email", "x").await.unwrap_err();

    assert!(matches!(err, AuthError::Validation(_)));
    assert_eq!(h.probe.calls(), 0);
    assert_eq!(h.directory.login_calls(), 0);
}

// ── restore ──

#[tokio::test]
async fn expired_token_restore_clears_storage() {
    let h = harness(Script::default(), FakeProbe::healthy());
    let token = token_expiring_in(&*h.clock, -10);
    h.store.set(TOKEN_KEY, &token).unwrap();
    h.store
        .set(USER_KEY, &profile("a@b.com", "A").to_json().unwrap())
        .unwrap();

    let snapshot = h.manager.restore().await;

    assert!(snapshot.token.is_none());
    assert!(snapshot.profile.is_none());
    assert!(!snapshot.is_loading);
    assert!(h.store.is_empty());
    assert_eq!(h.directory.me_calls(), 0);
}

#[tokio::test]
async fn restore_without_token_only_probes() {
    let h = harness(Script::default(), FakeProbe::healthy());

    let snapshot = h.manager.restore().await;

    assert!(!snapshot.is_authenticated());
    assert_eq!(snapshot.backend, HealthState::Connected);
    assert_eq!(h.probe.calls(), 1);
    assert_eq!(h.directory.me_calls(), 0);
}

#[tokio::test]
async fn restore_refreshes_profile_when_healthy() {
    let h = harness(
        Script {
            me: Box::new(|_| Ok(profile("a@b.com", "Fresh"))),
            ..Script::default()
        },
        FakeProbe::healthy(),
    );
    let token = token_expiring_in(&*h.clock, 3600);
    h.store.set(TOKEN_KEY, &token).unwrap();
    h.store
        .set(USER_KEY, &profile("a@b.com", "Stale").to_json().unwrap())
        .unwrap();

    let snapshot = h.manager.restore().await;

    assert_eq!(snapshot.token, Some(token));
    assert_eq!(snapshot.profile, Some(profile("a@b.com", "Fresh")));
    assert_eq!(stored_profile(&h.store), Some(profile("a@b.com", "Fresh")));
}

#[tokio::test]
async fn restore_keeps_cached_profile_when_backend_down() {
    let h = harness(Script::default(), FakeProbe::down());
    let token = token_expiring_in(&*h.clock, 3600);
    h.store.set(TOKEN_KEY, &token).unwrap();
    h.store
        .set(USER_KEY, &profile("a@b.com", "Cached").to_json().unwrap())
        .unwrap();

    let snapshot = h.manager.restore().await;

    assert_eq!(snapshot.token, Some(token));
    assert_eq!(snapshot.profile, Some(profile("a@b.com", "Cached")));
    assert_eq!(snapshot.backend, HealthState::Disconnected);
    assert_eq!(h.directory.me_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn restore_survives_failing_refresh() {
    let h = harness(
        Script {
            me: Box::new(|_| Err(server_error())),
            ..Script::default()
        },
        FakeProbe::healthy(),
    );
    let token = token_expiring_in(&*h.clock, 3600);
    h.store.set(TOKEN_KEY, &token).unwrap();
    h.store
        .set(USER_KEY, &profile("a@b.com", "Cached").to_json().unwrap())
        .unwrap();

    let snapshot = h.manager.restore().await;

    assert_eq!(snapshot.profile, Some(profile("a@b.com", "Cached")));
    assert_eq!(h.directory.me_calls(), 3);
}

#[tokio::test]
async fn unreadable_cached_profile_is_ignored() {
    let h = harness(Script::default(), FakeProbe::down());
    let token = token_expiring_in(&*h.clock, 3600);
    h.store.set(TOKEN_KEY, &token).unwrap();
    h.store.set(USER_KEY, "{broken").unwrap();

    let snapshot = h.manager.restore().await;

    assert_eq!(snapshot.token, Some(token));
    assert!(snapshot.profile.is_none());
}

// ── register / logout ──

#[tokio::test]
async fn register_sets_profile_without_authenticating() {
    let h = harness(
        Script {
            register: Box::new(|_| Ok(profile("new@b.com", "New"))),
            ..Script::default()
        },
        FakeProbe::healthy(),
    );
    let registration = Registration {
        name: "New".into(),
        email: "new@b.com".into(),
        password: "Sailing42".into(),
    };

    let result = h.manager.register(&registration).await.unwrap();

    assert_eq!(result, profile("new@b.com", "New"));
    let snapshot = h.manager.snapshot();
    assert!(snapshot.token.is_none());
    assert_eq!(snapshot.profile, Some(profile("new@b.com", "New")));
    assert!(h.store.get(TOKEN_KEY).unwrap().is_none());
}

#[tokio::test]
async fn register_rejects_weak_password_locally() {
    let h = harness(Script::default(), FakeProbe::healthy());
    let registration = Registration {
        name: "New".into(),
        email: "new@b.com".into(),
        password: "aaaaaa".into(),
    };

    let err = h.manager.register(&registration).await.unwrap_err();

    assert!(matches!(err, AuthError::Validation(_)));
    assert_eq!(h.directory.register_calls(), 0);
}

#[tokio::test]
async fn register_requires_backend() {
    let h = harness(Script::default(), FakeProbe::down());
    let registration = Registration {
        name: "New".into(),
        email: "new@b.com".into(),
        password: "Sailing42".into(),
    };

    let err = h.manager.register(&registration).await.unwrap_err();

    assert!(matches!(err, AuthError::BackendUnavailable { .. }));
    assert_eq!(h.directory.register_calls(), 0);
}

#[tokio::test]
async fn logout_twice_leaves_empty_session() {
    let h = harness(
        Script {
            me: Box::new(|_| Ok(profile("a@b.com", "A"))),
            ..Script::default()
        },
        FakeProbe::healthy(),
    );
    h.store
        .set(TOKEN_KEY, &token_expiring_in(&*h.clock, 3600))
        .unwrap();
    h.manager.restore().await;
    assert!(h.manager.snapshot().is_authenticated());

    h.manager.logout().unwrap();
    assert!(!h.manager.snapshot().is_authenticated());
    assert!(h.manager.snapshot().profile.is_none());
    h.manager.logout().unwrap();
    assert!(!h.manager.snapshot().is_authenticated());
    assert!(h.store.is_empty());
}

// ── re-validation and the authorized gate ──

#[tokio::test]
async fn revalidate_logs_out_once_token_expires() {
    let h = harness(Script::default(), FakeProbe::down());
    h.store
        .set(TOKEN_KEY, &token_expiring_in(&*h.clock, 60))
        .unwrap();
    h.manager.restore().await;

    assert!(h.manager.revalidate().unwrap());
    h.clock.advance(TimeDelta::seconds(61));
    assert!(!h.manager.revalidate().unwrap());

    assert!(h.manager.snapshot().token.is_none());
    assert!(h.store.is_empty());
}

#[tokio::test]
async fn authorized_requires_a_session() {
    let h = harness(Script::default(), FakeProbe::healthy());

    let err = h
        .manager
        .authorized(|_token| async { Ok::<_, ApiError>(()) })
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::Unauthenticated));
}

#[tokio::test]
async fn authorized_passes_the_held_token() {
    let h = harness(Script::default(), FakeProbe::down());
    let token = token_expiring_in(&*h.clock, 3600);
    h.store.set(TOKEN_KEY, &token).unwrap();
    h.manager.restore().await;

    let seen = h
        .manager
        .authorized(|token| async move { Ok::<_, ApiError>(token) })
        .await
        .unwrap();

    assert_eq!(seen, token);
}

#[tokio::test]
async fn authorized_maps_call_errors() {
    let h = harness(Script::default(), FakeProbe::down());
    h.store
        .set(TOKEN_KEY, &token_expiring_in(&*h.clock, 3600))
        .unwrap();
    h.manager.restore().await;

    let err = h
        .manager
        .authorized(|_| async {
            Err::<(), _>(ApiError::Forbidden {
                url: "/api/catalog/yachts".into(),
            })
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::Forbidden));
}

#[tokio::test]
async fn authorized_rejects_expired_session() {
    let h = harness(Script::default(), FakeProbe::down());
    h.store
        .set(TOKEN_KEY, &token_expiring_in(&*h.clock, 30))
        .unwrap();
    h.manager.restore().await;
    h.clock.advance(TimeDelta::seconds(31));

    let err = h
        .manager
        .authorized(|_| async { Ok::<_, ApiError>(()) })
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::InvalidToken(_)));
    assert!(h.manager.snapshot().token.is_none());
}

#[tokio::test]
async fn subscribers_see_login() {
    let h = harness(
        issuing(token_from_now(3600), Box::new(|_| Ok(profile("a@b.com", "A")))),
        FakeProbe::healthy(),
    );
    let mut rx = h.manager.subscribe();

    h.manager.login("a@b.com", "x").await.unwrap();

    assert!(rx.has_changed().unwrap());
    let seen = rx.borrow_and_update().clone();
    assert!(seen.is_authenticated());
    assert!(!seen.is_loading);
}

#[tokio::test]
async fn corrupt_session_file_does_not_block_logout_or_login() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, "{not json").unwrap();

    let token = token_from_now(3600);
    let manager = SessionManager::new(
        FakeDirectory::new(issuing(
            token.clone(),
            Box::new(|_| Ok(profile("a@b.com", "A"))),
        )),
        FakeProbe::healthy(),
        Arc::new(FileStore::new(&path)),
        Arc::new(ManualClock::new(whole_second_now())),
    );

    let snapshot = manager.restore().await;
    assert!(snapshot.token.is_none());
    assert!(!path.exists());

    std::fs::write(&path, "{not json").unwrap();
    manager.logout().unwrap();
    assert!(!path.exists());

    std::fs::write(&path, "{not json").unwrap();
    manager.login("a@b.com", "x").await.unwrap();
    let reopened = FileStore::new(&path);
    assert_eq!(reopened.get(TOKEN_KEY).unwrap(), Some(token));
    assert!(reopened.get(USER_KEY).unwrap().is_some());
}
