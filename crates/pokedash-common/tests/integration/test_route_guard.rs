use std::sync::Arc;

use jsonwebtoken::{EncodingKey, Header};
use pokedash_common::{
    guard::{is_authorized, Navigation, RouteGuard},
    session::{Session, SessionData},
    storage::FileStorage,
};
use serde_json::json;
use time::OffsetDateTime;

fn token(claims: serde_json::Value) -> String {
    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"backend-secret"),
    )
    .unwrap()
}

fn now() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}

#[test_log::test]
fn expired_session_redirects_to_login() {
    let session = Session::default();
    session
        .store_access_token(&token(json!({ "exp": now() - 100 })))
        .unwrap();

    assert!(!is_authorized(session.access_token().unwrap().as_deref()));
    assert_eq!(
        RouteGuard::new(session).check(),
        Navigation::Redirect("/login")
    );
}

#[test_log::test]
fn tokens_without_exp_or_with_odd_exp_are_rejected() {
    assert!(!is_authorized(Some(token(json!({ "sub": "1" })).as_str())));
    assert!(!is_authorized(Some(token(json!({ "exp": "tomorrow" })).as_str())));
    assert!(!is_authorized(Some(token(json!({ "exp": null })).as_str())));
}

#[test_log::test]
fn guard_reads_a_persisted_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    Session::new(Arc::new(FileStorage::new(&path)))
        .store_login(&SessionData {
            access_token: token(json!({ "exp": now() + 600, "username": "ash" })),
            refresh_token: Some("r1".to_string()),
            username: Some("ash".to_string()),
            role: Some("trainer".to_string()),
        })
        .unwrap();

    let reloaded = Session::new(Arc::new(FileStorage::new(&path)));
    assert_eq!(RouteGuard::new(reloaded.clone()).check(), Navigation::Render);

    reloaded.clear().unwrap();
    assert_eq!(
        RouteGuard::new(reloaded).check(),
        Navigation::Redirect("/login")
    );
}

#[test_log::test]
fn unreadable_storage_redirects() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, "garbage").unwrap();

    let session = Session::new(Arc::new(FileStorage::new(&path)));
    assert_eq!(
        RouteGuard::new(session).check(),
        Navigation::Redirect("/login")
    );
}
