//! Shared fixtures for tests against a stub backend.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use shiftcheck_core::api::json::fold_keys;
use shiftcheck_core::api::{build_http_client, ApiClient};
use shiftcheck_core::auth::credentials::{FULL_NAME_KEY, TOKEN_KEY, USERNAME_KEY, USER_ID_KEY};
use shiftcheck_core::auth::{CredentialStore, MemoryStore, SessionManager};
use shiftcheck_core::models::Sample;
use wiremock::MockServer;

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub session: Arc<SessionManager>,
    pub api: ApiClient,
}

pub fn base_url(server: &MockServer) -> String {
    format!("{}/api/", server.uri())
}

pub fn harness_with_timeout(base_url: &str, timeout: Duration) -> Harness {
    let store = Arc::new(MemoryStore::new());
    let http = build_http_client(timeout).unwrap();
    let session = Arc::new(SessionManager::new(store.clone(), http.clone(), base_url));
    let api = ApiClient::new(http, base_url, session.clone());
    Harness { store, session, api }
}

pub fn harness(server: &MockServer) -> Harness {
    harness_with_timeout(&base_url(server), Duration::from_secs(30))
}

/// Persist a session as a previous login would have
pub fn log_in(store: &MemoryStore, token: &str, user_id: i64) {
    store.set(TOKEN_KEY, token).unwrap();
    store.set(USERNAME_KEY, "tech1").unwrap();
    store.set(FULL_NAME_KEY, "Jane Tech").unwrap();
    store.set(USER_ID_KEY, &user_id.to_string()).unwrap();
}

pub fn sample_json(id: i64) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "folio": 1000 + id,
        "clientId": 5,
        "patientId": 50 + id,
        "examName": "Biometría hemática",
        "createdAt": "2024-01-15T06:00:00",
        "receivedAt": "2024-01-15T06:30:00",
        "processedAt": null,
        "validatedAt": null,
        "location": "Hematología",
        "priority": "Normal"
    })
}

pub fn sample(id: i64) -> Sample {
    serde_json::from_value(fold_keys(sample_json(id))).unwrap()
}
