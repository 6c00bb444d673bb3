//! Shared helpers for the integration suites.
#![allow(dead_code)]

use std::sync::Arc;

use papi::api::PapiClient;
use papi::session::Session;
use papi::types::User;
use tempfile::TempDir;

/// The token every logged-in test client holds.
pub const TEST_TOKEN: &str = "test-token";

/// A client with an established session against the given mock server.
///
/// The TempDir keeps the token file alive for the test's duration.
pub fn logged_in_client(base_url: &str) -> (PapiClient, TempDir) {
    let dir = TempDir::new().expect("tempdir");
    let session = Arc::new(Session::new(dir.path().join("session.json")));
    session
        .login(test_user(), TEST_TOKEN.to_string())
        .expect("login");
    (PapiClient::new(base_url, session), dir)
}

/// A client with no session at all.
pub fn anonymous_client(base_url: &str) -> (PapiClient, TempDir) {
    let dir = TempDir::new().expect("tempdir");
    let session = Arc::new(Session::new(dir.path().join("session.json")));
    (PapiClient::new(base_url, session), dir)
}

pub fn test_user() -> User {
    User {
        id: "u1".to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email: "ada@example.com".to_string(),
    }
}
