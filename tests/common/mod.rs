// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::http::{header, StatusCode};
use axum::{routing::post, Router};
use imagify::config::Config;
use imagify::crypto::MIN_BCRYPT_COST;
use imagify::db::{MemoryStore, UserDirectory};
use imagify::routes::create_router;
use imagify::session::SessionManager;
use imagify::AppState;
use std::sync::Arc;
use std::time::Duration;

/// Smallest valid PNG header, enough to stand in for image bytes.
#[allow(dead_code)]
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

/// Create a test app backed by an in-memory store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (Router, Arc<AppState>) {
    create_test_app_with(Config::test_default())
}

/// Same as [`create_test_app`] with a caller-supplied config.
#[allow(dead_code)]
pub fn create_test_app_with(config: Config) -> (Router, Arc<AppState>) {
    let users = UserDirectory::new(Arc::new(MemoryStore::new()));

    let state = Arc::new(AppState { config, users });

    (create_router(state.clone()), state)
}

/// A fresh session on its own in-memory store.
#[allow(dead_code)]
pub fn test_session() -> (SessionManager, MemoryStore) {
    let store = MemoryStore::new();
    (session_on(&store), store)
}

/// A session sharing `store` (like a second browser tab).
#[allow(dead_code)]
pub fn session_on(store: &MemoryStore) -> SessionManager {
    SessionManager::initialize(Arc::new(store.clone())).with_bcrypt_cost(MIN_BCRYPT_COST)
}

/// A session with a registered, logged-in user holding the starting credits.
#[allow(dead_code)]
pub fn logged_in_session() -> (SessionManager, MemoryStore) {
    let (mut session, store) = test_session();
    session
        .register("Test User", "test@example.com", "password")
        .expect("registration should succeed");
    session.take_events();
    (session, store)
}

/// Serve a fake inference endpoint on a local port. Returns its URL.
#[allow(dead_code)]
pub async fn spawn_inference_stub(
    status: StatusCode,
    content_type: &'static str,
    body: &'static [u8],
    delay: Duration,
) -> String {
    let app = Router::new().route(
        "/",
        post(move || async move {
            tokio::time::sleep(delay).await;
            (status, [(header::CONTENT_TYPE, content_type)], body)
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub listener");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}/", addr)
}
