// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Image generation workflow tests.
//!
//! Remote paths run against a local stub server standing in for the
//! inference API.

use axum::http::StatusCode;
use imagify::services::InferenceClient;
use imagify::session::{GenerationOutcome, GenerationWorkflow, UiEvent, View, STARTING_CREDITS};
use std::sync::atomic::Ordering;
use std::time::Duration;

mod common;
use common::{logged_in_session, spawn_inference_stub, test_session, PNG_BYTES};

fn demo_workflow() -> GenerationWorkflow {
    GenerationWorkflow::new(None, Duration::ZERO)
}

fn remote_workflow(url: String, timeout: Duration) -> GenerationWorkflow {
    let client = InferenceClient::new(url, "hf_test".to_string(), timeout).unwrap();
    GenerationWorkflow::new(Some(client), Duration::ZERO)
}

#[tokio::test]
async fn test_no_user_requests_login_without_side_effects() {
    let (mut session, _) = test_session();
    let workflow = demo_workflow();

    let outcome = workflow.request_generation(&mut session, "a cat").await;

    assert_eq!(outcome, GenerationOutcome::LoginRequired);
    assert!(session.show_login());
    assert_eq!(session.take_events(), vec![UiEvent::ShowLogin]);
    assert!(session.history().is_empty());
    assert_eq!(session.credits(), 0);
}

#[tokio::test]
async fn test_no_credits_redirects_to_pricing_without_side_effects() {
    let (mut session, _) = logged_in_session();
    assert!(session.spend_credit(STARTING_CREDITS));
    let workflow = demo_workflow();

    let outcome = workflow.request_generation(&mut session, "a cat").await;

    assert_eq!(outcome, GenerationOutcome::PricingRequired);
    assert_eq!(session.take_events(), vec![UiEvent::Navigate(View::Pricing)]);
    assert!(session.history().is_empty());
    assert_eq!(session.credits(), 0);
}

#[tokio::test]
async fn test_blank_prompt_is_ignored() {
    let (mut session, _) = logged_in_session();

    let outcome = demo_workflow().request_generation(&mut session, "   ").await;

    assert_eq!(outcome, GenerationOutcome::EmptyPrompt);
    assert_eq!(session.credits(), STARTING_CREDITS);
    assert!(session.take_events().is_empty());
}

#[tokio::test]
async fn test_demo_mode_generates_placeholder() {
    let (mut session, _) = logged_in_session();
    let workflow = demo_workflow();

    let outcome = workflow.request_generation(&mut session, "a cat").await;

    let url = outcome.image_url().expect("image expected");
    assert!(url.starts_with("data:image/svg+xml;base64,"));
    assert_eq!(session.credits(), STARTING_CREDITS - 1);

    let history = session.history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].prompt, "a cat");
    assert_eq!(history[0].image_url, url);
    assert!(!workflow.is_generating());
}

#[tokio::test]
async fn test_remote_success_returns_image_data() {
    let url = spawn_inference_stub(StatusCode::OK, "image/png", PNG_BYTES, Duration::ZERO).await;
    let workflow = remote_workflow(url, Duration::from_secs(5));
    let (mut session, _) = logged_in_session();

    let outcome = workflow.request_generation(&mut session, "a cat").await;

    let url = outcome.image_url().expect("image expected");
    assert!(url.starts_with("data:image/png;base64,"));
    assert_eq!(session.credits(), STARTING_CREDITS - 1);
    assert_eq!(session.history().len(), 1);
}

#[tokio::test]
async fn test_remote_failure_falls_back_to_themed_placeholder() {
    let url = spawn_inference_stub(
        StatusCode::SERVICE_UNAVAILABLE,
        "application/json",
        b"{\"error\":\"loading\"}",
        Duration::ZERO,
    )
    .await;
    let workflow = remote_workflow(url, Duration::from_secs(5));
    let (mut session, _) = logged_in_session();

    let outcome = workflow.request_generation(&mut session, "a green forest").await;

    let url = outcome.image_url().expect("fallback image expected");
    assert!(url.starts_with("data:image/svg+xml;base64,"));
    assert_eq!(session.credits(), STARTING_CREDITS - 1);
    assert_eq!(session.history().len(), 1);
    assert!(!workflow.is_generating());
}

#[tokio::test]
async fn test_untyped_binary_body_is_accepted_as_image() {
    let url = spawn_inference_stub(
        StatusCode::OK,
        "application/octet-stream",
        PNG_BYTES,
        Duration::ZERO,
    )
    .await;
    let workflow = remote_workflow(url, Duration::from_secs(5));
    let (mut session, _) = logged_in_session();

    let outcome = workflow.request_generation(&mut session, "a cat").await;

    let url = outcome.image_url().expect("remote image expected");
    assert!(url.starts_with("data:image/png;base64,"));
    assert_eq!(session.history()[0].image_url, url);
}

#[tokio::test]
async fn test_non_image_success_body_falls_back() {
    let url = spawn_inference_stub(
        StatusCode::OK,
        "application/json",
        b"{\"estimated_time\": 20}",
        Duration::ZERO,
    )
    .await;
    let workflow = remote_workflow(url, Duration::from_secs(5));
    let (mut session, _) = logged_in_session();

    let outcome = workflow.request_generation(&mut session, "a cat").await;

    assert!(outcome
        .image_url()
        .unwrap()
        .starts_with("data:image/svg+xml;base64,"));
    assert_eq!(session.history().len(), 1);
}

#[tokio::test]
async fn test_timeout_falls_back() {
    let url = spawn_inference_stub(
        StatusCode::OK,
        "image/png",
        PNG_BYTES,
        Duration::from_secs(5),
    )
    .await;
    let workflow = remote_workflow(url, Duration::from_millis(100));
    let (mut session, _) = logged_in_session();

    let outcome = workflow.request_generation(&mut session, "a cat").await;

    assert!(outcome
        .image_url()
        .unwrap()
        .starts_with("data:image/svg+xml;base64,"));
    assert_eq!(session.credits(), STARTING_CREDITS - 1);
}

#[tokio::test]
async fn test_unreachable_service_falls_back() {
    // Bind then drop a listener so the port is very likely closed
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let workflow = remote_workflow(format!("http://{}/", addr), Duration::from_secs(5));
    let (mut session, _) = logged_in_session();

    let outcome = workflow.request_generation(&mut session, "a cat").await;

    assert!(outcome.image_url().is_some());
    assert_eq!(session.history().len(), 1);
}

#[tokio::test]
async fn test_generating_flag_set_while_in_flight() {
    let url = spawn_inference_stub(
        StatusCode::OK,
        "image/png",
        PNG_BYTES,
        Duration::from_millis(300),
    )
    .await;
    let workflow = remote_workflow(url, Duration::from_secs(5));
    let flag = workflow.generating_flag();
    let (mut session, _) = logged_in_session();

    let watcher = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        flag.load(Ordering::SeqCst)
    });

    let outcome = workflow.request_generation(&mut session, "a cat").await;

    assert!(watcher.await.unwrap(), "flag should be set mid-request");
    assert!(outcome.image_url().is_some());
    assert!(!workflow.is_generating());
}

#[tokio::test]
async fn test_generations_consume_credits_until_pricing() {
    let (mut session, _) = logged_in_session();
    let workflow = demo_workflow();

    for _ in 0..STARTING_CREDITS {
        let outcome = workflow.request_generation(&mut session, "again").await;
        assert!(outcome.image_url().is_some());
    }

    let outcome = workflow.request_generation(&mut session, "again").await;
    assert_eq!(outcome, GenerationOutcome::PricingRequired);
    assert_eq!(session.history().len(), STARTING_CREDITS as usize);
    assert_eq!(session.credits(), 0);
}

#[tokio::test]
async fn test_config_without_key_selects_demo_mode() {
    let config = imagify::config::Config::test_default();
    let workflow = GenerationWorkflow::from_config(&config).unwrap();
    let (mut session, _) = logged_in_session();

    let outcome = workflow.request_generation(&mut session, "a lighthouse").await;

    let url = outcome.image_url().expect("demo image");
    assert!(url.starts_with("data:image/svg+xml;base64,"));
}
