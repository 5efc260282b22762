//! Health probing, circuit breaking and the cooldown flag, end to end.

mod common;

use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use career_gateway::resilience::{DataSource, FallbackReason, FlagState};
use career_gateway::services::mocks;
use career_gateway::session::SessionEvent;
use career_gateway::{GatewayClient, GatewayError};
use common::{closed_port, config_for, spawn_backend, spawn_truncating_backend, Recorder};

fn resumes_route(hits: Recorder) -> Router {
    Router::new().route(
        "/api/resumes",
        get(move || {
            let hits = hits.clone();
            async move {
                hits.push("/api/resumes");
                Json(json!([{ "id": "r-1", "title": "Mine", "file_name": "mine.pdf" }]))
            }
        }),
    )
}

/// Health endpoints answer 200 only while `healthy` is set.
fn health_routes(healthy: Arc<AtomicBool>) -> Router {
    let primary = healthy.clone();
    Router::new()
        .route(
            "/health-check",
            get(move || {
                let healthy = primary.clone();
                async move {
                    if healthy.load(Ordering::SeqCst) {
                        StatusCode::OK
                    } else {
                        StatusCode::SERVICE_UNAVAILABLE
                    }
                }
            }),
        )
}

#[tokio::test]
async fn test_probe_falls_back_to_alternate_path() {
    let probes = Recorder::default();
    let (slow, alternate) = (probes.clone(), probes.clone());
    let router = Router::new()
        .route(
            "/health-check",
            get(move || {
                let probes = slow.clone();
                async move {
                    probes.push("primary");
                    tokio::time::sleep(Duration::from_secs(2)).await;
                    StatusCode::OK
                }
            }),
        )
        .route(
            "/api/health-check",
            get(move || {
                let probes = alternate.clone();
                async move {
                    probes.push("alternate");
                    StatusCode::OK
                }
            }),
        );
    let addr = spawn_backend(router).await;

    let client = GatewayClient::connect(config_for(addr)).await.unwrap();

    assert!(client.state().is_available());
    assert_eq!(probes.entries(), vec!["primary", "alternate"]);
}

#[tokio::test]
async fn test_both_probe_paths_failing_opens_circuit() {
    let addr = spawn_backend(Router::new()).await;

    let client = GatewayClient::connect(config_for(addr)).await.unwrap();

    assert!(!client.state().is_available());
    assert!(!client.state().probe_in_progress());
}

#[tokio::test]
async fn test_open_circuit_short_circuits_without_network() {
    let hits = Recorder::default();
    let addr = spawn_backend(resumes_route(hits.clone())).await;
    let client = GatewayClient::connect(config_for(addr)).await.unwrap();
    assert!(!client.state().is_available());

    let first = client.remote().list_resumes_sourced().await.unwrap();
    assert_eq!(first.value, mocks::resumes(&()));
    assert_eq!(first.source, DataSource::Fallback(FallbackReason::NetworkError));
    assert!(matches!(client.flags().check(), FlagState::Active { .. }));

    let second = client.services().resumes.list_resumes().await.unwrap();
    assert_eq!(second, mocks::resumes(&()));
    assert_eq!(hits.count(), 0, "no request may reach the backend while the circuit is open");
}

#[tokio::test]
async fn test_unreachable_backend_opens_circuit_mid_session() {
    let addr = closed_port().await;
    let mut config = config_for(addr);
    config.health.probe_on_start = false;
    let client = GatewayClient::connect(config).await.unwrap();
    assert!(client.state().is_available());

    // Connection refused resolves to an empty response and opens the circuit
    let first = client.remote().list_resumes_sourced().await.unwrap();
    assert_eq!(first.source, DataSource::Fallback(FallbackReason::SoftFailure));
    assert!(!client.state().is_available());
    assert_eq!(client.flags().check(), FlagState::Clear);

    // The next call is cancelled by the gatekeeper, which sets the cooldown flag
    let second = client.remote().list_resumes_sourced().await.unwrap();
    assert_eq!(second.source, DataSource::Fallback(FallbackReason::NetworkError));
    assert!(matches!(client.flags().check(), FlagState::Active { .. }));
}

#[tokio::test]
async fn test_cooldown_expiry_reprobes_and_recovers() {
    let healthy = Arc::new(AtomicBool::new(false));
    let hits = Recorder::default();
    let addr = spawn_backend(health_routes(healthy.clone()).merge(resumes_route(hits.clone()))).await;

    let mut config = config_for(addr);
    config.fallback.cooldown_ms = 150;
    let client = GatewayClient::connect(config).await.unwrap();
    assert!(!client.state().is_available());

    assert!(client.remote().list_resumes_sourced().await.unwrap().is_fallback());
    healthy.store(true, Ordering::SeqCst);

    let during = client.remote().list_resumes_sourced().await.unwrap();
    assert_eq!(during.source, DataSource::Fallback(FallbackReason::FlagActive));
    assert_eq!(hits.count(), 0);

    tokio::time::sleep(Duration::from_millis(250)).await;

    let after = client.remote().list_resumes_sourced().await.unwrap();
    assert_eq!(after.source, DataSource::Backend);
    assert_eq!(after.value[0].id, "r-1");
    assert!(client.state().is_available());
    assert_eq!(client.flags().check(), FlagState::Clear);
    assert_eq!(hits.count(), 1);
}

#[tokio::test]
async fn test_flag_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let flag_path = dir.path().join("unavailable.json");

    let healthy = Arc::new(AtomicBool::new(false));
    let hits = Recorder::default();
    let addr = spawn_backend(health_routes(healthy.clone()).merge(resumes_route(hits.clone()))).await;

    let mut config = config_for(addr);
    config.fallback.flag_path = Some(flag_path.clone());

    let first = GatewayClient::connect(config.clone()).await.unwrap();
    first.services().resumes.list_resumes().await.unwrap();
    assert!(matches!(first.flags().check(), FlagState::Active { .. }));
    drop(first);

    // Healthy again, but the persisted flag still holds calls back
    healthy.store(true, Ordering::SeqCst);
    let restarted = GatewayClient::connect(config).await.unwrap();
    assert!(restarted.state().is_available());

    let result = restarted.remote().list_resumes_sourced().await.unwrap();
    assert_eq!(result.source, DataSource::Fallback(FallbackReason::FlagActive));
    assert_eq!(hits.count(), 0);
}

#[tokio::test]
async fn test_unauthorized_expires_session_and_is_not_substituted() {
    let seen = Recorder::default();
    let auth = seen.clone();
    let router = Router::new()
        .route("/health-check", get(|| async { StatusCode::OK }))
        .route(
            "/api/resumes",
            get(move |headers: axum::http::HeaderMap| {
                let seen = auth.clone();
                async move {
                    let bearer = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    seen.push(bearer);
                    assert!(headers.contains_key("x-request-id"));
                    StatusCode::UNAUTHORIZED
                }
            }),
        );
    let addr = spawn_backend(router).await;

    let client = GatewayClient::connect(config_for(addr)).await.unwrap();
    client.session().sign_in("stale-token");
    let mut events = client.session().subscribe();

    let result = client.services().resumes.list_resumes().await;

    assert!(matches!(result, Err(GatewayError::Unauthorized)));
    assert_eq!(seen.entries(), vec!["Bearer stale-token"]);
    assert!(!client.session().is_signed_in());
    assert_eq!(
        events.recv().await.unwrap(),
        SessionEvent::Expired {
            redirect_to: "/signin".to_string()
        }
    );
    assert_eq!(client.flags().check(), FlagState::Clear);
    assert!(client.state().is_available());
}

#[tokio::test]
async fn test_method_not_allowed_substitutes_without_flag() {
    let router = Router::new()
        .route("/health-check", get(|| async { StatusCode::OK }))
        .route(
            "/api/ats/score",
            axum::routing::post(|| async { StatusCode::METHOD_NOT_ALLOWED }),
        );
    let addr = spawn_backend(router).await;
    let client = GatewayClient::connect(config_for(addr)).await.unwrap();

    let request = career_gateway::services::types::AtsRequest {
        resume_text: "Rust and SQL".into(),
        job_title: "Engineer".into(),
        job_description: "Rust, Go".into(),
    };
    let report = client.remote().score_resume_sourced(request.clone()).await.unwrap();

    assert_eq!(report.source, DataSource::Fallback(FallbackReason::SoftFailure));
    assert_eq!(report.value, mocks::ats_report(&request));
    assert_eq!(client.flags().check(), FlagState::Clear);
}

#[tokio::test]
async fn test_concurrent_checks_share_one_request() {
    let checks = Recorder::default();
    let slow = checks.clone();
    let router = Router::new().route(
        "/health-check",
        get(move || {
            let checks = slow.clone();
            async move {
                checks.push("primary");
                tokio::time::sleep(Duration::from_millis(200)).await;
                StatusCode::OK
            }
        }),
    );
    let addr = spawn_backend(router).await;

    let mut config = config_for(addr);
    config.health.timeout_ms = 1_000;
    let client = GatewayClient::connect(config).await.unwrap();
    let before = checks.count();

    let (first, second) = tokio::join!(client.check_availability(), client.check_availability());

    assert!(first);
    assert!(second, "the second caller gets the last known state");
    assert_eq!(checks.count(), before + 1);
}

#[tokio::test]
async fn test_body_cut_off_opens_circuit() {
    let addr = spawn_truncating_backend(false).await;
    let client = GatewayClient::connect(config_for(addr)).await.unwrap();
    assert!(client.state().is_available());

    let result = client.remote().list_resumes_sourced().await.unwrap();

    assert_eq!(result.source, DataSource::Fallback(FallbackReason::SoftFailure));
    assert_eq!(result.value, mocks::resumes(&()));
    assert!(!client.state().is_available());
}

#[tokio::test]
async fn test_body_read_timeout_keeps_circuit_closed() {
    let addr = spawn_truncating_backend(true).await;
    let mut config = config_for(addr);
    config.backend.request_timeout_ms = 300;
    let client = GatewayClient::connect(config).await.unwrap();
    assert!(client.state().is_available());

    let result = client.remote().list_resumes_sourced().await.unwrap();

    assert_eq!(result.source, DataSource::Fallback(FallbackReason::SoftFailure));
    assert!(client.state().is_available(), "a timeout must not open the circuit");
    assert_eq!(client.flags().check(), FlagState::Clear);
}
