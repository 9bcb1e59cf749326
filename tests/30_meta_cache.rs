mod common;

use anyhow::Result;
use axum::body::Body;
use axum::http::{Request, StatusCode};

use common::{config_for, gateway, send, MockBackend};
use rowgate::AppState;

#[tokio::test]
async fn load_reads_backend_listing() -> Result<()> {
    let backend = MockBackend::start(&[("Products", "m7rl42lk4m0nq27"), ("Orders", "m2")]).await?;
    let (_, state) = gateway(&backend).await?;

    assert!(state.meta.is_ready());
    assert_eq!(state.meta.table_count(), 2);
    assert_eq!(state.meta.resolve("products"), "m7rl42lk4m0nq27");
    assert_eq!(state.meta.resolve("ORDERS"), "m2");
    Ok(())
}

#[tokio::test]
async fn failed_refresh_serves_stale_mapping() -> Result<()> {
    let backend = MockBackend::start(&[("Products", "m1")]).await?;
    let (_, state) = gateway(&backend).await?;

    backend.set_tables(&[("Products", "m9")]);
    backend.fail_meta(true);
    state.meta.load().await;
    assert_eq!(state.meta.resolve("products"), "m1");

    backend.fail_meta(false);
    state.meta.load().await;
    assert_eq!(state.meta.resolve("products"), "m9");
    Ok(())
}

#[tokio::test]
async fn startup_against_down_backend_still_serves() -> Result<()> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    drop(listener);

    let state = AppState::from_config(config_for(&format!("http://{}", addr)))?;
    state.meta.load().await;
    assert!(!state.meta.is_ready());
    assert_eq!(state.meta.resolve("Products"), "Products");

    let app = rowgate::router(state);
    let request = Request::builder().uri("/health").body(Body::empty())?;
    let (status, _, body) = send(&app, request).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "degraded");
    assert_eq!(body["data"]["tables"], 0);
    Ok(())
}

#[tokio::test]
async fn health_reports_cache_state() -> Result<()> {
    let backend = MockBackend::start(&[("Products", "m1")]).await?;
    let (app, _) = gateway(&backend).await?;

    let request = Request::builder().uri("/health").body(Body::empty())?;
    let (status, _, body) = send(&app, request).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["tables"], 1);
    assert!(body["data"]["last_refresh"].is_string());
    Ok(())
}

#[tokio::test]
async fn unknown_route_is_json_404() -> Result<()> {
    let backend = MockBackend::start(&[]).await?;
    let (app, _) = gateway(&backend).await?;

    let request = Request::builder().uri("/nope").body(Body::empty())?;
    let (status, _, body) = send(&app, request).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
    Ok(())
}
