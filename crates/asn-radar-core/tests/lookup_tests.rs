//! End-to-end lookups through the public API.
//!
//! A local axum router stands in for the Radar API; the store is a real
//! SQLite file in a temp directory.

use asn_radar_core::{
    AsnLookupService, CacheStore, HttpClient, RadarClient, RadarConfig, SettingsUpdate,
};
use axum::{extract::Path, http::StatusCode, routing::get, Json, Router};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

/// Serve `app` on an ephemeral port and return its base URL.
async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Fake upstream that only knows the entity endpoint. The ranking endpoints
/// 404, so the entity strategy is the single possible winner.
fn entity_upstream(hits: Arc<AtomicUsize>) -> Router {
    Router::new().route(
        "/entities/asns/:asn",
        get(move |Path(asn): Path<String>| {
            let hits = Arc::clone(&hits);
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                if asn == "13335" {
                    Ok(Json(json!({
                        "success": true,
                        "result": {"asn": {"name": "CLOUDFLARENET"}, "summary": {"human": 62.5, "bot": 37.5}}
                    })))
                } else {
                    Err(StatusCode::NOT_FOUND)
                }
            }
        }),
    )
}

fn open_service(dir: &TempDir) -> AsnLookupService {
    let cache = CacheStore::open(dir.path().join("radar.sqlite")).unwrap();
    let radar = RadarClient::with_http(HttpClient::new().unwrap());
    AsnLookupService::new(cache, radar)
}

fn configure(service: &AsnLookupService, base_url: &str) {
    service.update_settings(SettingsUpdate {
        radar_token: Some("test-token".into()),
        radar_base_url: Some(base_url.to_string()),
        ttl_days: None,
    });
}

#[tokio::test]
async fn lookup_fetches_then_serves_from_cache() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base_url = serve(entity_upstream(Arc::clone(&hits))).await;
    let dir = TempDir::new().unwrap();
    let service = open_service(&dir);
    configure(&service, &base_url);

    let first = service.lookup("AS13335").await;
    assert_eq!(first.human_pct, Some(62.5));
    assert_eq!(first.bot_pct, Some(37.5));
    assert_eq!(first.error, None);

    let second = service.lookup("as13335").await;
    assert_eq!(second, first);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn cache_survives_reopen() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base_url = serve(entity_upstream(Arc::clone(&hits))).await;
    let dir = TempDir::new().unwrap();

    {
        let service = open_service(&dir);
        configure(&service, &base_url);
        service.lookup("13335").await;
    }

    let reopened = open_service(&dir);
    assert_eq!(reopened.settings().radar_base_url, base_url);
    let result = reopened.lookup("AS13335").await;
    assert_eq!(result.human_pct, Some(62.5));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn unknown_asn_is_negative_and_cached() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base_url = serve(entity_upstream(Arc::clone(&hits))).await;
    let dir = TempDir::new().unwrap();
    let service = open_service(&dir);
    configure(&service, &base_url);

    let result = service.lookup("AS64500").await;
    assert!(result.is_negative());
    assert_eq!(result.error.as_deref(), Some(RadarConfig::ALL_FAILED_MESSAGE));

    service.lookup("AS64500").await;
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    let stored: Value = service.cache().get_raw("asn:64500").unwrap();
    assert!(stored["fetchedAt"].as_i64().unwrap() > 0);
    assert_eq!(stored["data"]["humanPct"], Value::Null);
}

#[tokio::test]
async fn missing_token_never_reaches_upstream() {
    let hits = Arc::new(AtomicUsize::new(0));
    serve(entity_upstream(Arc::clone(&hits))).await;
    let dir = TempDir::new().unwrap();
    let service = open_service(&dir);

    let result = service.lookup("AS13335").await;

    assert!(result.is_negative());
    assert_eq!(result.error.as_deref(), Some(RadarConfig::NO_TOKEN_MESSAGE));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn clearing_cache_forces_refetch() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base_url = serve(entity_upstream(Arc::clone(&hits))).await;
    let dir = TempDir::new().unwrap();
    let service = open_service(&dir);
    configure(&service, &base_url);

    service.lookup("AS13335").await;
    assert_eq!(service.cache().clear_cache(), 1);
    assert!(service.cache().cached_keys().is_empty());
    // settings survive a cache clear
    assert_eq!(service.settings().radar_token, "test-token");

    service.lookup("AS13335").await;
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}
