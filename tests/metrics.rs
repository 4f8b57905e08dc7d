// tests/metrics.rs
//
// Prometheus exposition for tariff lookups. One recorder per test process, so
// both tests share it through a OnceCell.

use std::sync::Arc;

use axum::body::{self, Body};
use axum::http::{Request, StatusCode};
use once_cell::sync::OnceCell;
use tower::ServiceExt;

use tariff_lookup::config::tariff::TariffConfig;
use tariff_lookup::metrics::Metrics;
use tariff_lookup::tariff::cache::{ManualClock, DEFAULT_TTL_MS};
use tariff_lookup::tariff::http::FixtureFetcher;
use tariff_lookup::TariffService;

fn metrics() -> &'static Metrics {
    static METRICS: OnceCell<Metrics> = OnceCell::new();
    METRICS.get_or_init(|| Metrics::init(DEFAULT_TTL_MS).expect("install recorder"))
}

#[tokio::test]
async fn lookups_emit_expected_series() {
    let m = metrics();

    // No upstream reachable: Korea serves its reference table, WTO fails outright.
    let svc = TariffService::with_fetcher(
        &TariffConfig::default(),
        Arc::new(FixtureFetcher::new()),
        Arc::new(ManualClock::at(0)),
    );
    assert!(svc.get_tariff_data("chili", "India", "South Korea").await.is_some());
    assert!(svc.lookup("chili", "India", "South Korea").await.cache_hit);
    assert!(svc.get_tariff_data("rice", "Vietnam", "Japan").await.is_none());

    let out = m.handle.render();
    for needle in [
        "tariff_lookups_total",
        "tariff_cache_hits_total",
        "tariff_cache_misses_total",
        "tariff_source_synthetic_total",
        "tariff_not_found_total",
        "tariff_source_errors_total{source=\"WTO\"}",
        "tariff_source_ms",
    ] {
        assert!(
            out.contains(needle),
            "metrics exposition missing '{needle}'\n{out}"
        );
    }
}

#[tokio::test]
async fn metrics_endpoint_serves_exposition() {
    let m = metrics();

    let resp = m
        .router()
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body::to_bytes(resp.into_body(), 1_048_576).await.unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("tariff_cache_ttl_ms"), "no ttl gauge\n{text}");
}
