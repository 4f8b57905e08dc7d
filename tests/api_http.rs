// tests/api_http.rs
//
// HTTP-level tests for the public API Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot, with
// upstream sources served by a FixtureFetcher.
//
// Covered:
// - GET /health
// - GET /tariff (envelope, default origin, cache header MISS → HIT)
// - POST /tariff (camelCase body, 400 on missing fields / bad JSON)
// - 404 when every source fails (GET and POST messages)
// - request values reach routing and the cache key untrimmed
// - GET /hs-code

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value as Json};
use tower::ServiceExt as _; // for `oneshot`

use tariff_lookup::api::{self, AppState, HEADER_CACHE, HEADER_SOURCE};
use tariff_lookup::config::tariff::TariffConfig;
use tariff_lookup::tariff::cache::ManualClock;
use tariff_lookup::tariff::http::FixtureFetcher;
use tariff_lookup::tariff::sources::{eu, us, wto};
use tariff_lookup::TariffService;

const BODY_LIMIT: usize = 1024 * 1024; // 1MB, safe for tests

const WTO_JSON: &str = include_str!("fixtures/wto_timeseries.json");
const TARIC_HTML: &str = include_str!("fixtures/taric_page.html");
const USITC_JSON: &str = include_str!("fixtures/usitc_search.json");

fn test_router(http: Arc<FixtureFetcher>) -> Router {
    let cfg = TariffConfig::default();
    let tariffs = Arc::new(TariffService::with_fetcher(
        &cfg,
        http,
        Arc::new(ManualClock::at(0)),
    ));
    api::router(AppState {
        tariffs,
        default_from: cfg.default_from,
    })
}

fn fixtures() -> Arc<FixtureFetcher> {
    Arc::new(
        FixtureFetcher::new()
            .with_page(wto::DEFAULT_URL, 200, WTO_JSON)
            .with_page(eu::DEFAULT_URL, 200, TARIC_HTML),
    )
}

async fn read_json(resp: axum::response::Response) -> Json {
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    serde_json::from_slice(&bytes).expect("parse json")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("build GET")
}

fn post_json(uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .expect("build POST")
}

#[tokio::test]
async fn api_health_returns_200_and_ok_body() {
    let app = test_router(fixtures());
    let resp = app.oneshot(get("/health")).await.expect("oneshot /health");
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT).await.unwrap();
    assert_eq!(String::from_utf8(bytes.to_vec()).unwrap().trim(), "ok");
}

#[tokio::test]
async fn get_tariff_returns_envelope_and_cache_headers() {
    let http = fixtures();
    let app = test_router(http.clone());

    let resp = app
        .clone()
        .oneshot(get("/tariff?product=Rice&to=Japan"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get(HEADER_CACHE).unwrap(), "MISS");
    assert_eq!(resp.headers().get(HEADER_SOURCE).unwrap(), "WTO");

    let v = read_json(resp).await;
    assert_eq!(v["success"], true);
    assert!(v["timestamp"].is_string());
    let data = &v["data"];
    assert_eq!(data["hsCode"], "1006.30");
    assert_eq!(data["country"], "Japan");
    assert_eq!(data["baseTariff"], "10.5%");
    assert_eq!(data["dataOrigin"], "live");
    assert!(data["documentation"].is_array());
    assert!(data.get("restrictions").is_none(), "absent extensions are omitted");

    // `from` defaulted to India, so the same lookup with an explicit origin is a hit.
    let resp = app
        .oneshot(get("/tariff?product=Rice&from=India&to=Japan"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get(HEADER_CACHE).unwrap(), "HIT");
    assert_eq!(http.calls().len(), 1);
}

#[tokio::test]
async fn post_tariff_accepts_camel_case_body() {
    let app = test_router(fixtures());
    let payload = json!({ "product": "chili", "fromCountry": "Vietnam", "toCountry": "Germany" });

    let resp = app
        .oneshot(post_json("/tariff", payload.to_string()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get(HEADER_SOURCE).unwrap(), "TARIC");

    let v = read_json(resp).await;
    assert_eq!(v["data"]["country"], "European Union");
    assert_eq!(v["data"]["hsCode"], "0904.21");
    assert_eq!(v["data"]["baseTariff"], "0 %");
}

#[tokio::test]
async fn missing_fields_are_400() {
    let app = test_router(fixtures());

    let resp = app.clone().oneshot(get("/tariff?product=rice")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let v = read_json(resp).await;
    assert_eq!(v["error"], "Product and destination country are required");

    let resp = app
        .clone()
        .oneshot(post_json("/tariff", json!({ "product": "  ", "toCountry": "USA" }).to_string()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = app
        .oneshot(post_json("/tariff", "{not json".to_string()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(read_json(resp).await["error"].is_string());
}

#[tokio::test]
async fn all_sources_failing_is_404() {
    let app = test_router(Arc::new(FixtureFetcher::new()));
    let resp = app
        .oneshot(get("/tariff?product=rice&from=India&to=Brazil"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let v = read_json(resp).await;
    assert_eq!(
        v["error"],
        "Tariff data not found for the specified product and country combination"
    );

    let app = test_router(Arc::new(FixtureFetcher::new()));
    let payload = json!({ "product": "rice", "toCountry": "Brazil" });
    let resp = app
        .oneshot(post_json("/tariff", payload.to_string()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(read_json(resp).await["error"], "Tariff data not found");
}

#[tokio::test]
async fn request_values_are_not_trimmed() {
    let http = Arc::new(
        FixtureFetcher::new()
            .with_page(us::DEFAULT_URL, 200, USITC_JSON)
            .with_page(wto::DEFAULT_URL, 200, WTO_JSON),
    );
    let app = test_router(http.clone());

    let resp = app
        .clone()
        .oneshot(get("/tariff?product=chili&to=USA"))
        .await
        .unwrap();
    assert_eq!(resp.headers().get(HEADER_SOURCE).unwrap(), "USITC");

    // "USA " is not a known destination, so it goes to WTO under its own key.
    let resp = app
        .oneshot(get("/tariff?product=chili&to=USA%20"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get(HEADER_CACHE).unwrap(), "MISS");
    assert_eq!(resp.headers().get(HEADER_SOURCE).unwrap(), "WTO");
    let v = read_json(resp).await;
    assert_eq!(v["data"]["country"], "USA ");
    assert_eq!(http.calls().len(), 2);
}

#[tokio::test]
async fn post_empty_from_country_is_kept() {
    let http = fixtures();
    let app = test_router(http.clone());

    let explicit_empty = json!({ "product": "rice", "fromCountry": "", "toCountry": "Japan" });
    let resp = app
        .clone()
        .oneshot(post_json("/tariff", explicit_empty.to_string()))
        .await
        .unwrap();
    assert_eq!(resp.headers().get(HEADER_CACHE).unwrap(), "MISS");

    // Omitted origin takes the default, which is a different key from "".
    let omitted = json!({ "product": "rice", "toCountry": "Japan" });
    let resp = app
        .clone()
        .oneshot(post_json("/tariff", omitted.to_string()))
        .await
        .unwrap();
    assert_eq!(resp.headers().get(HEADER_CACHE).unwrap(), "MISS");

    // GET treats an empty `from=` as absent.
    let resp = app
        .oneshot(get("/tariff?product=rice&from=&to=Japan"))
        .await
        .unwrap();
    assert_eq!(resp.headers().get(HEADER_CACHE).unwrap(), "HIT");
    assert_eq!(http.calls().len(), 2);
}

#[tokio::test]
async fn hs_code_endpoint_reports_match_kind() {
    let app = test_router(fixtures());

    let resp = app
        .clone()
        .oneshot(get("/hs-code?product=garam%20masala"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let v = read_json(resp).await;
    assert_eq!(v["hsCode"], "0910.99");
    assert_eq!(v["match"], "category");

    let resp = app.clone().oneshot(get("/hs-code?product=bicycle")).await.unwrap();
    let v = read_json(resp).await;
    assert_eq!(v["hsCode"], "0904.21");
    assert_eq!(v["match"], "default");

    let resp = app.oneshot(get("/hs-code")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
