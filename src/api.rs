// src/api.rs
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use crate::hs_code::{self, MatchKind};
use crate::tariff::types::{now_iso, TariffRecord};
use crate::tariff::TariffService;

pub const HEADER_CACHE: &str = "x-tariff-cache";
pub const HEADER_SOURCE: &str = "x-tariff-source";

const MSG_REQUIRED: &str = "Product and destination country are required";
const MSG_NOT_FOUND: &str =
    "Tariff data not found for the specified product and country combination";
const MSG_NOT_FOUND_SHORT: &str = "Tariff data not found";

#[derive(Clone)]
pub struct AppState {
    pub tariffs: Arc<TariffService>,
    /// Origin used when a request does not name one.
    pub default_from: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/tariff", get(tariff_get).post(tariff_post))
        .route("/hs-code", get(hs_code_lookup))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(&'static str),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
            ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.to_string()),
        };
        (status, Json(serde_json::json!({ "error": msg }))).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct TariffQuery {
    product: Option<String>,
    from: Option<String>,
    to: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TariffBody {
    product: Option<String>,
    from_country: Option<String>,
    to_country: Option<String>,
}

#[derive(Serialize)]
struct TariffEnvelope {
    success: bool,
    data: TariffRecord,
    timestamp: String,
}

/// `v` unless missing or whitespace-only. The value itself is passed on as sent.
fn present(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}

fn required(product: Option<String>, to: Option<String>) -> Result<(String, String), ApiError> {
    match (present(product), present(to)) {
        (Some(product), Some(to)) => Ok((product, to)),
        _ => Err(ApiError::BadRequest(MSG_REQUIRED.to_string())),
    }
}

async fn tariff_get(
    State(state): State<AppState>,
    Query(q): Query<TariffQuery>,
) -> Result<Response, ApiError> {
    let (product, to) = required(q.product, q.to)?;
    // An empty `from=` counts as absent.
    let from = q
        .from
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| state.default_from.clone());
    lookup_response(&state, &product, &from, &to, MSG_NOT_FOUND).await
}

async fn tariff_post(
    State(state): State<AppState>,
    payload: Result<Json<TariffBody>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let (product, to) = required(body.product, body.to_country)?;
    // Only a missing `fromCountry` takes the default; an explicit value is used as sent.
    let from = body
        .from_country
        .unwrap_or_else(|| state.default_from.clone());
    lookup_response(&state, &product, &from, &to, MSG_NOT_FOUND_SHORT).await
}

async fn lookup_response(
    state: &AppState,
    product: &str,
    from: &str,
    to: &str,
    not_found: &'static str,
) -> Result<Response, ApiError> {
    tracing::info!(target: "tariff::api", product, from, to, "tariff lookup");
    let lookup = state.tariffs.lookup(product, from, to).await;
    let record = lookup.record.ok_or(ApiError::NotFound(not_found))?;

    let cache = if lookup.cache_hit { "HIT" } else { "MISS" };
    let headers = [
        (HEADER_CACHE, cache.to_string()),
        (HEADER_SOURCE, record.source.clone()),
    ];
    let body = TariffEnvelope {
        success: true,
        data: record,
        timestamp: now_iso(),
    };
    Ok((StatusCode::OK, headers, Json(body)).into_response())
}

#[derive(Debug, Deserialize)]
struct HsQuery {
    product: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HsOut {
    product: String,
    hs_code: &'static str,
    #[serde(rename = "match")]
    kind: MatchKind,
}

async fn hs_code_lookup(Query(q): Query<HsQuery>) -> Result<Json<HsOut>, ApiError> {
    let product = present(q.product)
        .ok_or_else(|| ApiError::BadRequest("Product is required".to_string()))?;
    let m = hs_code::classify(&product);
    Ok(Json(HsOut {
        product,
        hs_code: m.code,
        kind: m.kind,
    }))
}
