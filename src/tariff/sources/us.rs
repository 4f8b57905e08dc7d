// src/tariff/sources/us.rs
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::tariff::error::SourceError;
use crate::tariff::http::HttpFetch;
use crate::tariff::sources::{build_url, or_default};
use crate::tariff::types::{TariffRecord, TariffSource};

pub const NAME: &str = "USITC";
pub const DEFAULT_URL: &str = "https://hts.usitc.gov/api/search";

const DOCUMENTATION: [&str; 3] = ["Commercial Invoice", "Certificate of Origin", "Packing List"];

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

/// Fields are loosely typed; USITC sometimes sends rates as bare numbers.
#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    description: Value,
    #[serde(default)]
    hts_number: Value,
    #[serde(default)]
    general_rate: Value,
    #[serde(default)]
    special_rate: Value,
}

/// String as-is, numbers in their JSON form; anything else counts as missing.
fn field_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// USITC Harmonized Tariff Schedule search API (JSON).
pub struct UsSource {
    http: Arc<dyn HttpFetch>,
    base_url: String,
}

impl UsSource {
    pub fn new(http: Arc<dyn HttpFetch>, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    pub fn parse_response(hs_code: &str, body: &str) -> Result<TariffRecord, SourceError> {
        let resp: SearchResponse = serde_json::from_str(body)
            .map_err(|e| SourceError::Parse(format!("usitc json: {e}")))?;
        let first = resp
            .results
            .into_iter()
            .next()
            .ok_or_else(|| SourceError::NoData("No data found".into()))?;

        let general = or_default(field_text(&first.general_rate).as_deref(), "0%");
        Ok(TariffRecord::live(
            NAME,
            or_default(field_text(&first.description).as_deref(), "Unknown Product"),
            "United States",
            or_default(field_text(&first.hts_number).as_deref(), hs_code),
            general,
            or_default(field_text(&first.special_rate).as_deref(), "0%"),
            &DOCUMENTATION,
        ))
    }
}

#[async_trait]
impl TariffSource for UsSource {
    async fn fetch(&self, hs_code: &str, _destination: &str) -> Result<TariffRecord, SourceError> {
        let url = build_url(&self.base_url, &[("query", hs_code)])?;
        let page = self.http.get(&url, None).await?;
        if !page.is_success() {
            return Err(SourceError::Network(format!(
                "USITC API failed (HTTP {})",
                page.status
            )));
        }
        Self::parse_response(hs_code, &page.body)
    }

    fn name(&self) -> &'static str {
        NAME
    }
}
