// src/tariff/sources/wto.rs
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::tariff::error::SourceError;
use crate::tariff::http::HttpFetch;
use crate::tariff::sources::build_url;
use crate::tariff::types::{TariffRecord, TariffSource};

pub const NAME: &str = "WTO";
pub const DEFAULT_URL: &str = "https://api.wto.org/timeseries/v1/data";

const DOCUMENTATION: [&str; 2] = ["Commercial Invoice", "Certificate of Origin"];

#[derive(Debug, Deserialize)]
struct TimeseriesResponse {
    #[serde(default)]
    dataset: Vec<Observation>,
}

#[derive(Debug, Deserialize)]
struct Observation {
    #[serde(default)]
    value: Value,
}

/// WTO timeseries API, simple average applied tariff (JSON).
pub struct WtoSource {
    http: Arc<dyn HttpFetch>,
    base_url: String,
}

impl WtoSource {
    pub fn new(http: Arc<dyn HttpFetch>, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Use the latest observation; `region` becomes the record's country.
    pub fn parse_response(
        hs_code: &str,
        region: &str,
        body: &str,
    ) -> Result<TariffRecord, SourceError> {
        let resp: TimeseriesResponse = serde_json::from_str(body)
            .map_err(|e| SourceError::Parse(format!("wto json: {e}")))?;
        let latest = resp
            .dataset
            .last()
            .ok_or_else(|| SourceError::NoData("No WTO data found".into()))?;
        let rate = format!("{}%", format_value(&latest.value)?);

        Ok(TariffRecord::live(
            NAME,
            "Product",
            region,
            hs_code,
            rate,
            "0%",
            &DOCUMENTATION,
        ))
    }
}

fn format_value(v: &Value) -> Result<String, SourceError> {
    match v {
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Ok(i.to_string()),
            (None, Some(f)) if f.fract() == 0.0 => Ok(format!("{f:.0}")),
            (None, Some(f)) => Ok(f.to_string()),
            _ => Ok(n.to_string()),
        },
        Value::String(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        other => Err(SourceError::Parse(format!("wto value not numeric: {other}"))),
    }
}

#[async_trait]
impl TariffSource for WtoSource {
    async fn fetch(&self, hs_code: &str, destination: &str) -> Result<TariffRecord, SourceError> {
        let url = build_url(
            &self.base_url,
            &[("i", "TARIFF_SIMPLE"), ("r", destination), ("p", hs_code)],
        )?;
        let page = self.http.get(&url, Some("application/json")).await?;
        if !page.is_success() {
            return Err(SourceError::Network(format!(
                "WTO API failed (HTTP {})",
                page.status
            )));
        }
        Self::parse_response(hs_code, destination, &page.body)
    }

    fn name(&self) -> &'static str {
        NAME
    }
}
