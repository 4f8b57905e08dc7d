// src/tariff/types.rs
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::tariff::error::SourceError;

/// Whether a record came from an upstream source or from built-in reference data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataOrigin {
    Live,
    Synthetic,
}

/// Normalized tariff result produced by every source adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TariffRecord {
    pub product: String,
    pub country: String,
    pub hs_code: String,
    pub base_tariff: String,       // e.g. "8%"
    pub additional_duties: String, // e.g. "0%" or "Seasonal: ..."
    pub total_tariff: String,
    pub documentation: Vec<String>,
    pub source: String,
    pub last_updated: String, // ISO-8601, record creation time
    pub data_origin: DataOrigin,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restrictions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seasonal_variations: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quotas: Option<String>,
}

impl TariffRecord {
    /// Build a live record; base and total tariff share one rate, as every source reports them.
    pub fn live(
        source: &str,
        product: impl Into<String>,
        country: impl Into<String>,
        hs_code: impl Into<String>,
        rate: impl Into<String>,
        additional_duties: impl Into<String>,
        documentation: &[&str],
    ) -> Self {
        let rate = rate.into();
        Self {
            product: product.into(),
            country: country.into(),
            hs_code: hs_code.into(),
            base_tariff: rate.clone(),
            additional_duties: additional_duties.into(),
            total_tariff: rate,
            documentation: documentation.iter().map(|d| d.to_string()).collect(),
            source: source.to_string(),
            last_updated: now_iso(),
            data_origin: DataOrigin::Live,
            restrictions: None,
            seasonal_variations: None,
            quotas: None,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        self.data_origin == DataOrigin::Synthetic
    }
}

/// Current UTC time as ISO-8601 with millisecond precision.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// One external tariff data source.
#[async_trait]
pub trait TariffSource: Send + Sync {
    /// Fetch the tariff for `hs_code` shipped to `destination`.
    async fn fetch(&self, hs_code: &str, destination: &str) -> Result<TariffRecord, SourceError>;
    fn name(&self) -> &'static str;
}
