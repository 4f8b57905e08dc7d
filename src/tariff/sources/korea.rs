// src/tariff/sources/korea.rs
//! Korea Customs Service (UNI-PASS) tariff page, with a built-in reference table.
//!
//! The live scrape and the reference table are separate stages. `fetch` falls
//! back to the table on any live failure unless the fallback is disabled, so by
//! default this source never fails; the resulting record is tagged
//! `DataOrigin::Synthetic`.

use std::sync::Arc;

use async_trait::async_trait;
use metrics::counter;
use scraper::Html;

use crate::tariff::error::SourceError;
use crate::tariff::http::HttpFetch;
use crate::tariff::sources::{build_url, first_text, or_default};
use crate::tariff::types::{now_iso, DataOrigin, TariffRecord, TariffSource};

pub const NAME: &str = "Korea Customs Service";
pub const SYNTHETIC_NAME: &str = "Korea Trade Database";
pub const DEFAULT_URL: &str = "https://unipass.customs.go.kr/ets/index.do";

const MENU_ID: &str = "ETS_MNU_00000141";

const LIVE_DOCUMENTATION: [&str; 4] = [
    "Commercial Invoice",
    "Certificate of Origin",
    "Phytosanitary Certificate",
    "Health Certificate",
];

const SYNTHETIC_DOCUMENTATION: [&str; 5] = [
    "Commercial Invoice",
    "Certificate of Origin",
    "Phytosanitary Certificate",
    "Health Certificate",
    "Import License (if required)",
];

/// Reference row for a common export to Korea.
#[derive(Debug, Clone, Copy)]
pub struct KoreaTariffRow {
    pub hs_code: &'static str,
    pub product: &'static str,
    pub tariff: &'static str,
    pub season: Option<&'static str>,
}

/// Known rates. The first row (chili) doubles as the default for unknown codes.
pub const KOREA_TARIFFS: &[KoreaTariffRow] = &[
    KoreaTariffRow {
        hs_code: "0904.21",
        product: "Chili (Fresh/Dried)",
        tariff: "8%",
        season: Some("May-October: 30%, November-April: 8%"),
    },
    KoreaTariffRow {
        hs_code: "0904.22",
        product: "Chili Powder",
        tariff: "8%",
        season: None,
    },
    KoreaTariffRow {
        hs_code: "0910.99",
        product: "Spices (Other)",
        tariff: "8%",
        season: None,
    },
    KoreaTariffRow {
        hs_code: "0910.30",
        product: "Turmeric",
        tariff: "8%",
        season: None,
    },
];

pub fn korea_row(hs_code: &str) -> &'static KoreaTariffRow {
    KOREA_TARIFFS
        .iter()
        .find(|r| r.hs_code == hs_code)
        .unwrap_or(&KOREA_TARIFFS[0])
}

/// Synthetic record from the reference table. Keeps the requested HS code even
/// when the row is the chili default.
pub fn mock_record(hs_code: &str) -> TariffRecord {
    let row = korea_row(hs_code);
    TariffRecord {
        product: row.product.to_string(),
        country: "South Korea".to_string(),
        hs_code: hs_code.to_string(),
        base_tariff: row.tariff.to_string(),
        additional_duties: row
            .season
            .map(|s| format!("Seasonal: {s}"))
            .unwrap_or_else(|| "0%".to_string()),
        total_tariff: row.tariff.to_string(),
        documentation: SYNTHETIC_DOCUMENTATION
            .iter()
            .map(|d| d.to_string())
            .collect(),
        source: SYNTHETIC_NAME.to_string(),
        last_updated: now_iso(),
        data_origin: DataOrigin::Synthetic,
        restrictions: None,
        seasonal_variations: row.season.map(str::to_string),
        quotas: None,
    }
}

pub struct KoreaSource {
    http: Arc<dyn HttpFetch>,
    base_url: String,
    synthetic_fallback: bool,
}

impl KoreaSource {
    pub fn new(http: Arc<dyn HttpFetch>, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            synthetic_fallback: true,
        }
    }

    /// Disable the reference-table fallback so live failures reach the router.
    pub fn with_synthetic_fallback(mut self, enabled: bool) -> Self {
        self.synthetic_fallback = enabled;
        self
    }

    pub fn parse_page(hs_code: &str, html: &str) -> Result<TariffRecord, SourceError> {
        let doc = Html::parse_document(html);
        let rate = first_text(&doc, ".tariff-rate")?;
        let description = first_text(&doc, ".product-description")?;

        match (rate, description) {
            (Some(rate), Some(description)) => Ok(TariffRecord::live(
                NAME,
                or_default(Some(description.as_str()), "Chili/Spices"),
                "South Korea",
                hs_code,
                or_default(Some(rate.as_str()), "8%"),
                "0%",
                &LIVE_DOCUMENTATION,
            )),
            _ => Err(SourceError::NoData("No Korea tariff data found".into())),
        }
    }

    /// Live scrape only; fails like any other source.
    pub async fn fetch_live(&self, hs_code: &str) -> Result<TariffRecord, SourceError> {
        let url = build_url(&self.base_url, &[("menuId", MENU_ID), ("hsCode", hs_code)])?;
        let page = self.http.get(&url, None).await?;
        if !page.is_success() {
            return Err(SourceError::Network(format!(
                "Korea Customs Service failed (HTTP {})",
                page.status
            )));
        }
        Self::parse_page(hs_code, &page.body)
    }
}

#[async_trait]
impl TariffSource for KoreaSource {
    async fn fetch(&self, hs_code: &str, _destination: &str) -> Result<TariffRecord, SourceError> {
        match self.fetch_live(hs_code).await {
            Ok(r) => Ok(r),
            Err(e) if self.synthetic_fallback => {
                tracing::warn!(
                    target: "tariff::source",
                    source = NAME,
                    hs_code,
                    error = %e,
                    "live fetch failed, serving reference table"
                );
                counter!("tariff_source_synthetic_total").increment(1);
                Ok(mock_record(hs_code))
            }
            Err(e) => Err(e),
        }
    }

    fn name(&self) -> &'static str {
        NAME
    }
}
