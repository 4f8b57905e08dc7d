// src/tariff/sources/eu.rs
use std::sync::Arc;

use async_trait::async_trait;
use scraper::Html;

use crate::tariff::error::SourceError;
use crate::tariff::http::HttpFetch;
use crate::tariff::sources::{build_url, first_text, or_default};
use crate::tariff::types::{TariffRecord, TariffSource};

pub const NAME: &str = "TARIC";
pub const DEFAULT_URL: &str =
    "https://ec.europa.eu/taxation_customs/dds2/taric/taric_consultation.jsp";

const DOCUMENTATION: [&str; 3] = [
    "Commercial Invoice",
    "Certificate of Origin",
    "EUR.1 Certificate",
];

/// EU TARIC consultation page (HTML scrape).
pub struct EuSource {
    http: Arc<dyn HttpFetch>,
    base_url: String,
}

impl EuSource {
    pub fn new(http: Arc<dyn HttpFetch>, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    pub fn parse_page(hs_code: &str, html: &str) -> Result<TariffRecord, SourceError> {
        let doc = Html::parse_document(html);
        let rate = first_text(&doc, ".tariff-rate")?;
        let description = first_text(&doc, ".product-description")?;

        match (rate, description) {
            (Some(rate), Some(description)) => Ok(TariffRecord::live(
                NAME,
                or_default(Some(description.as_str()), "Unknown Product"),
                "European Union",
                hs_code,
                or_default(Some(rate.as_str()), "0%"),
                "0%",
                &DOCUMENTATION,
            )),
            _ => Err(SourceError::NoData("No EU tariff data found".into())),
        }
    }
}

#[async_trait]
impl TariffSource for EuSource {
    async fn fetch(&self, hs_code: &str, _destination: &str) -> Result<TariffRecord, SourceError> {
        let url = build_url(&self.base_url, &[("Lang", "en"), ("Taric", hs_code)])?;
        // TARIC error pages still carry markup; status is not checked, the selectors decide.
        let page = self.http.get(&url, None).await?;
        Self::parse_page(hs_code, &page.body)
    }

    fn name(&self) -> &'static str {
        NAME
    }
}
