// src/tariff/sources/india.rs
use std::sync::Arc;

use async_trait::async_trait;
use scraper::Html;

use crate::tariff::error::SourceError;
use crate::tariff::http::HttpFetch;
use crate::tariff::sources::{build_url, element_text, or_default, selector};
use crate::tariff::types::{TariffRecord, TariffSource};

pub const NAME: &str = "DGFT India";
pub const DEFAULT_URL: &str = "https://www.dgft.gov.in/CP/";

const DOCUMENTATION: [&str; 3] = [
    "Commercial Invoice",
    "Certificate of Origin",
    "Export License",
];

/// DGFT export tariff view (HTML table scrape). Last step of the fallback chain,
/// used only for shipments originating in India.
pub struct IndiaExportSource {
    http: Arc<dyn HttpFetch>,
    base_url: String,
}

impl IndiaExportSource {
    pub fn new(http: Arc<dyn HttpFetch>, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// First row of `.tariff-table` with at least three cells: product, rate, additional duties.
    pub fn parse_page(
        hs_code: &str,
        destination: &str,
        html: &str,
    ) -> Result<TariffRecord, SourceError> {
        let doc = Html::parse_document(html);
        let table_sel = selector(".tariff-table")?;
        let row_sel = selector("tr")?;
        let cell_sel = selector("td")?;

        let table = doc
            .select(&table_sel)
            .next()
            .ok_or_else(|| SourceError::NoData("No India export data found".into()))?;

        for row in table.select(&row_sel) {
            let cells: Vec<String> = row.select(&cell_sel).map(element_text).collect();
            if cells.len() >= 3 {
                return Ok(TariffRecord::live(
                    NAME,
                    or_default(Some(cells[0].as_str()), "Unknown Product"),
                    destination,
                    hs_code,
                    or_default(Some(cells[1].as_str()), "0%"),
                    or_default(Some(cells[2].as_str()), "0%"),
                    &DOCUMENTATION,
                ));
            }
        }

        Err(SourceError::NoData("No India export data found".into()))
    }
}

#[async_trait]
impl TariffSource for IndiaExportSource {
    async fn fetch(&self, hs_code: &str, destination: &str) -> Result<TariffRecord, SourceError> {
        let url = build_url(
            &self.base_url,
            &[("opt", "view-tariff"), ("hs", hs_code), ("country", destination)],
        )?;
        let page = self.http.get(&url, None).await?;
        Self::parse_page(hs_code, destination, &page.body)
    }

    fn name(&self) -> &'static str {
        NAME
    }
}
