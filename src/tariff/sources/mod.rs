// src/tariff/sources/mod.rs
pub mod eu;
pub mod india;
pub mod korea;
pub mod us;
pub mod wto;

pub use eu::EuSource;
pub use india::IndiaExportSource;
pub use korea::KoreaSource;
pub use us::UsSource;
pub use wto::WtoSource;

use once_cell::sync::OnceCell;
use regex::Regex;
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};

use crate::tariff::error::SourceError;

/// Build `base?k=v&...` with percent-encoded values.
pub(crate) fn build_url(base: &str, params: &[(&str, &str)]) -> Result<Url, SourceError> {
    Url::parse_with_params(base, params)
        .map_err(|e| SourceError::Parse(format!("invalid source url {base}: {e}")))
}

pub(crate) fn selector(css: &str) -> Result<Selector, SourceError> {
    Selector::parse(css).map_err(|e| SourceError::Parse(format!("bad selector {css}: {e}")))
}

/// Collapse whitespace and trim.
pub(crate) fn clean_text(s: &str) -> String {
    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re = RE_WS.get_or_init(|| Regex::new(r"\s+").expect("whitespace regex"));
    re.replace_all(s, " ").trim().to_string()
}

/// Cleaned text content of an element.
pub(crate) fn element_text(el: ElementRef<'_>) -> String {
    clean_text(&el.text().collect::<String>())
}

/// Text of the first element matching `css`, if any.
pub(crate) fn first_text(doc: &Html, css: &str) -> Result<Option<String>, SourceError> {
    let sel = selector(css)?;
    Ok(doc.select(&sel).next().map(element_text))
}

/// `value` unless blank, else `default`.
pub(crate) fn or_default(value: Option<&str>, default: &str) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => default.to_string(),
    }
}
