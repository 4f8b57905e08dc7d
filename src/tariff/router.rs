// src/tariff/router.rs
//! Source selection and the fallback chain: primary by destination, then WTO,
//! then DGFT India for Indian exports. Attempts run one after another.

use std::sync::Arc;
use std::time::Instant;

use metrics::{counter, histogram};

use crate::tariff::types::{TariffRecord, TariffSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Us,
    Eu,
    Korea,
    Wto,
    India,
}

/// Primary source for a destination country (case-insensitive).
pub fn primary_for(destination: &str) -> SourceKind {
    match destination.to_lowercase().as_str() {
        "usa" | "united states" => SourceKind::Us,
        "germany" | "eu" | "european union" => SourceKind::Eu,
        "south korea" | "korea" => SourceKind::Korea,
        _ => SourceKind::Wto,
    }
}

/// Ordered attempts for a shipment.
pub fn plan(from: &str, to: &str) -> Vec<SourceKind> {
    let primary = primary_for(to);
    let mut steps = vec![primary];
    if primary != SourceKind::Wto {
        steps.push(SourceKind::Wto);
    }
    if from.eq_ignore_ascii_case("india") {
        steps.push(SourceKind::India);
    }
    steps
}

/// One adapter per `SourceKind`.
#[derive(Clone)]
pub struct SourceSet {
    pub us: Arc<dyn TariffSource>,
    pub eu: Arc<dyn TariffSource>,
    pub korea: Arc<dyn TariffSource>,
    pub wto: Arc<dyn TariffSource>,
    pub india: Arc<dyn TariffSource>,
}

impl SourceSet {
    pub fn get(&self, kind: SourceKind) -> &Arc<dyn TariffSource> {
        match kind {
            SourceKind::Us => &self.us,
            SourceKind::Eu => &self.eu,
            SourceKind::Korea => &self.korea,
            SourceKind::Wto => &self.wto,
            SourceKind::India => &self.india,
        }
    }
}

pub struct FallbackRouter {
    sources: SourceSet,
}

impl FallbackRouter {
    pub fn new(sources: SourceSet) -> Self {
        Self { sources }
    }

    /// First successful record along `plan(from, to)`, or `None` when every step fails.
    /// Every source receives `to` as its destination.
    pub async fn route(&self, hs_code: &str, from: &str, to: &str) -> Option<TariffRecord> {
        for kind in plan(from, to) {
            let src = self.sources.get(kind);
            let t0 = Instant::now();
            let res = src.fetch(hs_code, to).await;
            let ms = t0.elapsed().as_secs_f64() * 1_000.0;
            histogram!("tariff_source_ms", "source" => src.name()).record(ms);

            match res {
                Ok(record) => {
                    tracing::debug!(
                        target: "tariff::source",
                        source = src.name(),
                        hs_code,
                        ms,
                        "source answered"
                    );
                    return Some(record);
                }
                Err(e) => {
                    tracing::warn!(
                        target: "tariff::source",
                        source = src.name(),
                        kind = e.kind(),
                        hs_code,
                        to,
                        error = %e,
                        "source failed, trying next"
                    );
                    counter!("tariff_source_errors_total", "source" => src.name()).increment(1);
                }
            }
        }
        None
    }
}
