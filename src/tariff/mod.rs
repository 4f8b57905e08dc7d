// src/tariff/mod.rs
//! Tariff lookup: HS code resolution → source fallback chain → TTL cache.

pub mod cache;
pub mod error;
pub mod http;
pub mod router;
pub mod sources;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

use metrics::counter;

use crate::config::tariff::TariffConfig;
use crate::hs_code::{self, HsMatch};
use crate::tariff::cache::{CacheKey, Clock, SystemClock, TariffCache};
use crate::tariff::http::{HttpFetch, ReqwestFetcher};
use crate::tariff::router::{FallbackRouter, SourceSet};
use crate::tariff::sources::{EuSource, IndiaExportSource, KoreaSource, UsSource, WtoSource};

pub use crate::tariff::error::SourceError;
pub use crate::tariff::types::{DataOrigin, TariffRecord, TariffSource};

/// Outcome of one lookup, with diagnostics for the HTTP layer.
#[derive(Debug, Clone)]
pub struct Lookup {
    pub record: Option<TariffRecord>,
    pub cache_hit: bool,
    /// Present on cache misses (resolution is skipped on hits).
    pub hs: Option<HsMatch>,
}

/// Single entry point: cache check, HS resolution, fallback routing, cache fill.
pub struct TariffService {
    router: FallbackRouter,
    cache: TariffCache,
}

impl TariffService {
    pub fn new(router: FallbackRouter, cache: TariffCache) -> Self {
        crate::metrics::ensure_described();
        Self { router, cache }
    }

    /// Production wiring: reqwest fetcher, configured endpoints, wall clock.
    pub fn from_config(cfg: &TariffConfig) -> anyhow::Result<Self> {
        let http: Arc<dyn HttpFetch> = Arc::new(ReqwestFetcher::new(&cfg.http)?);
        Ok(Self::with_fetcher(cfg, http, Arc::new(SystemClock)))
    }

    /// Wire all sources over `http`; used by tests and offline runs.
    pub fn with_fetcher(cfg: &TariffConfig, http: Arc<dyn HttpFetch>, clock: Arc<dyn Clock>) -> Self {
        let s = &cfg.sources;
        let sources = SourceSet {
            us: Arc::new(UsSource::new(http.clone(), s.us_url.as_str())),
            eu: Arc::new(EuSource::new(http.clone(), s.eu_url.as_str())),
            korea: Arc::new(
                KoreaSource::new(http.clone(), s.korea_url.as_str())
                    .with_synthetic_fallback(cfg.korea.synthetic_fallback),
            ),
            wto: Arc::new(WtoSource::new(http.clone(), s.wto_url.as_str())),
            india: Arc::new(IndiaExportSource::new(http, s.india_url.as_str())),
        };
        let cache = TariffCache::new(
            Duration::from_millis(cfg.cache.ttl_ms),
            cfg.cache.capacity,
            clock,
        );
        Self::new(FallbackRouter::new(sources), cache)
    }

    pub fn cache(&self) -> &TariffCache {
        &self.cache
    }

    /// Tariff for `product` shipped `from` → `to`, or `None` when no source has data.
    /// Failures are not cached; the next call retries.
    pub async fn get_tariff_data(&self, product: &str, from: &str, to: &str) -> Option<TariffRecord> {
        self.lookup(product, from, to).await.record
    }

    pub async fn lookup(&self, product: &str, from: &str, to: &str) -> Lookup {
        counter!("tariff_lookups_total").increment(1);
        let key = CacheKey::new(product, from, to);

        if let Some(hit) = self.cache.get(&key) {
            counter!("tariff_cache_hits_total").increment(1);
            tracing::debug!(target: "tariff", product, from, to, "cache hit");
            return Lookup {
                record: Some(hit),
                cache_hit: true,
                hs: None,
            };
        }
        counter!("tariff_cache_misses_total").increment(1);

        let hs = hs_code::classify(product);
        if hs.is_fallback() {
            tracing::info!(
                target: "tariff",
                product,
                code = hs.code,
                "no HS match, using default code"
            );
        }

        let record = self.router.route(hs.code, from, to).await;
        match &record {
            Some(r) => {
                tracing::info!(
                    target: "tariff",
                    product,
                    from,
                    to,
                    hs_code = hs.code,
                    source = %r.source,
                    origin = ?r.data_origin,
                    "tariff resolved"
                );
                self.cache.put(key, r.clone());
            }
            None => {
                counter!("tariff_not_found_total").increment(1);
                tracing::info!(target: "tariff", product, from, to, hs_code = hs.code, "no source had data");
            }
        }

        Lookup {
            record,
            cache_hit: false,
            hs: Some(hs),
        }
    }
}
