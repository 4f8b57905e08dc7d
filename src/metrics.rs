// src/metrics.rs
use anyhow::Context;
use axum::{extract::State, routing::get, Router};
use metrics::{describe_counter, describe_gauge, describe_histogram, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

/// One-time metrics registration (so series show up on /metrics).
pub fn ensure_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("tariff_lookups_total", "Tariff lookups requested.");
        describe_counter!("tariff_cache_hits_total", "Lookups served from cache.");
        describe_counter!(
            "tariff_cache_misses_total",
            "Lookups that went to the sources."
        );
        describe_counter!(
            "tariff_not_found_total",
            "Lookups where every source in the chain failed."
        );
        describe_counter!(
            "tariff_source_errors_total",
            "Source adapter failures, labelled by source."
        );
        describe_counter!(
            "tariff_source_synthetic_total",
            "Korea lookups answered from the reference table."
        );
        describe_histogram!("tariff_source_ms", "Source adapter latency in milliseconds.");
        describe_gauge!("tariff_cache_ttl_ms", "Configured cache TTL in milliseconds.");
    });
}

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder and publish the cache TTL gauge.
    /// Only one recorder can exist per process.
    pub fn init(ttl_ms: u64) -> anyhow::Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("prometheus: install recorder")?;

        ensure_described();
        gauge!("tariff_cache_ttl_ms").set(ttl_ms as f64);

        Ok(Self { handle })
    }

    /// `/metrics` in the Prometheus text format.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/metrics", get(render))
            .with_state(self.handle.clone())
    }
}

async fn render(State(handle): State<PrometheusHandle>) -> String {
    handle.render()
}
