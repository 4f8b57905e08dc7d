//! Tariff Lookup Service: binary entrypoint.
//! Boots the Axum HTTP server, wiring config, metrics, routes, and shared state.

use shuttle_axum::ShuttleAxum;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tariff_lookup::metrics::Metrics;
use tariff_lookup::TariffConfig;

/// Compact tracing logs. Filter from RUST_LOG, defaulting to tariff events at info.
/// Skipped when TARIFF_LOG=0 (e.g. when the platform installs its own subscriber).
fn init_tracing() {
    if std::env::var("TARIFF_LOG").ok().as_deref() == Some("0") {
        return;
    }

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tariff=info,warn"));

    // try_init: the runtime may already have installed a global subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    init_tracing();

    let cfg = TariffConfig::load_default()?;
    info!(
        target: "tariff",
        ttl_ms = cfg.cache.ttl_ms,
        capacity = cfg.cache.capacity,
        korea_synthetic = cfg.korea.synthetic_fallback,
        default_from = %cfg.default_from,
        "tariff config loaded"
    );

    // Recorder first, so metric descriptions land in Prometheus.
    let metrics = Metrics::init(cfg.cache.ttl_ms)?;
    let router = tariff_lookup::app(&cfg)?.merge(metrics.router());

    Ok(router.into())
}
