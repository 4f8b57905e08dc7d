// src/lib.rs
// Public library surface for the service binary, the probe and integration tests.

pub mod api;
pub mod config;
pub mod hs_code;
pub mod metrics;
pub mod tariff;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::config::TariffConfig;
pub use crate::tariff::{Lookup, TariffRecord, TariffService};

use std::sync::Arc;

/// Build the HTTP app from a loaded config (no `/metrics`; the binary adds it).
pub fn app(cfg: &TariffConfig) -> anyhow::Result<axum::Router> {
    let tariffs = Arc::new(TariffService::from_config(cfg)?);
    Ok(router(AppState {
        tariffs,
        default_from: cfg.default_from.clone(),
    }))
}
