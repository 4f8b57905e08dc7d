// src/config/mod.rs
pub mod tariff;

pub use tariff::TariffConfig;
