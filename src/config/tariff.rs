// src/config/tariff.rs
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::{env, fs};

use crate::tariff::cache::{DEFAULT_CAPACITY, DEFAULT_TTL_MS};
use crate::tariff::sources::{eu, india, korea, us, wto};

pub const DEFAULT_TARIFF_CONFIG_PATH: &str = "config/tariff.toml";

pub const ENV_TARIFF_CONFIG_PATH: &str = "TARIFF_CONFIG_PATH";
pub const ENV_CACHE_TTL_MS: &str = "TARIFF_CACHE_TTL_MS";
pub const ENV_CACHE_CAPACITY: &str = "TARIFF_CACHE_CAPACITY";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "TARIFF_HTTP_TIMEOUT_SECS";
pub const ENV_KOREA_SYNTHETIC: &str = "TARIFF_KOREA_SYNTHETIC";

/// Desktop browser UA; some customs portals reject unknown agents.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

fn default_from() -> String {
    "India".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TariffConfig {
    /// Origin country when a request omits it.
    #[serde(default = "default_from")]
    pub default_from: String,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub sources: SourceUrls,
    #[serde(default)]
    pub korea: KoreaConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_ms: u64,
    pub capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,
    /// Whole-request timeout; 0 = none.
    pub timeout_secs: u64,
    /// 0 = none.
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SourceUrls {
    pub us_url: String,
    pub eu_url: String,
    pub wto_url: String,
    pub india_url: String,
    pub korea_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct KoreaConfig {
    /// Serve the built-in reference table when the live page fails.
    pub synthetic_fallback: bool,
}

impl Default for TariffConfig {
    fn default() -> Self {
        Self {
            default_from: default_from(),
            cache: CacheConfig::default(),
            http: HttpConfig::default(),
            sources: SourceUrls::default(),
            korea: KoreaConfig::default(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_ms: DEFAULT_TTL_MS,
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 10,
            connect_timeout_secs: 4,
        }
    }
}

impl Default for SourceUrls {
    fn default() -> Self {
        Self {
            us_url: us::DEFAULT_URL.to_string(),
            eu_url: eu::DEFAULT_URL.to_string(),
            wto_url: wto::DEFAULT_URL.to_string(),
            india_url: india::DEFAULT_URL.to_string(),
            korea_url: korea::DEFAULT_URL.to_string(),
        }
    }
}

impl Default for KoreaConfig {
    fn default() -> Self {
        Self {
            synthetic_fallback: true,
        }
    }
}

impl TariffConfig {
    /// Parse a TOML file, then apply env overrides.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading tariff config from {}", path.display()))?;
        let mut cfg: TariffConfig = toml::from_str(&data)
            .with_context(|| format!("parsing tariff config {}", path.display()))?;
        cfg.apply_env_overrides();
        cfg.sanitize();
        Ok(cfg)
    }

    /// Load using env var + fallbacks:
    /// 1) $TARIFF_CONFIG_PATH (must exist)
    /// 2) config/tariff.toml
    /// 3) built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = env::var(ENV_TARIFF_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from_file(&pb);
            }
            return Err(anyhow!(
                "{ENV_TARIFF_CONFIG_PATH} points to non-existent path {}",
                pb.display()
            ));
        }
        let p = PathBuf::from(DEFAULT_TARIFF_CONFIG_PATH);
        if p.exists() {
            return Self::load_from_file(&p);
        }
        let mut cfg = Self::default();
        cfg.apply_env_overrides();
        cfg.sanitize();
        Ok(cfg)
    }

    /// Unparseable values are ignored.
    fn apply_env_overrides(&mut self) {
        if let Some(v) = parse_env::<u64>(ENV_CACHE_TTL_MS) {
            self.cache.ttl_ms = v;
        }
        if let Some(v) = parse_env::<usize>(ENV_CACHE_CAPACITY) {
            self.cache.capacity = v;
        }
        if let Some(v) = parse_env::<u64>(ENV_HTTP_TIMEOUT_SECS) {
            self.http.timeout_secs = v;
        }
        match env::var(ENV_KOREA_SYNTHETIC).ok().as_deref().map(str::trim) {
            Some("1") | Some("true") => self.korea.synthetic_fallback = true,
            Some("0") | Some("false") => self.korea.synthetic_fallback = false,
            _ => {}
        }
    }

    fn sanitize(&mut self) {
        self.cache.capacity = self.cache.capacity.max(1);
        if self.default_from.trim().is_empty() {
            self.default_from = default_from();
        }
        if self.http.user_agent.trim().is_empty() {
            self.http.user_agent = DEFAULT_USER_AGENT.to_string();
        }
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|s| s.trim().parse::<T>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clear_env() {
        for k in [
            ENV_TARIFF_CONFIG_PATH,
            ENV_CACHE_TTL_MS,
            ENV_CACHE_CAPACITY,
            ENV_HTTP_TIMEOUT_SECS,
            ENV_KOREA_SYNTHETIC,
        ] {
            env::remove_var(k);
        }
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg: TariffConfig = toml::from_str(
            r#"
            [cache]
            ttl_ms = 5000
            [sources]
            wto_url = "http://localhost:9000/wto"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.cache.ttl_ms, 5000);
        assert_eq!(cfg.cache.capacity, DEFAULT_CAPACITY);
        assert_eq!(cfg.sources.wto_url, "http://localhost:9000/wto");
        assert_eq!(cfg.sources.us_url, us::DEFAULT_URL);
        assert_eq!(cfg.default_from, "India");
        assert!(cfg.korea.synthetic_fallback);
        assert_eq!(cfg.http.user_agent, DEFAULT_USER_AGENT);
    }

    #[serial_test::serial]
    #[test]
    fn env_overrides_apply_and_garbage_is_ignored() {
        clear_env();
        let tmp = tempfile::tempdir().unwrap();
        let p = tmp.path().join("tariff.toml");
        fs::write(&p, "default_from = \"Vietnam\"\n[cache]\ncapacity = 0\n").unwrap();

        env::set_var(ENV_CACHE_TTL_MS, "1234");
        env::set_var(ENV_HTTP_TIMEOUT_SECS, "soon");
        env::set_var(ENV_KOREA_SYNTHETIC, "0");
        let cfg = TariffConfig::load_from_file(&p).unwrap();
        clear_env();

        assert_eq!(cfg.default_from, "Vietnam");
        assert_eq!(cfg.cache.ttl_ms, 1234);
        assert_eq!(cfg.cache.capacity, 1);
        assert_eq!(cfg.http.timeout_secs, 10);
        assert!(!cfg.korea.synthetic_fallback);
    }

    #[serial_test::serial]
    #[test]
    fn missing_env_path_is_an_error() {
        clear_env();
        env::set_var(ENV_TARIFF_CONFIG_PATH, "/definitely/not/here/tariff.toml");
        let res = TariffConfig::load_default();
        clear_env();
        assert!(res.is_err());
    }
}
