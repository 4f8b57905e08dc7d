// src/tariff/http.rs
//! Outbound page/API fetching used by the source adapters.

use std::sync::Mutex;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Url;

use crate::config::tariff::HttpConfig;
use crate::tariff::error::SourceError;

/// Raw response from a source: status plus body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub status: u16,
    pub body: String,
}

impl FetchedPage {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait HttpFetch: Send + Sync {
    /// GET `url`; `accept` sets the Accept header when given.
    /// Transport errors map to `SourceError::Network`; any status is returned as-is.
    async fn get(&self, url: &Url, accept: Option<&'static str>) -> Result<FetchedPage, SourceError>;
}

/// Real HTTP fetcher backed by `reqwest`.
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new(cfg: &HttpConfig) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(cfg.user_agent.as_str());
        // 0 keeps the client default (no timeout).
        if cfg.connect_timeout_secs > 0 {
            builder = builder.connect_timeout(Duration::from_secs(cfg.connect_timeout_secs));
        }
        if cfg.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(cfg.timeout_secs));
        }
        let client = builder.build().context("building tariff http client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpFetch for ReqwestFetcher {
    async fn get(&self, url: &Url, accept: Option<&'static str>) -> Result<FetchedPage, SourceError> {
        let mut req = self.client.get(url.clone());
        if let Some(a) = accept {
            req = req.header(ACCEPT, a);
        }
        let resp = req.send().await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        Ok(FetchedPage { status, body })
    }
}

/// Canned answer for a URL prefix.
#[derive(Debug, Clone)]
pub enum FixtureReply {
    Page(FetchedPage),
    Fail(String),
}

/// Deterministic fetcher for tests and offline runs.
///
/// Routes are matched by URL prefix in insertion order. Unrouted URLs fail with
/// a network error, so an empty fetcher behaves like having no connectivity.
#[derive(Debug, Default)]
pub struct FixtureFetcher {
    routes: Vec<(String, FixtureReply)>,
    calls: Mutex<Vec<String>>,
}

impl FixtureFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, prefix: &str, status: u16, body: &str) -> Self {
        self.routes.push((
            prefix.to_string(),
            FixtureReply::Page(FetchedPage {
                status,
                body: body.to_string(),
            }),
        ));
        self
    }

    pub fn with_failure(mut self, prefix: &str, message: &str) -> Self {
        self.routes
            .push((prefix.to_string(), FixtureReply::Fail(message.to_string())));
        self
    }

    /// Every URL requested so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Number of requests whose URL starts with `prefix`.
    pub fn calls_to(&self, prefix: &str) -> usize {
        self.calls()
            .iter()
            .filter(|u| u.starts_with(prefix))
            .count()
    }
}

#[async_trait]
impl HttpFetch for FixtureFetcher {
    async fn get(&self, url: &Url, _accept: Option<&'static str>) -> Result<FetchedPage, SourceError> {
        let url = url.as_str();
        if let Ok(mut c) = self.calls.lock() {
            c.push(url.to_string());
        }
        match self.routes.iter().find(|(p, _)| url.starts_with(p.as_str())) {
            Some((_, FixtureReply::Page(page))) => Ok(page.clone()),
            Some((_, FixtureReply::Fail(msg))) => Err(SourceError::Network(msg.clone())),
            None => Err(SourceError::Network(format!("no route to {url}"))),
        }
    }
}
