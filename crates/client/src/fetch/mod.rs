//! Cached HTTP fetch pipeline.
//!
//! ### Request identity
//! - A User-Agent is picked at random from a fixed pool for every fetch.
//! - Proxies come from `<scheme>_proxy` environment variables (HTTP family only).
//!
//! ### TLS
//! - With `disable_ssl`, `https://` URLs are rewritten to `http://` and
//!   certificate verification is off.
//! - Certificate failures surface as `Error::Tls`; there is no automatic
//!   plaintext retry.
//!
//! ### Caching
//! - Every request goes through the [`CacheStore`]; only 2xx responses are kept.

pub mod identity;
pub mod proxy;

use std::error::Error as StdError;
use std::io;
use std::time::Instant;

use async_trait::async_trait;
use howpopular_core::{AppConfig, CacheRequest, CacheStore, CachedResponse, Error};
use reqwest::{Client, header};
use url::Url;

pub use identity::{USER_AGENTS, random_user_agent};
pub use proxy::ProxyConfig;

use crate::resolve::PageSource;

/// Accept header sent with every search request.
const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Configuration for the fetcher.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Use plain HTTP and skip certificate verification (default: false)
    pub disable_ssl: bool,

    /// Proxies to route requests through (default: none)
    pub proxies: ProxyConfig,

    /// Accept header, also part of the cache key
    pub accept: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { disable_ssl: false, proxies: ProxyConfig::default(), accept: ACCEPT_HTML.to_string() }
    }
}

impl FetchConfig {
    /// Derive fetch settings from the application config and the proxy environment.
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self { disable_ssl: config.disable_ssl, proxies: ProxyConfig::from_env(), ..Default::default() }
    }
}

/// HTTP fetcher that reads through a [`CacheStore`].
pub struct Fetcher<'a> {
    http: Client,
    config: FetchConfig,
    store: &'a CacheStore,
}

impl<'a> Fetcher<'a> {
    /// Create a new fetcher with the given configuration and store.
    pub fn new(config: FetchConfig, store: &'a CacheStore) -> Result<Self, Error> {
        let builder = Client::builder()
            .use_rustls_tls()
            .danger_accept_invalid_certs(config.disable_ssl)
            .gzip(true)
            .brotli(true)
            .deflate(true);

        let http = config
            .proxies
            .apply(builder)?
            .build()
            .map_err(|e| Error::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config, store })
    }

    /// Fetch `url` and return the response body.
    ///
    /// Non-2xx responses are returned as-is (and not cached); only transport
    /// failures are errors.
    pub async fn fetch(&self, url: &str) -> Result<String, Error> {
        let url = self.effective_url(url)?;
        let user_agent = random_user_agent();
        let request = CacheRequest::get(url.as_str()).with_vary_headers(self.config.accept.as_str());

        let response = self
            .store
            .get_or_fetch(&request, || self.fetch_live(&url, user_agent))
            .await
            .inspect_err(|e| {
                if matches!(e, Error::Tls(_)) {
                    tracing::error!("certificate verification failed for {}: {}", url, e);
                }
            })?;

        if !response.is_success() {
            tracing::warn!("{} returned status {}", url, response.status);
        }

        Ok(response.body)
    }

    /// Parse `url`, downgrading `https` to `http` when TLS is disabled.
    fn effective_url(&self, url: &str) -> Result<Url, Error> {
        let mut parsed = Url::parse(url.trim()).map_err(|e| Error::InvalidUrl(format!("{url}: {e}")))?;

        match parsed.scheme() {
            "http" => {}
            "https" if self.config.disable_ssl => {
                parsed
                    .set_scheme("http")
                    .map_err(|_| Error::InvalidUrl(format!("cannot downgrade {url} to http")))?;
            }
            "https" => {}
            scheme => return Err(Error::InvalidUrl(format!("unsupported scheme: {scheme}"))),
        }

        Ok(parsed)
    }

    async fn fetch_live(&self, url: &Url, user_agent: &str) -> Result<CachedResponse, Error> {
        let start = Instant::now();

        let response = self
            .http
            .get(url.as_str())
            .header(header::USER_AGENT, user_agent)
            .header(header::ACCEPT, &self.config.accept)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        let body = response.text().await.map_err(classify)?;

        tracing::debug!("fetched {} in {}ms ({} bytes, status {})", url, start.elapsed().as_millis(), body.len(), status);

        Ok(CachedResponse::live(status.as_u16(), body))
    }
}

#[async_trait]
impl PageSource for Fetcher<'_> {
    async fn fetch_page(&self, url: &str) -> Result<String, Error> {
        self.fetch(url).await
    }
}

/// Map a transport error onto the fetch failure taxonomy.
fn classify(err: reqwest::Error) -> Error {
    let detail = error_chain(&err);

    if is_certificate_error(&err) {
        Error::Tls(detail)
    } else if err.is_builder() {
        Error::InvalidUrl(detail)
    } else {
        Error::Network(detail)
    }
}

/// Whether the chain holds a rustls certificate rejection.
///
/// The TLS stack wraps rustls errors in `io::Error`, whose `source()` skips
/// the wrapped error, so each `io::Error` is unwrapped with `get_ref`.
fn is_certificate_error(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(tls) = e.downcast_ref::<rustls::Error>() {
            return matches!(
                tls,
                rustls::Error::InvalidCertificate(_)
                    | rustls::Error::NoCertificatesPresented
                    | rustls::Error::InvalidCertRevocationList(_)
            );
        }
        if let Some(inner) = e.downcast_ref::<io::Error>().and_then(io::Error::get_ref)
            && is_certificate_error(inner)
        {
            return true;
        }
        current = e.source();
    }
    false
}

fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut parts = vec![err.to_string()];
    let mut current = err.source();
    while let Some(e) = current {
        let text = e.to_string();
        if !parts.iter().any(|p| p.contains(&text)) {
            parts.push(text);
        }
        current = e.source();
    }
    parts.join(": ")
}
