//! Read-through response store used by the fetcher.
//!
//! A `CacheStore` is either backed by a [`CacheDb`] or disabled. A disabled
//! store performs every fetch live and persists nothing.

use std::future::Future;
use std::path::Path;

use super::connection::CacheDb;
use super::hash::compute_cache_key;
use super::responses::CachedResponse;
use crate::{AppConfig, Error};

/// Identity of an outbound request for caching purposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheRequest {
    pub method: String,
    pub url: String,
    /// Request headers that change the response, joined into one string.
    pub vary_headers: String,
}

impl CacheRequest {
    /// A GET request for `url` with no varying headers.
    pub fn get(url: impl Into<String>) -> Self {
        Self { method: "GET".into(), url: url.into(), vary_headers: String::new() }
    }

    pub fn with_vary_headers(mut self, vary_headers: impl Into<String>) -> Self {
        self.vary_headers = vary_headers.into();
        self
    }

    /// SHA-256 key of this request.
    pub fn key(&self) -> String {
        compute_cache_key(&self.method, &self.url, &self.vary_headers)
    }
}

/// Process-wide response store with an explicit open/close lifecycle.
#[derive(Debug, Clone)]
pub struct CacheStore {
    db: Option<CacheDb>,
}

impl CacheStore {
    /// Open (or create) the on-disk store at `path`.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        Ok(Self { db: Some(CacheDb::open(path).await?) })
    }

    /// Open a store backed by an in-memory database.
    pub async fn open_in_memory() -> Result<Self, Error> {
        Ok(Self { db: Some(CacheDb::open_in_memory().await?) })
    }

    /// A store that never persists anything.
    pub fn disabled() -> Self {
        Self { db: None }
    }

    /// Open the store described by `config`, or a disabled one when caching is off.
    pub async fn from_config(config: &AppConfig) -> Result<Self, Error> {
        if config.disable_cache {
            tracing::debug!("response cache disabled by configuration");
            return Ok(Self::disabled());
        }
        Self::open(config.cache_file()).await
    }

    pub fn is_enabled(&self) -> bool {
        self.db.is_some()
    }

    /// Look up a persisted response without fetching.
    ///
    /// A disabled store always misses.
    pub async fn lookup(&self, request: &CacheRequest) -> Result<Option<CachedResponse>, Error> {
        match &self.db {
            Some(db) => db.get_response(&request.key()).await,
            None => Ok(None),
        }
    }

    /// Return the persisted response for `request`, or run `fetch` and persist its result.
    ///
    /// Only 2xx responses are persisted; anything else is returned to the
    /// caller and fetched again next time.
    pub async fn get_or_fetch<F, Fut>(&self, request: &CacheRequest, fetch: F) -> Result<CachedResponse, Error>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<CachedResponse, Error>>,
    {
        let Some(db) = &self.db else {
            return fetch().await;
        };

        let key = request.key();
        if let Some(cached) = db.get_response(&key).await? {
            tracing::debug!("cache hit for {} {}", request.method, request.url);
            return Ok(cached);
        }

        tracing::debug!("cache miss for {} {}", request.method, request.url);
        let response = fetch().await?;

        if response.is_success() {
            db.put_response(&key, &request.method, &request.url, &response).await?;
        } else {
            tracing::debug!("not caching status {} for {}", response.status, request.url);
        }

        Ok(response)
    }

    /// Remove every persisted response regardless of key.
    ///
    /// Returns the number of deleted entries.
    pub async fn clear_all(&self) -> Result<u64, Error> {
        match &self.db {
            Some(db) => {
                let deleted = db.clear_responses().await?;
                tracing::info!("cleared {} cached responses", deleted);
                Ok(deleted)
            }
            None => Ok(0),
        }
    }

    /// Release the underlying connection.
    pub async fn close(self) -> Result<(), Error> {
        match self.db {
            Some(db) => db.close().await,
            None => Ok(()),
        }
    }
}
