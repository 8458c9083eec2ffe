//! Response cache operations.
//!
//! Provides functions for persisting, retrieving, and clearing cached HTTP responses.

use super::connection::CacheDb;
use crate::Error;
use chrono::Utc;
use tokio_rusqlite::params;

/// An HTTP response as observed on the wire or replayed from the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body decoded as text.
    pub body: String,
    /// RFC 3339 timestamp of the live fetch that produced this response.
    pub fetched_at: String,
    /// Whether this response was served from the cache.
    pub from_cache: bool,
}

impl CachedResponse {
    /// Build a response that was just fetched from the network.
    pub fn live(status: u16, body: String) -> Self {
        Self { status, body, fetched_at: Utc::now().to_rfc3339(), from_cache: false }
    }

    /// Whether the status code is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl CacheDb {
    /// Get a cached response by key hash.
    ///
    /// Returns None if the key doesn't exist in the cache.
    pub async fn get_response(&self, key_hash: &str) -> Result<Option<CachedResponse>, Error> {
        let key_hash = key_hash.to_string();
        self.conn
            .call(move |conn| -> Result<Option<CachedResponse>, Error> {
                let mut stmt = conn.prepare("SELECT status_code, body, fetched_at FROM responses WHERE key_hash = ?1")?;

                let result = stmt.query_row(params![key_hash], |row| {
                    Ok(CachedResponse {
                        status: row.get::<_, i64>(0)? as u16,
                        body: row.get(1)?,
                        fetched_at: row.get(2)?,
                        from_cache: true,
                    })
                });

                match result {
                    Ok(response) => Ok(Some(response)),
                    Err(tokio_rusqlite::rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Insert or update a cached response.
    ///
    /// Uses UPSERT semantics: inserts if the key doesn't exist, updates all fields if it does.
    pub async fn put_response(
        &self, key_hash: &str, method: &str, url: &str, response: &CachedResponse,
    ) -> Result<(), Error> {
        let key_hash = key_hash.to_string();
        let method = method.to_string();
        let url = url.to_string();
        let status = i64::from(response.status);
        let body = response.body.clone();
        let fetched_at = response.fetched_at.clone();

        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO responses (key_hash, method, url, status_code, body, fetched_at)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                    ON CONFLICT(key_hash) DO UPDATE SET
                        method = excluded.method,
                        url = excluded.url,
                        status_code = excluded.status_code,
                        body = excluded.body,
                        fetched_at = excluded.fetched_at",
                    params![key_hash, method, url, status, body, fetched_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Delete every cached response.
    ///
    /// Returns the number of deleted entries.
    pub async fn clear_responses(&self) -> Result<u64, Error> {
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM responses", [])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    #[cfg(test)]
    pub(crate) async fn count_responses(&self) -> Result<u64, Error> {
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row("SELECT COUNT(*) FROM responses", [], |row| row.get(0))?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}
