//! SQLite-backed cache for HTTP responses.
//!
//! This module provides a persistent, request-addressed cache using SQLite
//! with async access via tokio-rusqlite. It supports:
//!
//! - Request-addressed storage using SHA-256 hashing
//! - Automatic schema migrations
//! - WAL mode
//! - Full invalidation, either through an open handle or by removing the files

pub mod connection;
pub mod files;
pub mod hash;
pub mod migrations;
pub mod responses;
pub mod store;

pub use crate::Error;

pub use connection::CacheDb;
pub use files::remove_cache_files;
pub use responses::CachedResponse;
pub use store::{CacheRequest, CacheStore};

/// Cache schema version, part of the cache file name.
///
/// Bump it when the stored format changes so older files are never reopened.
pub const CACHE_VERSION: u32 = 1;
