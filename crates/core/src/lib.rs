//! Core types and shared functionality for howpopular.
//!
//! This crate provides:
//! - Response cache with SQLite backend
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{CacheDb, CacheRequest, CacheStore, CachedResponse};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
