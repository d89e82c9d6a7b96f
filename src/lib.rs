//! Daily Diet API
//!
//! A small HTTP backend where users log meals and track how well they stick
//! to their diet.
//!
//! # Architecture
//!
//! - **Server**: Axum router with tracing, timeout, rate limit and CORS layers
//! - **Sessions**: a UUID token issued at sign-up, sent back as a cookie or bearer header
//! - **Persistence**: `sqlx` store behind [`persistence::PersistenceLayer`] (SQLite or Postgres)
//! - **Summary**: [`domain::summarize`] computes meal counts and the best in-diet streak
//!
//! # Modules
//!
//! - [`api`]: route handlers
//! - [`config`]: layered configuration
//! - [`domain`]: users, meals, summary
//! - [`persistence`]: store trait and providers
//! - [`security`]: session gate and rate limiting

// Axum handlers are async even when they never await
#![allow(clippy::unused_async)]

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod security;
pub mod server;
pub mod telemetry;
pub mod validation;

use crate::config::AppConfig;
use crate::security::rate_limit::SimpleRateLimiter;

use persistence::PersistenceLayer;
use std::sync::Arc;

/// Application state shared across all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// User and meal store.
    pub persistence: Arc<dyn PersistenceLayer>,
    /// Global Rate Limiter
    pub rate_limiter: Arc<SimpleRateLimiter>,
    /// Global Configuration
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, persistence: Arc<dyn PersistenceLayer>) -> Self {
        let rate_limiter = Arc::new(SimpleRateLimiter::new(
            config.resilience.requests_per_second,
            config.resilience.burst_size,
        ));
        Self {
            persistence,
            rate_limiter,
            config,
        }
    }
}
