//! Data-access layer for the kanban backend.
//!
//! This crate owns the session-bound backend client and the repositories
//! for boards, board columns, and tasks. It is a library with no HTTP or
//! CLI surface; the application layer composes it, and the aggregation
//! logic lives in the `services` crate.
//!
//! Every repository call maps to one backend request and surfaces the
//! backend's error unchanged. There are no retries, timeouts, or caches
//! here; those are caller concerns.

pub mod client;
pub mod config;
pub mod models;
pub mod session;

pub use client::{Client, ClientError};
pub use config::{
    BACKEND_PUBLIC_KEY_VAR, BACKEND_URL_VAR, BackendConfig, ConfigError, get_max_connections,
};
pub use session::{Anonymous, SessionTokens, StaticToken};
