//! # wajha-api
//!
//! HTTP API layer for Wajha built on Axum.
//!
//! Provides the REST endpoints, middleware (rate limiting, audit trail,
//! CORS, logging), extractors, DTOs, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::ApiError;
pub use state::AppState;
