//! # wajha-core
//!
//! Core crate for the Wajha content-management backend. Contains the
//! configuration schemas and the unified error system.
//!
//! This crate has **no** internal dependencies on other Wajha crates.

pub mod config;
pub mod error;
pub mod result;

pub use error::AppError;
pub use result::AppResult;
