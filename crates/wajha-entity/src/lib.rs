//! # wajha-entity
//!
//! Domain entity models for Wajha. Every struct in this crate represents
//! a stored record or a domain value object. All entities derive `Debug`,
//! `Clone`, `Serialize`, `Deserialize`; database-backed entities
//! additionally derive `sqlx::FromRow`.

pub mod audit;
pub mod session;
pub mod user;
