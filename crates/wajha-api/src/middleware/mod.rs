//! HTTP middleware: rate limiting, audit trail, session refresh,
//! CORS, and request logging.

pub mod audit;
pub mod cors;
pub mod logging;
pub mod rate_limit;
pub mod session;
