//! # Actix Middleware Library
//!
//! Unified middleware components for Nexa Actix services
//!
//! ## Modules
//! - `jwt_auth`: JWT authentication middleware and `AuthUser` extractor
//! - `csrf`: CSRF double-submit cookie enforcement
//! - `logging`: Request/response logging through tracing
//! - `metrics`: Prometheus metrics middleware and exposition
//! - `error`: JSON error bodies shared by all middlewares

pub mod csrf;
pub mod error;
pub mod jwt_auth;
pub mod logging;
pub mod metrics;

pub use csrf::{CsrfConfig, CsrfMiddleware};
pub use error::json_error;
pub use jwt_auth::{AuthUser, JwtAuthMiddleware};
pub use logging::RequestLogging;
pub use metrics::MetricsMiddleware;
