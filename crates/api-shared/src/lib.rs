//! # API Shared
//!
//! Shared wire types and services for the Hospital AI HTTP API.
//!
//! Contains:
//! - Request/response bodies with OpenAPI schemas (`types` module)
//! - Shared services like `HealthService`
//!
//! Used by `api-rest`, and by anything else that needs to speak the same JSON.

pub mod health;
pub mod types;

pub use health::HealthService;
pub use types::*;
