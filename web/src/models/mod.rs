//! Database models.

/// Documented endpoints.
pub mod endpoints;
