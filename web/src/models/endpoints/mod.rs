//! Endpoint table models.

/// Generated endpoint models and Diesel mappings.
pub mod generated;
/// Re-export generated models for convenient access.
pub use generated::*;

use autodoc_core::{AppError, AppResult, EndpointRecord};

impl TryFrom<Endpoints> for EndpointRecord {
    type Error = AppError;

    fn try_from(row: Endpoints) -> AppResult<Self> {
        Ok(EndpointRecord {
            id: row.id,
            method: row.method.parse()?,
            document: serde_json::from_value(row.spec).map_err(|e| {
                AppError::Database(format!(
                    "stored document for {} {} is unreadable: {}",
                    row.method, row.path, e
                ))
            })?,
            path: row.path,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
