//! # Document Aggregation
//!
//! Folds stored endpoint records into one document for the viewer.

use crate::endpoint::EndpointRecord;
use crate::error::AppResult;
use crate::oas::models::{DocumentInfo, OpenApiDocument};
use serde_json::Map;

/// Merges every record into a single document, in iteration order.
///
/// Methods on the same path coexist. A repeated (path, method) key is
/// overwritten wholesale by the later record; records are not re-sorted.
pub fn aggregate_documents<'a, I>(records: I, info: DocumentInfo) -> AppResult<OpenApiDocument>
where
    I: IntoIterator<Item = &'a EndpointRecord>,
{
    let mut document = OpenApiDocument::empty(info);
    document.components = Some(Map::new());

    for record in records {
        let operation = record.document.to_operation(&record.path, record.method)?;
        document
            .paths
            .entry(record.path.clone())
            .or_default()
            .insert(record.method.as_lower().to_string(), operation);
    }

    log::debug!(
        "aggregated {} path(s) into the OpenAPI document",
        document.paths.len()
    );
    Ok(document)
}
