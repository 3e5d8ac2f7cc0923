#![deny(missing_docs)]

//! # Autodoc Core
//!
//! Core library for turning observed API traffic into OpenAPI documentation.
//!
//! - **oas**: Schema normalization, path-item generation and aggregation.
//! - **endpoint**: Endpoint identity, records and captured observations.
//! - **storage**: The `EndpointStore` seam plus an in-memory implementation.
//! - **summarizer**: The `Summarizer` seam for the model collaborator.
//! - **documenter**: Orchestration of lookup, summarization and upsert.

/// Shared error types.
pub mod error;

/// Endpoint identity and captured traffic.
pub mod endpoint;

/// OpenAPI normalization, generation and aggregation.
pub mod oas;

/// Persistence seam.
pub mod storage;

/// Model collaborator seam.
pub mod summarizer;

/// Documentation workflow.
pub mod documenter;

pub use documenter::Documenter;
pub use endpoint::{EndpointRecord, HttpMethod, Observation};
pub use error::{AppError, AppResult, ErrorCategory};
pub use oas::{
    aggregate_documents, derive_tag, generate_openapi_doc, normalize_schema, DocumentInfo,
    EndpointDetails, EndpointDocument, OpenApiDocument, Operation,
};
pub use storage::{EndpointStore, MemoryStore};
pub use summarizer::{DocumentShape, Summarizer};
