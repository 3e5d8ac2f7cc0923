#![deny(missing_docs)]

//! # OpenAPI Module
//!
//! - **models**: Document shapes (compact details, full operations, documents).
//! - **normalization**: Schema fragment rewriting into the OpenAPI 3.0 dialect.
//! - **generate**: Single-path document generation.
//! - **aggregate**: Folding many endpoints into one document.

pub mod aggregate;
pub mod generate;
pub mod models;
pub mod normalization;

pub use aggregate::aggregate_documents;
pub use generate::{derive_tag, generate_openapi_doc, generate_operation};
pub use models::{
    DetailParameter, DocumentInfo, EndpointDetails, EndpointDocument, Examples, MediaType,
    OpenApiDocument, Operation, OperationParameter, ParameterLocation, RequestBody, Response,
};
pub use normalization::{normalize_optional, normalize_schema};
