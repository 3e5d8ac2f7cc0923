#![deny(missing_docs)]

//! # Summarizer
//!
//! The model collaborator. Implementations own prompt construction and model
//! selection; this module only fixes the contract and the output shapes.

use crate::endpoint::{EndpointRecord, Observation};
use crate::error::{AppError, AppResult};
use crate::oas::{EndpointDetails, EndpointDocument, Operation};
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Produces an endpoint document from one observed exchange.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Describes `observation`, refining `previous` when the endpoint is already known.
    ///
    /// Failures (transport, malformed or invalid output) are [`AppError::Generation`].
    async fn summarize(
        &self,
        observation: &Observation,
        previous: Option<&EndpointRecord>,
    ) -> AppResult<EndpointDocument>;
}

/// Which document shape the model is asked to produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DocumentShape {
    /// The compact shape expanded by the generator.
    #[default]
    Details,
    /// A full OpenAPI Operation object.
    Operation,
}

impl DocumentShape {
    /// Parses and validates raw model output as this shape.
    pub fn decode(self, raw: Value) -> AppResult<EndpointDocument> {
        let document = match self {
            DocumentShape::Details => serde_json::from_value::<EndpointDetails>(raw)
                .map(EndpointDocument::Details),
            DocumentShape::Operation => {
                serde_json::from_value::<Operation>(raw).map(EndpointDocument::Operation)
            }
        }
        .map_err(|e| {
            AppError::Generation(format!(
                "model output does not match the {} shape: {}",
                self, e
            ))
        })?;
        document.validate()?;
        Ok(document)
    }
}

impl fmt::Display for DocumentShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentShape::Details => f.write_str("details"),
            DocumentShape::Operation => f.write_str("operation"),
        }
    }
}

impl FromStr for DocumentShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "details" => Ok(DocumentShape::Details),
            "operation" => Ok(DocumentShape::Operation),
            other => Err(format!(
                "unknown document shape `{}` (expected `details` or `operation`)",
                other
            )),
        }
    }
}
