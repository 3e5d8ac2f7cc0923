#![deny(missing_docs)]

//! # Documenter
//!
//! Ties the collaborators together for one observed exchange:
//!
//! 1. **Lookup**: fetch the stored record for (path, method), if any.
//! 2. **Summarize**: ask the model, handing it the previous document.
//! 3. **Persist**: upsert the new document under the same key.
//!
//! Every step is awaited in sequence and any failure ends the request.

use crate::endpoint::{EndpointRecord, Observation};
use crate::error::AppResult;
use crate::oas::{aggregate_documents, DocumentInfo, OpenApiDocument};
use crate::storage::EndpointStore;
use crate::summarizer::Summarizer;
use log::{error, info, warn};
use std::sync::Arc;

/// Documentation workflow over injected collaborators.
#[derive(Clone)]
pub struct Documenter {
    store: Arc<dyn EndpointStore>,
    summarizer: Arc<dyn Summarizer>,
}

impl Documenter {
    /// Creates a documenter.
    pub fn new(store: Arc<dyn EndpointStore>, summarizer: Arc<dyn Summarizer>) -> Self {
        Self { store, summarizer }
    }

    /// The injected store.
    pub fn store(&self) -> &Arc<dyn EndpointStore> {
        &self.store
    }

    /// Documents one exchange and returns the stored record.
    pub async fn document(&self, observation: &Observation) -> AppResult<EndpointRecord> {
        let previous = self
            .store
            .find_by_key(&observation.path, observation.method)
            .await?;

        info!(
            "summarizing {} {} ({} known document)",
            observation.method,
            observation.path,
            if previous.is_some() { "refining" } else { "no" }
        );
        let document = self
            .summarizer
            .summarize(observation, previous.as_ref())
            .await
            .map_err(|e| {
                error!("model processing failed: {}", e);
                e
            })?;

        let record = self
            .store
            .upsert(&observation.path, observation.method, document)
            .await?;
        match previous {
            Some(_) => info!("updated endpoint {} {}", record.method, record.path),
            None => info!("created endpoint {} {}", record.method, record.path),
        }
        Ok(record)
    }

    /// Builds the aggregate document from every stored record, newest first.
    pub async fn aggregate(&self, info: DocumentInfo) -> AppResult<OpenApiDocument> {
        let records = self.store.list_by_recency().await?;
        aggregate_documents(&records, info)
    }

    /// Whether the store answers a trivial read.
    pub async fn health(&self) -> bool {
        match self.store.check().await {
            Ok(()) => true,
            Err(e) => {
                warn!("store health check failed: {}", e);
                false
            }
        }
    }
}
