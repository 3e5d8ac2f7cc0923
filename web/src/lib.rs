#![deny(missing_docs)]

//! # Autodoc Web Library
//!
//! Route handlers, the Postgres store, backend forwarding and the model
//! client of the documentation proxy.

use actix_web::{get, route, web, HttpRequest, HttpResponse};
use autodoc_core::oas::{DocumentInfo, EndpointDocument};
use autodoc_core::{AppError, AppResult, Documenter, EndpointStore, HttpMethod, MemoryStore};
use log::{debug, info, log_enabled, Level};
use serde::Serialize;
use std::sync::Arc;

/// Re-export diesel so generated models can access `crate::diesel`.
pub use diesel;

/// Runtime settings.
pub mod config;

/// Postgres-backed endpoint store.
pub mod db;

/// Swagger UI page.
pub mod docs;

/// JSON error responses.
pub mod error;

/// OpenAI-backed summarizer.
pub mod llm;

/// Data models generated from schema.
pub mod models;

/// Backend forwarding.
pub mod proxy;

/// Auto-generated database schema.
pub mod schema;

use config::Config;
use error::ApiError;
use llm::{ModelSettings, OpenAiSummarizer};
use proxy::Forwarder;

/// Shared state of every worker.
pub struct AppState {
    /// Lookup, summarize and persist.
    pub documenter: Documenter,
    /// Relays requests to the real backend.
    pub forwarder: Forwarder,
    /// `info` block of the aggregate document.
    pub docs_info: DocumentInfo,
}

impl AppState {
    /// Wires the collaborators selected by `config`.
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let store: Arc<dyn EndpointStore> = if config.in_memory {
            info!("keeping documents in memory");
            Arc::new(MemoryStore::new())
        } else {
            let url = config.database_url.as_deref().ok_or_else(|| {
                AppError::General("DATABASE_URL is required unless --in-memory is set".into())
            })?;
            Arc::new(db::PgStore::new(db::build_pool(url, config.pool_size)))
        };

        let client = reqwest::Client::new();
        let summarizer = OpenAiSummarizer::new(
            client.clone(),
            ModelSettings {
                base_url: config.openai_base_url.clone(),
                api_key: config.openai_api_key.clone(),
                model: config.model.clone(),
                shape: config.document_shape,
            },
        );

        Ok(Self {
            documenter: Documenter::new(store, Arc::new(summarizer)),
            forwarder: Forwarder::new(client, config.real_api_endpoint.clone()),
            docs_info: config.docs_info(),
        })
    }
}

#[derive(Serialize)]
struct Documented<'a> {
    status: &'static str,
    endpoint: &'a str,
    spec: &'a EndpointDocument,
}

async fn document_exchange(
    state: &AppState,
    req: &HttpRequest,
    target: &str,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let method: HttpMethod = req.method().as_str().parse()?;
    info!("starting documentation of {} {}", method, target);

    let headers = proxy::relay_headers(
        req.headers()
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_bytes())),
    );
    let observation = state
        .forwarder
        .forward(target, method, headers, body.to_vec())
        .await?;
    let record = state.documenter.document(&observation).await?;

    Ok(HttpResponse::Ok().json(Documented {
        status: "documented",
        endpoint: &record.path,
        spec: &record.document,
    }))
}

/// `/autodoc/<path>?<query>`: forwards to the configured base URL.
#[route(
    "/autodoc/{tail:.*}",
    method = "GET",
    method = "POST",
    method = "PUT",
    method = "PATCH",
    method = "DELETE"
)]
pub async fn autodoc_path(
    req: HttpRequest,
    body: web::Bytes,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let target = state
        .forwarder
        .resolve(req.uri().path(), req.uri().query())?;
    document_exchange(&state, &req, &target, body).await
}

/// `/autodoc?endpoint=<url-encoded target>`: forwards to an explicit URL.
#[route(
    "/autodoc",
    method = "GET",
    method = "POST",
    method = "PUT",
    method = "PATCH",
    method = "DELETE"
)]
pub async fn autodoc_query(
    req: HttpRequest,
    body: web::Bytes,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let target = proxy::query_target(req.uri().query())?;
    document_exchange(&state, &req, &target, body).await
}

/// Reports whether the store answers, as a JSON boolean.
#[get("/health")]
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.documenter.health().await)
}

/// The aggregate OpenAPI document of every documented endpoint.
#[get("/openapi.json")]
pub async fn openapi_json(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let document = state.documenter.aggregate(state.docs_info.clone()).await?;
    if log_enabled!(Level::Debug) {
        debug!(
            "serving aggregate document: {}",
            serde_json::to_string(&document).unwrap_or_default()
        );
    }
    Ok(HttpResponse::Ok().json(document))
}

/// Swagger UI over `/openapi.json`.
pub async fn swagger_ui() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(docs::SWAGGER_UI_HTML)
}

/// Registers every route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check)
        .service(openapi_json)
        .route("/", web::get().to(swagger_ui))
        .route("/docs", web::get().to(swagger_ui))
        .service(autodoc_query)
        .service(autodoc_path);
}
