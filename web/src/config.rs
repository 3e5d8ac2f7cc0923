//! # Configuration
//!
//! Command line flags with environment fallbacks. `main` loads `.env` first,
//! so every `env` name below may also come from that file.

use autodoc_core::oas::DocumentInfo;
use autodoc_core::DocumentShape;
use clap::Parser;

/// Runtime settings of the documentation proxy.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about = "Documentation proxy: forwards API calls and documents them")]
pub struct Config {
    /// Address to listen on.
    #[clap(long, env = "AUTODOC_BIND", default_value = "127.0.0.1:8080")]
    pub bind: String,

    /// Postgres connection string.
    #[clap(long, env = "DATABASE_URL", required_unless_present = "in_memory")]
    pub database_url: Option<String>,

    /// Keep documents in process memory instead of Postgres.
    #[clap(long, env = "AUTODOC_IN_MEMORY")]
    pub in_memory: bool,

    /// Base URL of the real API, used by the `/autodoc/<path>` form.
    #[clap(long, env = "REAL_API_ENDPOINT")]
    pub real_api_endpoint: Option<String>,

    /// API key for the model provider.
    #[clap(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Chat-completions API root.
    #[clap(long, env = "OPENAI_BASE_URL", default_value = "https://api.openai.com/v1")]
    pub openai_base_url: String,

    /// Model used to generate documents.
    #[clap(long, env = "AUTODOC_MODEL", default_value = "gpt-4-turbo")]
    pub model: String,

    /// Document shape requested from the model: `details` or `operation`.
    #[clap(long, env = "AUTODOC_DOCUMENT_SHAPE", default_value = "details")]
    pub document_shape: DocumentShape,

    /// Title of the aggregate document.
    #[clap(long, default_value = "My API")]
    pub docs_title: String,

    /// Version of the aggregate document.
    #[clap(long, default_value = "1.0.0")]
    pub docs_version: String,

    /// Maximum number of pooled database connections.
    #[clap(long, env = "AUTODOC_POOL_SIZE", default_value_t = 10)]
    pub pool_size: u32,
}

impl Config {
    /// `info` block of the aggregate document.
    pub fn docs_info(&self) -> DocumentInfo {
        DocumentInfo::new(self.docs_title.clone(), self.docs_version.clone())
    }
}
