//! # OpenAI Summarizer
//!
//! [`Summarizer`] over the chat-completions API. The model is asked for a
//! JSON object in the configured [`DocumentShape`]; the reply is decoded and
//! validated before it is returned.

use async_trait::async_trait;
use autodoc_core::oas::EndpointDocument;
use autodoc_core::{AppError, AppResult, DocumentShape, EndpointRecord, Observation, Summarizer};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Settings for [`OpenAiSummarizer`].
#[derive(Debug, Clone)]
pub struct ModelSettings {
    /// API root, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    /// Bearer token. Calls fail with a generation error when absent.
    pub api_key: Option<String>,
    /// Model name.
    pub model: String,
    /// Shape requested from the model.
    pub shape: DocumentShape,
}

/// Chat-completions backed summarizer.
pub struct OpenAiSummarizer {
    client: reqwest::Client,
    settings: ModelSettings,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
    temperature: f32,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: Option<String>,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

impl OpenAiSummarizer {
    /// Creates a summarizer sharing `client`.
    pub fn new(client: reqwest::Client, settings: ModelSettings) -> Self {
        Self { client, settings }
    }

    async fn complete(&self, system: String, user: String) -> AppResult<String> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::Generation("OPENAI_API_KEY is not configured".into()))?;

        let request = ChatRequest {
            model: &self.settings.model,
            messages: vec![
                ChatMessage {
                    role: "system".into(),
                    content: Some(system),
                },
                ChatMessage {
                    role: "user".into(),
                    content: Some(user),
                },
            ],
            response_format: ResponseFormat {
                kind: "json_object",
            },
            temperature: 0.0,
        };

        let url = format!(
            "{}/chat/completions",
            self.settings.base_url.trim_end_matches('/')
        );
        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Generation(format!("model request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AppError::Generation(format!(
                "model API returned {}: {}",
                status, detail
            )));
        }

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::Generation(format!("unreadable model response: {}", e)))?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AppError::Generation("model returned no content".into()))
    }
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    async fn summarize(
        &self,
        observation: &Observation,
        previous: Option<&EndpointRecord>,
    ) -> AppResult<EndpointDocument> {
        info!(
            "asking {} for a {} document of {} {}",
            self.settings.model, self.settings.shape, observation.method, observation.path
        );
        let system = system_prompt(self.settings.shape);
        let user = user_prompt(observation, previous)?;
        let content = self.complete(system, user).await?;
        debug!("model reply: {}", content);

        let raw: Value = serde_json::from_str(&content)
            .map_err(|e| AppError::Generation(format!("model reply is not JSON: {}", e)))?;
        self.settings.shape.decode(raw)
    }
}

/// Instructions fixing the output shape.
pub fn system_prompt(shape: DocumentShape) -> String {
    let shape_rules = match shape {
        DocumentShape::Operation => [
            "Reply with one JSON object: an OpenAPI 3.0 Operation Object.",
            "Allowed keys: tags, summary, description, operationId, parameters, requestBody, responses, deprecated, security.",
            "responses is required and holds at least one status code, each with a description.",
            "A parameter has either schema or content, never both; its `in` is query, header, path or cookie.",
            "requestBody, when present, must contain content.",
        ]
        .join("\n"),
        DocumentShape::Details => [
            "Reply with one JSON object with exactly these keys:",
            "description (string), parameters (array of {in, name, schema, description}),",
            "request_schema (JSON Schema or null), response_schema (JSON Schema),",
            "examples ({request, response}).",
            "Parameter `in` is query, header, path or cookie.",
        ]
        .join("\n"),
    };
    format!(
        "You document HTTP APIs in OpenAPI 3.0.\n{}\n\
         Schemas must describe the example response exactly.\n\
         Use the response headers to pick content types.\n\
         When a current document is given, keep its structure and refine it.",
        shape_rules
    )
}

/// The observed exchange, with list responses cut to one element.
pub fn user_prompt(
    observation: &Observation,
    previous: Option<&EndpointRecord>,
) -> AppResult<String> {
    let body = match &observation.body {
        Some(body) => serde_json::to_string(body)?,
        None => "None".to_string(),
    };
    let mut sections = vec![
        format!(
            "Document the operation {} {}",
            observation.method, observation.path
        ),
        format!("Params: {}", serde_json::to_string(&observation.params)?),
        format!("Body: {}", body),
        format!(
            "Example Response ({}): {}",
            observation.status,
            serde_json::to_string_pretty(&observation.condensed_response())?
        ),
        format!(
            "Response Headers: {}",
            serde_json::to_string(&observation.headers)?
        ),
    ];
    if let Some(previous) = previous {
        sections.push(format!(
            "Current Document: {}",
            serde_json::to_string(&previous.document)?
        ));
    }
    Ok(sections.join("\n\n"))
}
