//! # Backend Forwarding
//!
//! Resolves the real backend URL for both proxy route forms, relays the
//! inbound request and captures the exchange as an [`Observation`].

use autodoc_core::{AppError, AppResult, HttpMethod, Observation};
use indexmap::IndexMap;
use log::info;
use percent_encoding::percent_decode_str;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use url::Url;

/// Mount point of both proxy route forms.
pub const PROXY_PREFIX: &str = "/autodoc";

/// Headers that describe the inbound hop rather than the request.
const HOP_HEADERS: [&str; 5] = [
    "host",
    "content-length",
    "connection",
    "transfer-encoding",
    "accept-encoding",
];

/// Target for `/autodoc/<rest>?<query>`: `base` + `<rest>` + `?<query>`.
pub fn catch_all_target(base: &str, request_path: &str, query: Option<&str>) -> String {
    let rest = request_path.strip_prefix(PROXY_PREFIX).unwrap_or(request_path);
    let mut target = format!("{}{}", base.trim_end_matches('/'), rest);
    if let Some(query) = query.filter(|q| !q.is_empty()) {
        target.push('?');
        target.push_str(query);
    }
    target
}

/// Target for `/autodoc?endpoint=<url-encoded target>`.
///
/// When the query starts with `endpoint=` everything after it is the target,
/// so unencoded `&` inside the target survives.
pub fn query_target(query: Option<&str>) -> AppResult<String> {
    let query = query.unwrap_or("");
    let target = match query.strip_prefix("endpoint=") {
        Some(encoded) => percent_decode_str(encoded).decode_utf8_lossy().into_owned(),
        None => url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == "endpoint")
            .map(|(_, value)| value.into_owned())
            .unwrap_or_default(),
    };
    if target.is_empty() {
        return Err(AppError::MissingParameter("endpoint".into()));
    }
    Ok(target)
}

/// Copies inbound headers for the outbound request, minus hop-by-hop ones.
pub fn relay_headers<'a, I>(headers: I) -> HeaderMap
where
    I: IntoIterator<Item = (&'a str, &'a [u8])>,
{
    let mut relayed = HeaderMap::new();
    for (name, value) in headers {
        if HOP_HEADERS.contains(&name.to_ascii_lowercase().as_str()) {
            continue;
        }
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_bytes(value),
        ) {
            relayed.append(name, value);
        }
    }
    relayed
}

/// Relays requests to the real backend.
#[derive(Clone)]
pub struct Forwarder {
    client: reqwest::Client,
    base_url: Option<String>,
}

impl Forwarder {
    /// `base_url` serves the catch-all form; the query form needs none.
    pub fn new(client: reqwest::Client, base_url: Option<String>) -> Self {
        Self { client, base_url }
    }

    /// Resolves the catch-all target against the configured base URL.
    pub fn resolve(&self, request_path: &str, query: Option<&str>) -> AppResult<String> {
        let base = self.base_url.as_deref().ok_or_else(|| {
            AppError::General("REAL_API_ENDPOINT is not configured".into())
        })?;
        Ok(catch_all_target(base, request_path, query))
    }

    /// Sends the request and captures the exchange.
    ///
    /// The body is relayed verbatim for every verb but `GET`. Both the
    /// request body (when present) and the response must be JSON.
    pub async fn forward(
        &self,
        target: &str,
        method: HttpMethod,
        headers: HeaderMap,
        body: Vec<u8>,
    ) -> AppResult<Observation> {
        let url = Url::parse(target)
            .map_err(|e| AppError::Upstream(format!("invalid target URL `{}`: {}", target, e)))?;
        info!("forwarding {} request to {}", method, url);

        let request_body = if method.carries_body() && !body.is_empty() {
            Some(serde_json::from_slice(&body).map_err(|e| {
                AppError::General(format!("request body is not valid JSON: {}", e))
            })?)
        } else {
            None
        };

        let mut request = self
            .client
            .request(outbound_method(method), url.clone())
            .headers(headers);
        if method.carries_body() {
            request = request.body(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("request to {} failed: {}", url, e)))?;

        let status = response.status().as_u16();
        let response_headers: IndexMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::Upstream(format!("reading response from {}: {}", url, e)))?;
        let response_json = serde_json::from_slice(&bytes).map_err(|e| {
            AppError::Upstream(format!("{} did not answer with JSON: {}", url, e))
        })?;

        Ok(Observation {
            method,
            path: url.path().to_string(),
            params: url.query_pairs().into_owned().collect(),
            body: request_body,
            response: response_json,
            status,
            headers: response_headers,
        })
    }
}

fn outbound_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catch_all_target() {
        assert_eq!(
            catch_all_target(
                "https://api.example.com/",
                "/autodoc/api/v1/project-users",
                Some("order=desc&limit=50")
            ),
            "https://api.example.com/api/v1/project-users?order=desc&limit=50"
        );
        assert_eq!(
            catch_all_target("https://api.example.com", "/autodoc/users", Some("")),
            "https://api.example.com/users"
        );
        assert_eq!(
            catch_all_target("https://api.example.com", "/autodoc/users", None),
            "https://api.example.com/users"
        );
    }

    #[test]
    fn test_query_target_decodes() {
        let target = query_target(Some(
            "endpoint=https%3A%2F%2Fapi.example.com%2Fusers%3Fpage%3D1%26lang%3Des",
        ))
        .unwrap();
        assert_eq!(target, "https://api.example.com/users?page=1&lang=es");
    }

    #[test]
    fn test_query_target_keeps_unencoded_ampersands() {
        let target =
            query_target(Some("endpoint=https://api.example.com/users?page=1&lang=es")).unwrap();
        assert_eq!(target, "https://api.example.com/users?page=1&lang=es");
    }

    #[test]
    fn test_query_target_anywhere_in_query() {
        let target =
            query_target(Some("trace=1&endpoint=https%3A%2F%2Fapi.example.com%2Fx")).unwrap();
        assert_eq!(target, "https://api.example.com/x");
    }

    #[test]
    fn test_query_target_missing() {
        for query in [None, Some(""), Some("endpoint="), Some("other=1")] {
            let err = query_target(query).unwrap_err();
            assert_eq!(err.to_string(), "Missing required query parameter: endpoint");
        }
    }

    #[test]
    fn test_relay_headers_drops_hop_headers() {
        let headers = relay_headers(vec![
            ("Host", b"localhost:8080".as_slice()),
            ("Content-Length", b"12".as_slice()),
            ("authorization", b"Bearer token".as_slice()),
            ("accept", b"application/json".as_slice()),
        ]);
        assert_eq!(headers.len(), 2);
        assert_eq!(headers["authorization"], "Bearer token");
        assert!(headers.get("host").is_none());
    }

    #[test]
    fn test_resolve_requires_base_url() {
        let forwarder = Forwarder::new(reqwest::Client::new(), None);
        assert!(forwarder.resolve("/autodoc/users", None).is_err());

        let forwarder = Forwarder::new(
            reqwest::Client::new(),
            Some("http://backend.local".into()),
        );
        assert_eq!(
            forwarder.resolve("/autodoc/users", Some("a=1")).unwrap(),
            "http://backend.local/users?a=1"
        );
    }
}
