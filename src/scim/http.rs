//! HTTP utilities for SCIM REST API calls

use super::auth;
use super::errors;
use crate::config::ConnectorConfig;
use crate::error::{ConnectorError, ConnectorResult};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Media type sent with every request
pub const CONTENT_TYPE_SCIM: &str = "application/scim+json";

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and drops non-printable characters
pub fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| c.is_control(), "")
}

/// HTTP client wrapper for SCIM API calls
#[derive(Clone)]
pub struct ScimHttpClient {
    client: Client,
    config: Arc<ConnectorConfig>,
}

impl ScimHttpClient {
    /// Create a new HTTP client
    pub fn new(config: Arc<ConnectorConfig>) -> ConnectorResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("eduid-connector/", env!("CARGO_PKG_VERSION")))
            .danger_accept_invalid_certs(config.trust_all_certificates)
            .build()
            .map_err(|e| {
                ConnectorError::InvalidConfiguration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client, config })
    }

    /// Absolute URL for a path below the service address
    pub fn url(&self, path: &str) -> String {
        self.config.endpoint(path)
    }

    /// GET a JSON object
    pub async fn get(&self, url: &str) -> ConnectorResult<Map<String, Value>> {
        let body = self.execute(Method::GET, url, None).await?;
        parse_object(&body)
    }

    /// POST a JSON object, returning the JSON object in the response
    pub async fn post(&self, url: &str, document: &Map<String, Value>) -> ConnectorResult<Map<String, Value>> {
        let body = self.execute(Method::POST, url, Some(document)).await?;
        parse_object(&body)
    }

    /// PUT a JSON object, returning the JSON object in the response
    pub async fn put(&self, url: &str, document: &Map<String, Value>) -> ConnectorResult<Map<String, Value>> {
        let body = self.execute(Method::PUT, url, Some(document)).await?;
        parse_object(&body)
    }

    /// DELETE a resource; the response body is read and discarded
    pub async fn delete(&self, url: &str) -> ConnectorResult<()> {
        self.execute(Method::DELETE, url, None).await.map(|_| ())
    }

    /// Send one request and return its body once the status has been checked.
    ///
    /// The body is read to the end on every path, which hands the connection
    /// back to the pool before any error is returned.
    async fn execute(
        &self,
        method: Method,
        url: &str,
        document: Option<&Map<String, Value>>,
    ) -> ConnectorResult<String> {
        tracing::debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method.clone(), url)
            .header(CONTENT_TYPE, CONTENT_TYPE_SCIM);

        if let Some(header) = auth::authorization_header(&self.config)? {
            request = request.header(AUTHORIZATION, header);
        }

        if let Some(document) = document {
            // Request bodies may carry password attributes, only log their keys
            tracing::debug!(
                "{} body attributes: {:?}",
                method,
                document.keys().collect::<Vec<_>>()
            );
            let payload = serde_json::to_vec(document).map_err(|e| {
                ConnectorError::transport_with("Failed to serialize request body", e)
            })?;
            request = request.body(payload);
        }

        let response = request.send().await.map_err(|e| {
            ConnectorError::transport_with(format!("Failed to send request to {}: {}", url, e), e)
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            ConnectorError::transport_with(format!("Failed to read response body: {}", e), e)
        })?;

        tracing::debug!("response: {} - {}", status, sanitize_for_log(&body));

        if let Err(err) = errors::check_response(status, &body) {
            // Security: Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::warn!("API error: {} - {}", status, sanitize_for_log(&body));
            return Err(err);
        }

        Ok(body)
    }
}

/// Parse a response body that must be a JSON object
pub fn parse_object(body: &str) -> ConnectorResult<Map<String, Value>> {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(ConnectorError::transport(format!(
            "Expected a JSON object in response, got: {}",
            sanitize_for_log(&other.to_string())
        ))),
        Err(e) => Err(ConnectorError::transport_with(
            format!("Failed to parse response JSON: {}", e),
            e,
        )),
    }
}
