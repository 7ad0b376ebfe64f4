use reqwest::{Client, ClientBuilder, StatusCode};
use serde::Deserialize;
use serde_json::json;

use crate::config::Config;
use crate::error::{AppError, Result};

#[derive(Debug, Deserialize, Clone)]
struct ErrorResponse {
    code: i32,
    message: String,

    // Ex: 'INVALID_ARGUMENT' | 'PERMISSION_DENIED' | 'RESOURCE_EXHAUSTED'
    status: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
struct ErrorResponseContainer {
    error: ErrorResponse,
}

fn client_builder(config: &Config) -> ClientBuilder {
    let builder = Client::builder();
    match config.timeout() {
        Some(timeout) => builder.timeout(timeout),
        None => builder,
    }
}

/// Builds the HTTP client shared by every request. No timeout is set unless
/// one was configured.
pub fn http_client(config: &Config) -> Result<Client> {
    Ok(client_builder(config).build()?)
}

/// `ApiClient` sends a single prompt to the Gemini `generateContent` endpoint
/// and hands back the raw response body.
///
/// Extracting the generated text from that body is left to the caller, see
/// [`crate::extract::extract_text`].
pub struct ApiClient {
    client: Client,

    // The base URL, model and sampling settings come from here
    config: Config,

    api_key: String,
}

impl ApiClient {
    pub fn new(client: Client, config: Config, api_key: String) -> Self {
        ApiClient {
            client,
            config,
            api_key,
        }
    }

    /// The request URL, with the key appended as a query parameter as-is.
    pub fn endpoint_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.config.api.trim_end_matches('/'),
            self.config.model_id,
            self.api_key
        )
    }

    // the endpoint URL without the key, safe for log output
    fn redacted_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key=***",
            self.config.api.trim_end_matches('/'),
            self.config.model_id,
        )
    }

    /// Posts `prompt` to the API and returns the flattened response body.
    ///
    /// # Returns:
    /// - `Ok(body)` on HTTP 200, with every line of the body trimmed and joined.
    /// - `Err(AppError::Status)` for any other status, carrying the error body
    ///   flattened the same way.
    /// - `Err(AppError::Transport)` if the request could not be sent or the
    ///   body could not be read.
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let body = self.build_request_body(prompt);
        tracing::debug!(url = %self.redacted_url(), "sending generateContent request");

        let response = self
            .client
            .post(self.endpoint_url())
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let body = flatten_body(&response.text().await?);
        tracing::debug!(%status, bytes = body.len(), "response received");

        if status != StatusCode::OK {
            if let Ok(container) = serde_json::from_str::<ErrorResponseContainer>(&body) {
                tracing::warn!(
                    code = container.error.code,
                    status = container.error.status.as_deref().unwrap_or("unknown"),
                    "API request failed: {}",
                    container.error.message
                );
            }
            return Err(AppError::Status { status, body });
        }

        Ok(body)
    }

    /// Constructs the JSON request body for `prompt`.
    ///
    /// The body always has the shape `{"contents":[{"parts":[{"text": prompt}]}]}`.
    /// A `generationConfig` object is only added when at least one sampling
    /// option (`max_tokens`, `temp`, `top_p`, `top_k`, `seed`) is configured.
    pub fn build_request_body(&self, prompt: &str) -> serde_json::Value {
        let mut body = json!({
            "contents": [
                {
                    "parts": [
                        { "text": prompt }
                    ]
                }
            ]
        });

        // add in some optional parameters to the request
        let mut generation_config = serde_json::Map::new();
        if let Some(max_tokens) = self.config.max_tokens {
            generation_config.insert("maxOutputTokens".into(), json!(max_tokens));
        }
        if let Some(temp) = self.config.temp {
            generation_config.insert("temperature".into(), json!(temp));
        }
        if let Some(top_p) = self.config.top_p {
            generation_config.insert("topP".into(), json!(top_p));
        }
        if let Some(top_k) = self.config.top_k {
            generation_config.insert("topK".into(), json!(top_k));
        }
        if let Some(seed) = self.config.seed {
            generation_config.insert("seed".into(), json!(seed));
        }
        if !generation_config.is_empty() {
            body["generationConfig"] = serde_json::Value::Object(generation_config);
        }

        body
    }
}

/// Trims every line of `text` and concatenates them without separators.
pub fn flatten_body(text: &str) -> String {
    text.lines().map(str::trim).collect()
}
