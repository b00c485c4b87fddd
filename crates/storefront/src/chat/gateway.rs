//! Remote assistant gateway client.
//!
//! The hosted assistant is a black-box remote function: it receives the full
//! session log and returns either `{"message": "..."}` or
//! `{"error": "..."}`. The two failure shapes stay distinct all the way up -
//! a reported error is the gateway speaking, a transport failure is the
//! network - because the session manager surfaces them differently.

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::config::AssistantConfig;

use super::types::ChatMessage;

/// Errors from a gateway invocation.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The gateway answered with a structured error payload.
    #[error("gateway reported error: {0}")]
    Reported(String),

    /// The call itself failed: network, timeout, or an undecodable body.
    #[error("transport failure: {0}")]
    Transport(String),
}

/// The external service boundary that performs conversational inference.
pub trait AssistantGateway {
    /// Send the full message log (system first) and return the assistant's
    /// reply text.
    fn complete(
        &self,
        messages: &[ChatMessage],
    ) -> impl Future<Output = Result<String, GatewayError>> + Send;
}

/// Request body for the inference gateway.
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    messages: &'a [ChatMessage],
}

/// Response body from the inference gateway.
#[derive(Debug, Deserialize)]
struct CompletionReply {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// HTTP client for the hosted inference gateway.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    endpoint: url::Url,
}

impl HttpGateway {
    /// Create a gateway client from configuration.
    ///
    /// The request timeout bounds how long a session can sit awaiting a
    /// reply; an elapsed timeout surfaces as a transport failure.
    ///
    /// # Panics
    ///
    /// Panics if the API key contains invalid header characters.
    #[must_use]
    pub fn new(config: &AssistantConfig) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let bearer = format!("Bearer {}", config.api_key.expose_secret());
        headers.insert(
            reqwest::header::AUTHORIZATION,
            HeaderValue::from_str(&bearer).expect("Invalid API key for header"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            endpoint: config.endpoint.clone(),
        }
    }
}

impl AssistantGateway for HttpGateway {
    #[instrument(skip(self, messages), fields(turns = messages.len()))]
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, GatewayError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&CompletionRequest { messages })
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        let body = response.text().await.map_err(transport)?;

        let reply: CompletionReply = serde_json::from_str(&body).map_err(|e| {
            if status.is_success() {
                GatewayError::Transport(format!("undecodable gateway response: {e}"))
            } else {
                GatewayError::Reported(format!("gateway returned {status}"))
            }
        })?;

        if let Some(error) = reply.error {
            return Err(GatewayError::Reported(error));
        }
        if !status.is_success() {
            return Err(GatewayError::Reported(format!("gateway returned {status}")));
        }

        Ok(reply.message.unwrap_or_default())
    }
}

fn transport(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Transport("request timed out".to_string())
    } else {
        GatewayError::Transport(e.to_string())
    }
}
