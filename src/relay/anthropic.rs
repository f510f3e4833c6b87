use async_trait::async_trait;
use log::debug;
use reqwest::{Client as HttpClient, header::{HeaderMap, HeaderValue, CONTENT_TYPE}};
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;

use super::{Relay, RelayError};
use crate::cli::Args;

const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct AnthropicRelayClient {
    http: HttpClient,
    api_key: Option<String>,
    model: String,
    max_tokens: u32,
    base_url: String,
}

#[derive(Serialize, Deserialize)]
struct UpstreamMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<UpstreamMessage>,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: String,
}

impl AnthropicRelayClient {
    pub fn new(
        api_key: Option<String>,
        model: String,
        max_tokens: u32,
        base_url: String,
    ) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = HttpClient::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| Box::new(e) as Box<dyn StdError + Send + Sync>)?;

        Ok(Self {
            http,
            api_key,
            model,
            max_tokens,
            base_url,
        })
    }

    pub fn from_args(args: &Args) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        Self::new(
            args.upstream_api_key.clone().filter(|k| !k.is_empty()),
            args.chat_model.clone(),
            args.max_tokens,
            args.upstream_base_url.clone(),
        )
    }
}

#[async_trait]
impl Relay for AnthropicRelayClient {
    async fn forward(&self, message: &str) -> Result<String, RelayError> {
        if message.trim().is_empty() {
            return Err(RelayError::Validation("message must not be empty".to_string()));
        }

        let api_key = self.api_key.as_deref().ok_or_else(|| {
            RelayError::Configuration(
                "upstream API key is not set (ANTHROPIC_API_KEY)".to_string(),
            )
        })?;

        let url = format!("{}/v1/messages", self.base_url.trim_end_matches('/'));
        let req = MessagesRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            messages: vec![UpstreamMessage {
                role: "user".to_string(),
                content: message.to_string(),
            }],
        };

        debug!("Forwarding {} chars to {}", message.len(), url);

        let resp = self.http.post(&url)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&req)
            .send()
            .await
            .map_err(|e| RelayError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RelayError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let payload = resp.json::<MessagesResponse>()
            .await
            .map_err(|e| RelayError::Transport(e.to_string()))?;

        let text = payload.content
            .into_iter()
            .next()
            .map(|block| block.text)
            .ok_or_else(|| {
                RelayError::Transport("upstream response contained no content blocks".to_string())
            })?;

        Ok(text)
    }
}
