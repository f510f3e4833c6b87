pub mod anthropic;

use async_trait::async_trait;
use std::error::Error as StdError;
use std::sync::Arc;
use thiserror::Error;

use crate::cli::Args;
use self::anthropic::AnthropicRelayClient;

/// Failure taxonomy for a relay call. `Validation` and `Configuration`
/// are raised before any upstream request is made.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Configuration(String),

    /// Non-success status from the upstream API; `body` is the raw error
    /// payload, kept for diagnostics.
    #[error("upstream returned status {status}: {body}")]
    Upstream { status: u16, body: String },

    /// Network failure or a success payload that could not be parsed.
    #[error("{0}")]
    Transport(String),
}

#[async_trait]
pub trait Relay: Send + Sync {
    /// Forwards one message to the upstream completion API and returns the
    /// generated text verbatim. Exactly one upstream request per call, no
    /// retries, no history.
    async fn forward(&self, message: &str) -> Result<String, RelayError>;
}

pub fn new_client(args: &Args) -> Result<Arc<dyn Relay>, Box<dyn StdError + Send + Sync>> {
    let client = AnthropicRelayClient::from_args(args)?;
    Ok(Arc::new(client))
}
