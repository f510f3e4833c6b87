use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Host address and port for the relay server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:4000")]
    pub server_addr: String,

    /// Base URL of the upstream completion API.
    #[arg(long, env = "UPSTREAM_BASE_URL", default_value = "https://api.anthropic.com")]
    pub upstream_base_url: String,

    /// API key for the upstream completion API. A missing key is reported as
    /// a structured failure when a relay call is made, not at startup.
    #[arg(long, env = "ANTHROPIC_API_KEY")]
    pub upstream_api_key: Option<String>,

    /// Model identifier sent with every completion request.
    #[arg(long, env = "CHAT_MODEL", default_value = "claude-3-opus-20240229")]
    pub chat_model: String,

    /// Maximum number of output tokens requested per completion.
    #[arg(long, env = "MAX_TOKENS", default_value = "4000")]
    pub max_tokens: u32,

    /// Run an interactive terminal chat session instead of the HTTP server.
    #[arg(long, default_value = "false")]
    pub console: bool,

    /// Enable debug logging/output
    #[arg(long, env = "DEBUG", default_value = "false")]
    pub debug: bool,

    /// Optional path to the TLS certificate file (PEM format) for serving HTTPS. Requires --tls-key-path.
    #[arg(long, env = "TLS_CERT_PATH")]
    pub tls_cert_path: Option<String>,

    /// Optional path to the TLS private key file (PEM format) for serving HTTPS. Requires --tls-cert-path.
    #[arg(long, env = "TLS_KEY_PATH")]
    pub tls_key_path: Option<String>,

    #[arg(long, env = "ENABLE_TLS", default_value = "false")]
    pub enable_tls: bool,
}
