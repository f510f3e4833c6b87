use crate::cli::Args;
use crate::relay::{Relay, RelayError};
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use axum::{
    routing::post,
    Router,
    Json,
    extract::State,
    response::IntoResponse,
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use log::{error, info};

#[derive(Deserialize)]
pub struct RelayRequest {
    // Absent message is treated the same as empty: rejected with 400.
    #[serde(default)]
    pub message: String,
}

#[derive(Serialize)]
pub struct RelayResponse {
    pub response: String,
}

#[derive(Serialize)]
pub struct RelayErrorBody {
    pub error: String,
}

#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<dyn Relay>,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/relay", post(relay_handler))
        .layer(cors)
        .with_state(state)
}

pub async fn start_http_server(
    addr_str: &str,
    state: AppState,
    args: &Args,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let addr = addr_str.parse::<SocketAddr>()?;
    let app = router(state);

    if args.enable_tls {
        if let (Some(cert_path), Some(key_path)) = (&args.tls_cert_path, &args.tls_key_path) {
            let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(
                cert_path,
                key_path,
            ).await?;

            info!("Serving HTTPS relay on https://{}", addr);
            axum_server::bind_rustls(addr, tls_config)
                .serve(app.into_make_service())
                .await?;
            return Ok(());
        }
        return Err("TLS enabled but --tls-cert-path or --tls-key-path is missing".into());
    }

    info!("Serving HTTP relay on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind {}: {}. Try a different port.", addr, e))?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

async fn relay_handler(
    State(state): State<AppState>,
    Json(req): Json<RelayRequest>,
) -> impl IntoResponse {
    match state.relay.forward(&req.message).await {
        Ok(text) => (StatusCode::OK, Json(RelayResponse { response: text })).into_response(),
        Err(err) => {
            error!("Relay request failed: {}", err);
            let body = RelayErrorBody { error: error_body(&err) };
            (error_status(&err), Json(body)).into_response()
        }
    }
}

fn error_status(err: &RelayError) -> StatusCode {
    match err {
        RelayError::Validation(_) => StatusCode::BAD_REQUEST,
        // Pass the upstream's own status through; fall back to 502 if it is
        // not a representable HTTP status.
        RelayError::Upstream { status, .. } => {
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
        }
        RelayError::Configuration(_) | RelayError::Transport(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn error_body(err: &RelayError) -> String {
    match err {
        RelayError::Validation(reason) => reason.clone(),
        RelayError::Upstream { body, .. } => format!("Upstream API error: {}", body),
        other => format!("Failed to process chat request: {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    enum Mode {
        Reply(String),
        Upstream(u16),
        Broken,
    }

    struct StubRelay {
        mode: Mode,
    }

    #[async_trait]
    impl Relay for StubRelay {
        async fn forward(&self, message: &str) -> Result<String, RelayError> {
            if message.trim().is_empty() {
                return Err(RelayError::Validation("message must not be empty".to_string()));
            }
            match &self.mode {
                Mode::Reply(text) => Ok(text.clone()),
                Mode::Upstream(status) => Err(RelayError::Upstream {
                    status: *status,
                    body: "{\"error\":{\"type\":\"overloaded_error\"}}".to_string(),
                }),
                Mode::Broken => Err(RelayError::Transport("connection reset".to_string())),
            }
        }
    }

    async fn spawn_app(mode: Mode) -> String {
        let state = AppState {
            relay: Arc::new(StubRelay { mode }),
        };
        let app = router(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app.into_make_service()).await.unwrap();
        });
        format!("http://{}/relay", addr)
    }

    #[tokio::test]
    async fn valid_message_returns_the_generated_text() {
        let url = spawn_app(Mode::Reply("4".to_string())).await;
        let resp = reqwest::Client::new()
            .post(&url)
            .json(&serde_json::json!({"message": "What is 2+2?"}))
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status().as_u16(), 200);
        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body["response"], "4");
    }

    #[tokio::test]
    async fn empty_message_is_a_400() {
        let url = spawn_app(Mode::Reply("unused".to_string())).await;
        let resp = reqwest::Client::new()
            .post(&url)
            .json(&serde_json::json!({"message": "   "}))
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status().as_u16(), 400);
        let body: serde_json::Value = resp.json().await.unwrap();
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn missing_message_field_is_a_400() {
        let url = spawn_app(Mode::Reply("unused".to_string())).await;
        let resp = reqwest::Client::new()
            .post(&url)
            .json(&serde_json::json!({}))
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status().as_u16(), 400);
    }

    #[tokio::test]
    async fn upstream_status_passes_through() {
        let url = spawn_app(Mode::Upstream(429)).await;
        let resp = reqwest::Client::new()
            .post(&url)
            .json(&serde_json::json!({"message": "hello"}))
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status().as_u16(), 429);
        let body: serde_json::Value = resp.json().await.unwrap();
        let error = body["error"].as_str().unwrap();
        assert!(error.starts_with("Upstream API error:"));
        assert!(error.contains("overloaded_error"));
    }

    #[tokio::test]
    async fn transport_failure_is_a_500() {
        let url = spawn_app(Mode::Broken).await;
        let resp = reqwest::Client::new()
            .post(&url)
            .json(&serde_json::json!({"message": "hello"}))
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status().as_u16(), 500);
        let body: serde_json::Value = resp.json().await.unwrap();
        assert!(body["error"].as_str().unwrap().contains("connection reset"));
    }
}
