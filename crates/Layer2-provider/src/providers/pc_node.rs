//! PC Node client (OpenAI-compatible chat completions + context-sharing fields)

use crate::{
    error::ProviderError,
    r#trait::{ChatClient, ChatRequest, ConversationResult},
    ChatMessage,
};
use async_trait::async_trait;
use ctxbench_foundation::TestConfig;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const COMPLETIONS_PATH: &str = "/v1/chat/completions";
const HEALTH_PATH: &str = "/health";

/// HTTP client for a PC Node instance
///
/// The inner `reqwest::Client` keeps a connection pool, so one instance is
/// reused for the whole run.
pub struct PcNodeClient {
    client: Client,
    base_url: String,
}

impl PcNodeClient {
    /// Create a client for `base_url` with a per-request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ProviderError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        let mut builder = Client::builder().timeout(timeout);
        // A node on this machine is never reached through a proxy
        if is_loopback(&base_url) {
            builder = builder.no_proxy();
        }
        let client = builder
            .build()
            .map_err(|e| ProviderError::Unknown(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &TestConfig) -> Result<Self, ProviderError> {
        Self::new(&config.base_url, config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn build_request(request: &ChatRequest) -> PcNodeRequest<'_> {
        let sharing = request.shares_context();
        PcNodeRequest {
            model: &request.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            context_sharing: sharing.then_some(true),
            agent_id: if sharing {
                request.agent_id.as_deref()
            } else {
                None
            },
            shared_context_group: if sharing {
                request.shared_context_group.as_deref()
            } else {
                None
            },
        }
    }

    /// Send a completion request, surfacing every failure as an error
    pub async fn try_chat_completion(
        &self,
        request: &ChatRequest,
    ) -> Result<PcNodeResponse, ProviderError> {
        let body = Self::build_request(request);
        debug!(
            "POST {} ({} messages, context_sharing={})",
            COMPLETIONS_PATH,
            request.messages.len(),
            request.context_sharing
        );

        let response = self
            .client
            .post(self.endpoint(COMPLETIONS_PATH))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(&e))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::from_http_status(status.as_u16(), &body));
        }

        response
            .json::<PcNodeResponse>()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl ChatClient for PcNodeClient {
    async fn health_check(&self) -> bool {
        match self.client.get(self.endpoint(HEALTH_PATH)).send().await {
            Ok(resp) => resp.status() == StatusCode::OK,
            Err(e) => {
                debug!("Health check failed: {}", e);
                false
            }
        }
    }

    async fn chat_completion(&self, request: ChatRequest) -> ConversationResult {
        let start = Instant::now();
        let outcome = self
            .try_chat_completion(&request)
            .await
            .and_then(PcNodeResponse::into_parts);
        let response_time = start.elapsed().as_secs_f64();

        match outcome {
            Ok(parts) => ConversationResult::new(parts.content, parts.total_tokens, response_time)
                .with_compression_ratio(parts.compression_ratio)
                .with_context_size(parts.context_size),
            Err(e) => {
                warn!("Request failed: {}", e);
                ConversationResult::failed(response_time)
            }
        }
    }
}

fn is_loopback(base_url: &str) -> bool {
    Url::parse(base_url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_string()))
        .map(|h| matches!(h.as_str(), "localhost" | "127.0.0.1" | "[::1]" | "::1"))
        .unwrap_or(false)
}

// ============================================================================
// PC Node API Types
// ============================================================================

#[derive(Debug, Serialize)]
struct PcNodeRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    context_sharing: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    agent_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    shared_context_group: Option<&'a str>,
}

/// Raw completion response
#[derive(Debug, Deserialize)]
pub struct PcNodeResponse {
    choices: Vec<PcNodeChoice>,
    usage: PcNodeUsage,
    #[serde(default)]
    compression_ratio: Option<f64>,
    #[serde(default)]
    pc_compression_ratio: Option<f64>,
    #[serde(default)]
    context_size: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct PcNodeChoice {
    message: PcNodeMessage,
}

#[derive(Debug, Deserialize)]
struct PcNodeMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PcNodeUsage {
    total_tokens: u64,
}

/// The fields a [`ConversationResult`] is built from
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseParts {
    pub content: String,
    pub total_tokens: u64,
    pub compression_ratio: Option<f64>,
    pub context_size: Option<u64>,
}

impl PcNodeResponse {
    /// Extract `choices[0].message.content`, `usage.total_tokens` and the
    /// optional vendor fields
    pub fn into_parts(self) -> Result<ResponseParts, ProviderError> {
        let choice = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::InvalidResponse("No choices in response".to_string()))?;

        Ok(ResponseParts {
            content: choice.message.content.unwrap_or_default(),
            total_tokens: self.usage.total_tokens,
            compression_ratio: self.compression_ratio.or(self.pc_compression_ratio),
            context_size: self.context_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ChatMessage;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// One-shot HTTP server: answers a single request, returns the raw request
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            request
        });

        (format!("http://{}", addr), handle)
    }

    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut data = Vec::new();
        let mut buf = [0u8; 4096];

        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            data.extend_from_slice(&buf[..n]);

            let text = String::from_utf8_lossy(&data).to_string();
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if data.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }

        String::from_utf8_lossy(&data).to_string()
    }

    fn client(base_url: &str) -> PcNodeClient {
        PcNodeClient::new(base_url, Duration::from_secs(5)).unwrap()
    }

    fn request() -> ChatRequest {
        ChatRequest::new(vec![ChatMessage::user("hello")], &TestConfig::default())
    }

    #[test]
    fn test_request_body_without_sharing() {
        let req = request();
        let body = serde_json::to_value(PcNodeClient::build_request(&req)).unwrap();
        assert_eq!(body["model"], "gpt-3.5-turbo");
        assert_eq!(body["max_tokens"], 150);
        assert_eq!(body["messages"][0]["role"], "user");
        assert!(body.get("context_sharing").is_none());
        assert!(body.get("agent_id").is_none());
    }

    #[test]
    fn test_request_body_with_sharing() {
        let req = request()
            .with_context_sharing("tech_lead")
            .with_context_group(Some("project".to_string()));
        let body = serde_json::to_value(PcNodeClient::build_request(&req)).unwrap();
        assert_eq!(body["context_sharing"], true);
        assert_eq!(body["agent_id"], "tech_lead");
        assert_eq!(body["shared_context_group"], "project");
    }

    #[test]
    fn test_response_parts_fallback_ratio() {
        let raw = r#"{
            "choices": [{"message": {"role": "assistant", "content": "hi"}}],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15},
            "pc_compression_ratio": 0.35
        }"#;
        let parts = serde_json::from_str::<PcNodeResponse>(raw)
            .unwrap()
            .into_parts()
            .unwrap();
        assert_eq!(parts.content, "hi");
        assert_eq!(parts.total_tokens, 15);
        assert_eq!(parts.compression_ratio, Some(0.35));
        assert_eq!(parts.context_size, None);
    }

    #[test]
    fn test_response_without_choices() {
        let raw = r#"{"choices": [], "usage": {"total_tokens": 3}}"#;
        let err = serde_json::from_str::<PcNodeResponse>(raw)
            .unwrap()
            .into_parts()
            .unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse(_)));
    }

    #[test]
    fn test_is_loopback() {
        assert!(is_loopback("http://localhost:3000"));
        assert!(is_loopback("http://127.0.0.1:3000"));
        assert!(!is_loopback("https://pc-node.example.com"));
        assert!(!is_loopback("not a url"));
    }

    #[tokio::test]
    async fn test_chat_completion_success() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"{"choices":[{"message":{"content":"answer"}}],"usage":{"total_tokens":42},"compression_ratio":0.5,"context_size":2048}"#,
        )
        .await;

        let req = request().with_context_sharing("single_agent_tester");
        let result = client(&base_url).chat_completion(req).await;

        assert_eq!(result.content, "answer");
        assert_eq!(result.tokens, 42);
        assert_eq!(result.compression_ratio, Some(0.5));
        assert_eq!(result.context_size, Some(2048));
        assert!(result.response_time >= 0.0);

        let raw_request = server.await.unwrap();
        assert!(raw_request.starts_with("POST /v1/chat/completions"));
        assert!(raw_request.contains(r#""context_sharing":true"#));
        assert!(raw_request.contains(r#""agent_id":"single_agent_tester""#));
    }

    #[tokio::test]
    async fn test_chat_completion_server_error_degrades() {
        let (base_url, server) =
            serve_once("500 Internal Server Error", r#"{"error":"boom"}"#).await;

        let result = client(&base_url).chat_completion(request()).await;
        assert_eq!(result.tokens, 0);
        assert!(result.content.is_empty());
        assert!(result.compression_ratio.is_none());

        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_try_chat_completion_reports_status() {
        let (base_url, server) = serve_once("429 Too Many Requests", "slow down").await;

        let err = client(&base_url)
            .try_chat_completion(&request())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::RateLimited(_)));

        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_health_check() {
        let (base_url, server) = serve_once("200 OK", r#"{"status":"ok"}"#).await;
        assert!(client(&base_url).health_check().await);
        assert!(server.await.unwrap().starts_with("GET /health"));
    }

    #[tokio::test]
    async fn test_unreachable_node() {
        // Reserve a port, then free it so nothing is listening
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let client = client(&base_url);
        assert!(!client.health_check().await);

        let result = client.chat_completion(request()).await;
        assert_eq!(result.tokens, 0);
    }
}
