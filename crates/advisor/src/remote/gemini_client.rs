use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, error, warn};

use common::errors::ModelError;
use common::traits::LanguageModel;

use crate::remote::gemini_types::{GeminiRequest, GeminiResponse};

pub const SYSTEM_INSTRUCTION: &str = "You are a quantitative trading assistant. \
You read tabular market features and answer with a single JSON object.";

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
    timeout: Duration,
}

impl GeminiClient {
    pub fn new(
        base_url: &str,
        model: &str,
        api_key: &str,
        timeout: Duration,
    ) -> Result<Self, ModelError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ModelError::Unavailable(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
            timeout,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    pub async fn generate_content(&self, prompt: &str) -> Result<String, ModelError> {
        let started = Instant::now();
        let request = GeminiRequest::single_turn(SYSTEM_INSTRUCTION, prompt);

        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!("Gemini rate limited the request");
            return Err(ModelError::Unavailable(format!(
                "rate limited by model endpoint ({})",
                status
            )));
        }
        if !status.is_success() {
            let error_text = resp.text().await.unwrap_or_default();
            error!("Gemini request failed: {} {}", status, error_text);
            return Err(ModelError::Unavailable(format!(
                "model endpoint returned {}: {}",
                status,
                error_text.trim()
            )));
        }

        let body = resp
            .json::<GeminiResponse>()
            .await
            .map_err(|e| self.transport_error(e))?;

        let text = body.first_text().ok_or_else(|| {
            let reason = body
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .or_else(|| body.candidates.first().and_then(|c| c.finish_reason.clone()))
                .unwrap_or_else(|| "no candidates".to_string());
            ModelError::Unavailable(format!("model returned no text ({})", reason))
        })?;

        debug!(
            "Gemini answered {} chars in {:?}",
            text.len(),
            started.elapsed()
        );
        Ok(text)
    }

    fn transport_error(&self, e: reqwest::Error) -> ModelError {
        if e.is_timeout() {
            warn!("Gemini call exceeded {:?}", self.timeout);
            ModelError::Timeout(self.timeout)
        } else {
            error!("Gemini call failed: {}", e);
            ModelError::Unavailable(e.to_string())
        }
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String, ModelError> {
        self.generate_content(prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves exactly one HTTP response and returns the base URL to reach it.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });

        format!("http://{}", addr)
    }

    async fn read_request(socket: &mut tokio::net::TcpStream) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                return;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf).to_string();
            if let Some(head_end) = text.find("\r\n\r\n") {
                let content_length = text[..head_end]
                    .lines()
                    .find_map(|l| {
                        let (name, value) = l.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())?
                    })
                    .unwrap_or(0);
                if buf.len() >= head_end + 4 + content_length {
                    return;
                }
            }
        }
    }

    fn client(base_url: &str, timeout: Duration) -> GeminiClient {
        GeminiClient::new(base_url, "gemini-test", "key", timeout).unwrap()
    }

    #[tokio::test]
    async fn test_returns_candidate_text() {
        let base = serve_once(
            "200 OK",
            r#"{"candidates":[{"content":{"parts":[{"text":"{\"signal\":\"SHORT\"}"}],"role":"model"},"finishReason":"STOP"}]}"#,
        )
        .await;

        let text = client(&base, Duration::from_secs(5))
            .complete("prompt")
            .await
            .unwrap();
        assert_eq!(text, r#"{"signal":"SHORT"}"#);
    }

    #[tokio::test]
    async fn test_rate_limit_is_unavailable() {
        let base = serve_once("429 Too Many Requests", r#"{"error":{"code":429}}"#).await;

        let err = client(&base, Duration::from_secs(5))
            .complete("prompt")
            .await
            .unwrap_err();
        assert!(matches!(err, ModelError::Unavailable(msg) if msg.contains("rate limited")));
    }

    #[tokio::test]
    async fn test_server_error_is_unavailable() {
        let base = serve_once("500 Internal Server Error", r#"{"error":"boom"}"#).await;

        let err = client(&base, Duration::from_secs(5))
            .complete("prompt")
            .await
            .unwrap_err();
        assert!(matches!(err, ModelError::Unavailable(msg) if msg.contains("500")));
    }

    #[tokio::test]
    async fn test_blocked_prompt_is_unavailable() {
        let base = serve_once("200 OK", r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#).await;

        let err = client(&base, Duration::from_secs(5))
            .complete("prompt")
            .await
            .unwrap_err();
        assert!(matches!(err, ModelError::Unavailable(msg) if msg.contains("SAFETY")));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_unavailable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(&format!("http://{}", addr), Duration::from_secs(5))
            .complete("prompt")
            .await
            .unwrap_err();
        assert!(matches!(err, ModelError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_silent_endpoint_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(10)).await;
        });

        let err = client(&format!("http://{}", addr), Duration::from_millis(200))
            .complete("prompt")
            .await
            .unwrap_err();
        assert!(matches!(err, ModelError::Timeout(d) if d == Duration::from_millis(200)));
    }
}
