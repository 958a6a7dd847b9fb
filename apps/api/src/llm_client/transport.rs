//! Wire layer under `LlmClient`: one POST of an OpenAI-compatible chat request.
//!
//! The transport knows nothing about retries, caching or sentinels. It reports
//! the raw status and body, or a transport-level failure.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
}

impl ChatRequest {
    pub fn new(model: &str, system_role: &str, prompt: &str, max_tokens: u32) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system_role.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            max_tokens,
        }
    }

    /// The user turn of the request.
    pub fn prompt(&self) -> &str {
        self.messages
            .iter()
            .find(|m| m.role == "user")
            .map(|m| m.content.as_str())
            .unwrap_or_default()
    }
}

/// Status and body of a completed HTTP exchange, successful or not.
#[derive(Debug, Clone)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProviderError {
    pub error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProviderErrorBody {
    #[serde(default)]
    pub message: String,
}

/// The request never produced an HTTP status (connect, timeout, body read).
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        TransportError(e.to_string())
    }
}

#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn post(&self, request: &ChatRequest) -> Result<HttpReply, TransportError>;

    /// Provider name, part of the response cache key.
    fn provider(&self) -> &str;
}

/// OpenRouter (or any OpenAI-compatible endpoint) over reqwest with bearer auth.
#[derive(Clone)]
pub struct OpenRouterTransport {
    client: Client,
    api_url: String,
    api_key: String,
}

impl OpenRouterTransport {
    pub fn new(api_key: String, api_url: String) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            api_url,
            api_key,
        })
    }
}

#[async_trait]
impl ChatTransport for OpenRouterTransport {
    async fn post(&self, request: &ChatRequest) -> Result<HttpReply, TransportError> {
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpReply { status, body })
    }

    fn provider(&self) -> &str {
        "openrouter"
    }
}

#[cfg(test)]
pub(crate) mod scripted {
    //! In-process transport for tests: replies come from a closure, calls are counted.

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;

    type Responder = Box<dyn Fn(&ChatRequest, usize) -> Result<HttpReply, TransportError> + Send + Sync>;

    pub struct ScriptedTransport {
        responder: Responder,
        calls: AtomicUsize,
        seen: Mutex<Vec<ChatRequest>>,
    }

    impl ScriptedTransport {
        /// `responder` receives the request and the zero-based call number.
        pub fn new(
            responder: impl Fn(&ChatRequest, usize) -> Result<HttpReply, TransportError> + Send + Sync + 'static,
        ) -> Self {
            Self {
                responder: Box::new(responder),
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
            }
        }

        /// Answers every request with `content` as a successful completion.
        pub fn replying(content: &str) -> Self {
            let content = content.to_string();
            Self::new(move |_, _| Ok(completion(&content)))
        }

        pub fn always(status: u16, body: &str) -> Self {
            let body = body.to_string();
            Self::new(move |_, _| {
                Ok(HttpReply {
                    status,
                    body: body.clone(),
                })
            })
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn prompts(&self) -> Vec<String> {
            self.seen
                .lock()
                .unwrap()
                .iter()
                .map(|r| r.prompt().to_string())
                .collect()
        }
    }

    /// A 200 reply carrying `content` in the OpenAI response shape.
    pub fn completion(content: &str) -> HttpReply {
        HttpReply {
            status: 200,
            body: serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": content}}]
            })
            .to_string(),
        }
    }

    #[async_trait]
    impl ChatTransport for ScriptedTransport {
        async fn post(&self, request: &ChatRequest) -> Result<HttpReply, TransportError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(request.clone());
            (self.responder)(request, n)
        }

        fn provider(&self) -> &str {
            "scripted"
        }
    }
}
