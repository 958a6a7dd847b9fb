/// LLM Client — the single point of entry for all model calls in the matcher.
///
/// ARCHITECTURAL RULE: No other module may call the LLM provider directly.
/// All LLM interactions MUST go through this module.
///
/// `complete` never fails in the type system: every failure comes back as a
/// sentinel string starting with `FAILURE_MARKER`. Callers that need structure
/// use `complete_as_json`, which turns sentinels into an `ErrorRecord`.
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, warn};

pub mod json;
pub mod prompts;
pub mod transport;

pub use json::{extract_json, ErrorRecord, JsonReply, Structured};
pub use transport::{ChatRequest, ChatTransport, OpenRouterTransport};

use transport::{ChatResponse, ProviderError};

/// Prefix of every failure string returned by `complete`.
pub const FAILURE_MARKER: &str = "❌";
/// Prefix of degraded-service notices. Also treated as a failure by JSON callers.
pub const WARNING_MARKER: &str = "⚠️";

pub const DEFAULT_MODEL: &str = "mistralai/mistral-small-3.2-24b-instruct:free";
pub const DEFAULT_MAX_RETRIES: u32 = 3;

pub const DAILY_LIMIT_GUIDANCE: &str = "❌ **Daily API Limit Reached** ❌\n\n\
You are using the shared free-tier API key, which has a daily usage limit.\n\n\
**To fix this, please:**\n\
1. Get your own free API key from [openrouter.ai](https://openrouter.ai/keys)\n\
2. Add it to the `.env` file in your project as `OPENROUTER_API_KEY=your_key_here`";

/// True for sentinel strings produced by this module or the fallback layer.
pub fn is_failure(text: &str) -> bool {
    let text = text.trim_start();
    text.starts_with(FAILURE_MARKER) || text.starts_with(WARNING_MARKER)
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Request failed after {attempts} attempts: {message}")]
    Transport { attempts: u32, message: String },

    #[error("{provider} error: {status} - {body}")]
    Api {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("daily API limit reached")]
    QuotaExceeded,

    #[error("Unexpected response structure: {0}")]
    MalformedResponse(String),

    #[error("Max retries ({0}) exceeded")]
    RetriesExhausted(u32),
}

impl LlmError {
    fn into_sentinel(self) -> String {
        match self {
            LlmError::QuotaExceeded => DAILY_LIMIT_GUIDANCE.to_string(),
            other => format!("{FAILURE_MARKER} {other}"),
        }
    }
}

/// Exponential backoff with additive jitter: `base * 2^attempt + U[0,1) * jitter`.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub jitter: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::from_secs(1),
            jitter: Duration::from_secs(1),
        }
    }

    /// No sleeping between attempts. For tests and batch tooling.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::ZERO,
            jitter: Duration::ZERO,
        }
    }

    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponential = self.base_delay.saturating_mul(2u32.saturating_pow(attempt));
        let jitter = self.jitter.mul_f64(rand::thread_rng().gen::<f64>());
        exponential + jitter
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETRIES)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    system_role: String,
    prompt: String,
    provider: String,
    max_tokens: u32,
}

/// The single LLM client shared by every service. Cheap to clone; clones share
/// the response cache.
#[derive(Clone)]
pub struct LlmClient {
    transport: Arc<dyn ChatTransport>,
    model: String,
    retry: RetryPolicy,
    cache: Arc<RwLock<HashMap<CacheKey, String>>>,
}

impl LlmClient {
    pub fn new(transport: Arc<dyn ChatTransport>, model: impl Into<String>, retry: RetryPolicy) -> Self {
        Self {
            transport,
            model: model.into(),
            retry,
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// One chat completion. Identical successful requests are served from the cache.
    pub async fn complete(&self, system_role: &str, prompt: &str, max_tokens: u32) -> String {
        let key = CacheKey {
            system_role: system_role.to_string(),
            prompt: prompt.to_string(),
            provider: self.transport.provider().to_string(),
            max_tokens,
        };

        if let Some(cached) = self.cache.read().await.get(&key) {
            debug!("LLM cache hit ({} chars)", cached.len());
            return cached.clone();
        }

        match self.try_complete(system_role, prompt, max_tokens).await {
            Ok(text) => {
                self.cache.write().await.insert(key, text.clone());
                text
            }
            Err(e) => {
                warn!("LLM call failed: {e}");
                e.into_sentinel()
            }
        }
    }

    /// Like `complete`, but asks for JSON and parses the reply.
    pub async fn complete_as_json(&self, system_role: &str, prompt: &str, max_tokens: u32) -> JsonReply {
        let prompt = format!("{prompt}{}", prompts::JSON_ONLY_SUFFIX);
        let text = self.complete(system_role, &prompt, max_tokens).await;
        if is_failure(&text) {
            return Err(ErrorRecord::call_failed(&text));
        }
        let reply = extract_json(&text);
        if let Err(record) = &reply {
            warn!(
                "Structured reply unusable: {} ({})",
                record.error,
                record.parsing_error.as_deref().unwrap_or("no detail")
            );
        }
        reply
    }

    /// The retry loop. Transport errors, 5xx and generic 429s are retried; a 429
    /// naming a rate limit is the provider's daily quota and ends the loop.
    async fn try_complete(&self, system_role: &str, prompt: &str, max_tokens: u32) -> Result<String, LlmError> {
        let request = ChatRequest::new(&self.model, system_role, prompt, max_tokens);
        let provider = self.transport.provider().to_string();
        let max_attempts = self.retry.max_attempts;
        let mut last_error: Option<LlmError> = None;

        for attempt in 0..max_attempts {
            match self.transport.post(&request).await {
                Ok(reply) if reply.is_success() => return parse_completion(&reply.body),
                Ok(reply) if reply.status == 429 => {
                    if is_daily_quota(&reply.body) {
                        warn!("LLM provider reports daily quota exhausted, not retrying");
                        return Err(LlmError::QuotaExceeded);
                    }
                    last_error = Some(LlmError::Api {
                        provider: provider.clone(),
                        status: reply.status,
                        body: reply.body,
                    });
                }
                Ok(reply) if reply.status >= 500 => {
                    last_error = Some(LlmError::Api {
                        provider: provider.clone(),
                        status: reply.status,
                        body: reply.body,
                    });
                }
                Ok(reply) => {
                    return Err(LlmError::Api {
                        provider,
                        status: reply.status,
                        body: reply.body,
                    });
                }
                Err(e) => {
                    last_error = Some(LlmError::Transport {
                        attempts: attempt + 1,
                        message: e.to_string(),
                    });
                }
            }

            if attempt + 1 < max_attempts {
                let delay = self.retry.delay_for(attempt);
                warn!(
                    "LLM call attempt {}/{} failed, retrying after {}ms...",
                    attempt + 1,
                    max_attempts,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error.unwrap_or(LlmError::RetriesExhausted(max_attempts)))
    }
}

fn parse_completion(body: &str) -> Result<String, LlmError> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| LlmError::MalformedResponse(format!("{e} | Raw: {body}")))?;
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| LlmError::MalformedResponse(body.to_string()))
}

fn is_daily_quota(body: &str) -> bool {
    serde_json::from_str::<ProviderError>(body)
        .map(|e| e.error.message.to_lowercase().contains("rate limit"))
        .unwrap_or(false)
}
