//! LLM client adapters: `LlmAClient` (Gemini-shaped request/response) and
//! `LlmBClient` (an OpenAI-compatible chat-completion body, as Nebius
//! exposes). Both wrap a single `reqwest` POST behind the uniform
//! [`LlmClient`] port, enforcing the per-call timeout the orchestrator
//! relies on.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use mcb_domain::constants::DEFAULT_LLM_TIMEOUT_SECS;
use mcb_domain::error::{Error, Result};
use mcb_domain::ports::LlmClient;

/// The system preamble the original Nebius integration sends ahead of every
/// user prompt; carried over verbatim since callers' prompts assume it.
const NEBIUS_SYSTEM_PROMPT: &str =
    "You are a world-class expert code analysis AI. Follow the user's instructions carefully and provide your response in the requested format.";

fn call_timeout() -> Duration {
    Duration::from_secs(DEFAULT_LLM_TIMEOUT_SECS)
}

/// [`LlmClient`] backed by Google's Gemini `generateContent` REST endpoint.
pub struct LlmAClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl LlmAClient {
    const DEFAULT_MODEL: &'static str = "gemini-2.5-flash";
    const API_BASE: &'static str = "https://generativelanguage.googleapis.com/v1beta/models";

    /// Construct a client for `LLM_A_API_KEY`.
    #[must_use]
    pub fn new(api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            model: Self::DEFAULT_MODEL.to_owned(),
        }
    }
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent2,
}

#[derive(Debug, Deserialize)]
struct GeminiContent2 {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[async_trait]
impl LlmClient for LlmAClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/{}:generateContent?key={}", Self::API_BASE, self.model, self.api_key);
        let body = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt.to_owned() }],
            }],
        };

        let response = tokio::time::timeout(call_timeout(), self.http.post(&url).json(&body).send())
            .await
            .map_err(|_| Error::llm_failure("llm_a request timed out"))?
            .map_err(|e| Error::llm_failure_with_source("llm_a request failed", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::llm_failure(format!("llm_a returned {status}: {detail}")));
        }

        let parsed: GeminiResponse = response
            .json()
            .await
            .map_err(|e| Error::llm_failure_with_source("malformed llm_a response", e))?;

        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .unwrap_or_default();

        Ok(text)
    }

    fn label(&self) -> &'static str {
        "llm_a"
    }
}

/// [`LlmClient`] backed by Nebius's OpenAI-compatible chat completions API.
pub struct LlmBClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl LlmBClient {
    const DEFAULT_MODEL: &'static str = "openai/gpt-oss-120b";
    const API_URL: &'static str = "https://api.studio.nebius.com/v1/chat/completions";

    /// Construct a client for `LLM_B_API_KEY`.
    #[must_use]
    pub fn new(api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            model: Self::DEFAULT_MODEL.to_owned(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: String,
}

#[async_trait]
impl LlmClient for LlmBClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: NEBIUS_SYSTEM_PROMPT.to_owned(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt.to_owned(),
                },
            ],
        };

        let response = tokio::time::timeout(
            call_timeout(),
            self.http
                .post(Self::API_URL)
                .bearer_auth(&self.api_key)
                .json(&body)
                .send(),
        )
        .await
        .map_err(|_| Error::llm_failure("llm_b request timed out"))?
        .map_err(|e| Error::llm_failure_with_source("llm_b request failed", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::llm_failure(format!("llm_b returned {status}: {detail}")));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::llm_failure_with_source("malformed llm_b response", e))?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();

        Ok(text)
    }

    fn label(&self) -> &'static str {
        "llm_b"
    }
}
