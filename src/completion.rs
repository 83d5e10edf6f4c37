//! Text-completion client: the chat handler's external collaborator.
//!
//! The core contract is deliberately narrow: a prompt string goes in, a
//! completion string comes out, or the call fails. Retries, timeouts, and
//! authentication all belong to the service client, not to the dispatch
//! graph. The client is an explicit dependency injected into the chat node
//! at construction; there is no process-global client.
//!
//! [`OllamaClient`] talks to a local Ollama server over its generate API.
//! [`FixedCompletion`] is an offline double for tests and demos.

use async_trait::async_trait;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A text-completion service: prompt in, completion out.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Request a completion for the given prompt.
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
}

/// Failure modes of a completion call.
///
/// All of these are the collaborator's concern; the dispatch core only
/// propagates them.
#[derive(Debug, Error, Diagnostic)]
pub enum CompletionError {
    /// The request never produced an HTTP response.
    #[error("completion transport error: {0}")]
    #[diagnostic(code(mathchat::completion::transport))]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("completion service returned status {status}: {body}")]
    #[diagnostic(code(mathchat::completion::status))]
    Status { status: u16, body: String },
}

/// Client for the Ollama generate API.
///
/// # Configuration
///
/// [`OllamaClient::from_env`] loads a `.env` file if present and reads:
/// - `OLLAMA_BASE_URL` (default `http://localhost:11434`)
/// - `OLLAMA_MODEL` (default `gemma3:270m`)
///
/// # Examples
///
/// ```no_run
/// use mathchat::completion::{CompletionClient, OllamaClient};
///
/// # async fn example() -> Result<(), mathchat::completion::CompletionError> {
/// let client = OllamaClient::from_env();
/// let reply = client.complete("Why is the sky blue?").await?;
/// println!("{reply}");
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
}

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "gemma3:270m";

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaClient {
    /// Create a client for an explicit endpoint and model.
    #[must_use]
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    /// Create a client from environment configuration.
    #[must_use]
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let base_url =
            std::env::var("OLLAMA_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model = std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Self::new(base_url, model)
    }

    /// Override the model name.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// The model this client will request completions from.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionClient for OllamaClient {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let url = format!("{}/api/generate", self.base_url.trim_end_matches('/'));
        tracing::debug!(model = %self.model, %url, "requesting completion");

        let response = self
            .http
            .post(&url)
            .json(&GenerateRequest {
                model: &self.model,
                prompt,
                stream: false,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        tracing::debug!(chars = parsed.response.len(), "completion received");
        Ok(parsed.response)
    }
}

/// Completion double that always answers with the same text.
///
/// Useful in tests and offline demos where the chat branch must produce a
/// known value.
#[derive(Clone, Debug)]
pub struct FixedCompletion {
    reply: String,
}

impl FixedCompletion {
    #[must_use]
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

#[async_trait]
impl CompletionClient for FixedCompletion {
    async fn complete(&self, _prompt: &str) -> Result<String, CompletionError> {
        Ok(self.reply.clone())
    }
}
