//! OpenAI-compatible chat-completions client.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{MemoError, MemoPrompt, TextGenerator};
use crate::config::MemoConfig;

pub struct OpenAiTextGenerator {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl std::fmt::Debug for OpenAiTextGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiTextGenerator")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl OpenAiTextGenerator {
    pub fn from_config(config: &MemoConfig) -> Result<Self, MemoError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or(MemoError::MissingCredentials)?;

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| MemoError::Transport(err.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_body<'a>(&'a self, prompt: &'a MemoPrompt) -> ChatRequest<'a> {
        chat_request(&self.model, self.temperature, self.max_tokens, prompt)
    }
}

#[async_trait]
impl TextGenerator for OpenAiTextGenerator {
    async fn generate(&self, prompt: &MemoPrompt) -> Result<String, MemoError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(|err| MemoError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MemoError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|err| MemoError::Decode(err.to_string()))?;

        completion_text(completion)
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

pub(crate) fn chat_request<'a>(
    model: &'a str,
    temperature: f32,
    max_tokens: u32,
    prompt: &'a MemoPrompt,
) -> ChatRequest<'a> {
    ChatRequest {
        model,
        messages: [
            ChatMessage {
                role: "system",
                content: &prompt.system,
            },
            ChatMessage {
                role: "user",
                content: &prompt.user,
            },
        ],
        temperature,
        max_tokens,
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletion {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// First choice's content, untouched. Blank content counts as empty.
pub(crate) fn completion_text(completion: ChatCompletion) -> Result<String, MemoError> {
    completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or(MemoError::EmptyResponse)
}
