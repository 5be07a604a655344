use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{HTTP, Provider};
use crate::error::ProviderFailure;

const NAME: &str = "mistral";
const ENDPOINT: &str = "https://api.mistral.ai/v1/chat/completions";

/// Mistral chat-completions backend. Same OpenAI-compatible wire format as
/// Groq, different host and model family.
pub struct MistralProvider {
    api_key: Option<String>,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<Message>,
}

#[derive(Deserialize)]
struct Message {
    content: Option<String>,
}

impl MistralProvider {
    pub fn new(api_key: Option<String>, model: String) -> Self {
        Self { api_key, model }
    }
}

#[async_trait]
impl Provider for MistralProvider {
    fn name(&self) -> &str {
        NAME
    }

    async fn complete(&self, prompt: &str) -> Result<String, ProviderFailure> {
        let Some(key) = &self.api_key else {
            return Err(ProviderFailure::missing_credential(NAME));
        };

        let response = HTTP
            .post(ENDPOINT)
            .bearer_auth(key)
            .json(&ChatRequest {
                model: &self.model,
                messages: [ChatMessage {
                    role: "user",
                    content: prompt,
                }],
            })
            .send()
            .await
            .map_err(|err| ProviderFailure::transport(NAME, err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| ProviderFailure::transport(NAME, err.to_string()))?;

        if !status.is_success() {
            return Err(ProviderFailure::upstream(
                NAME,
                format!("HTTP {status}: {body}"),
            ));
        }

        extract_text(&body)
    }
}

/// Pulls the first choice's message content out of a raw response body.
pub(crate) fn extract_text(body: &str) -> Result<String, ProviderFailure> {
    let parsed: ChatResponse =
        serde_json::from_str(body).map_err(|err| ProviderFailure::malformed(NAME, err.to_string()))?;

    let content = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content);

    match content {
        Some(content) => Ok(content),
        None => Err(ProviderFailure::malformed(
            NAME,
            "no choice content in response",
        )),
    }
}
