use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{HTTP, Provider};
use crate::error::ProviderFailure;

const NAME: &str = "gemini";
const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Google Gemini `generateContent` backend.
///
/// Unlike the OpenAI-compatible backends, Gemini authenticates with a `key`
/// query parameter and wraps the prompt in a `contents`/`parts` envelope. It
/// can also report errors inside a 200 body, which is surfaced as an upstream
/// failure.
pub struct GeminiProvider {
    api_key: Option<String>,
    model: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    error: Option<ApiError>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<TextPart>,
}

#[derive(Deserialize)]
struct TextPart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

impl GeminiProvider {
    pub fn new(api_key: Option<String>, model: String) -> Self {
        Self { api_key, model }
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    fn name(&self) -> &str {
        NAME
    }

    async fn complete(&self, prompt: &str) -> Result<String, ProviderFailure> {
        let Some(key) = &self.api_key else {
            return Err(ProviderFailure::missing_credential(NAME));
        };

        let url = format!("{BASE_URL}/{}:generateContent", self.model);
        let response = HTTP
            .post(&url)
            .query(&[("key", key.as_str())])
            .json(&GenerateRequest {
                contents: [Content {
                    parts: [Part { text: prompt }],
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

/// Pulls the first candidate's text out of a raw response body.
pub(crate) fn extract_text(body: &str) -> Result<String, ProviderFailure> {
    let parsed: GenerateResponse =
        serde_json::from_str(body).map_err(|err| ProviderFailure::malformed(NAME, err.to_string()))?;

    // Gemini reports quota and auth problems inside a 200 body.
    if let Some(error) = parsed.error {
        return Err(ProviderFailure::upstream(NAME, error.message));
    }

    let text = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().next())
        .and_then(|part| part.text);

    match text {
        Some(text) => Ok(text),
        None => Err(ProviderFailure::malformed(
            NAME,
            "no candidate text in response",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;

    #[test]
    fn test_extract_text_happy_path() {
        let body = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "مرحباً بك"}]}}
            ]
        }"#;
        assert_eq!(extract_text(body).unwrap(), "مرحباً بك");
    }

    #[test]
    fn test_extract_text_embedded_error_is_upstream() {
        let body = r#"{"error": {"code": 429, "message": "Resource exhausted"}}"#;
        let failure = extract_text(body).unwrap_err();
        assert!(matches!(failure.kind, FailureKind::Upstream(ref msg) if msg == "Resource exhausted"));
    }

    #[test]
    fn test_extract_text_missing_candidates_is_malformed() {
        let failure = extract_text(r#"{"candidates": []}"#).unwrap_err();
        assert!(matches!(failure.kind, FailureKind::MalformedResponse(_)));
    }

    #[test]
    fn test_extract_text_non_json_is_malformed() {
        let failure = extract_text("<html>quota page</html>").unwrap_err();
        assert!(matches!(failure.kind, FailureKind::MalformedResponse(_)));
        assert_eq!(failure.provider, "gemini");
    }
}
