use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{
    DEFAULT_GEMINI_BASE_URL, DEFAULT_GENERATION_MODEL, EMPTY_PROMPT_FALLBACK,
    GEMINI_API_KEY_VAR, GEMINI_BASE_URL_VAR, GEMINI_MODEL_VAR, GENERATION_MAX_OUTPUT_TOKENS,
    GENERATION_TEMPERATURE, GENERATION_TIMEOUT_SECS, GENERATION_TOP_K, GENERATION_TOP_P,
};
use crate::error::GenerationError;

/// The pluggable generation seam.
///
/// One logical component with the hosted provider behind it; tests plug in
/// echo or failing implementations through the same trait.
pub trait AnswerGenerator {
    /// Send a fully assembled prompt to the model and return its text,
    /// trimmed of surrounding whitespace.
    fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f64,
    top_p: f64,
    top_k: u32,
}

impl GenerationConfig {
    /// Fixed sampling parameters: bounded output, low randomness, nucleus
    /// and top-k bounds, so answers stay grounded and reproducible-style.
    const fn fixed() -> Self {
        Self {
            max_output_tokens: GENERATION_MAX_OUTPUT_TOKENS,
            temperature: GENERATION_TEMPERATURE,
            top_p: GENERATION_TOP_P,
            top_k: GENERATION_TOP_K,
        }
    }
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// Blocking client for the Gemini `generateContent` endpoint.
#[derive(Debug)]
pub struct GeminiClient {
    http: reqwest::blocking::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
    /// Build a client from `GEMINI_API_KEY`, `GEMINI_MODEL`, and
    /// `GEMINI_BASE_URL`. A missing or blank credential is a configuration
    /// error, never a silent empty answer.
    pub fn from_env() -> Result<Self, GenerationError> {
        Self::from_config(
            std::env::var(GEMINI_API_KEY_VAR).ok(),
            std::env::var(GEMINI_MODEL_VAR).ok(),
            std::env::var(GEMINI_BASE_URL_VAR).ok(),
        )
    }

    /// Build a client from explicit configuration values; `None` falls back
    /// to the defaults (and to `MissingApiKey` for the credential).
    pub fn from_config(
        api_key: Option<String>,
        model: Option<String>,
        base_url: Option<String>,
    ) -> Result<Self, GenerationError> {
        let api_key = api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or(GenerationError::MissingApiKey)?;

        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(GENERATION_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            model: model.unwrap_or_else(|| DEFAULT_GENERATION_MODEL.to_string()),
        })
    }

    /// The configured model identifier.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl AnswerGenerator for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        if prompt.trim().is_empty() {
            return Ok(EMPTY_PROMPT_FALLBACK.to_string());
        }

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );
        let body = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig::fixed(),
        };

        debug!(
            model = %self.model,
            prompt_chars = prompt.chars().count(),
            "calling generation API"
        );

        let response = self.http.post(&url).json(&body).send()?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let payload = response.text()?;
        parse_response(&payload)
    }
}

/// Extract the first candidate's text from a `generateContent` body.
fn parse_response(payload: &str) -> Result<String, GenerationError> {
    let parsed: GenerateResponse = serde_json::from_str(payload)
        .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;

    let candidate = parsed
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| GenerationError::MalformedResponse("no candidates".to_string()))?;

    let text = candidate
        .content
        .parts
        .into_iter()
        .map(|part| part.text)
        .collect::<Vec<_>>()
        .join("");

    if text.trim().is_empty() {
        return Err(GenerationError::MalformedResponse(
            "candidate contained no text".to_string(),
        ));
    }

    Ok(text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> GeminiClient {
        GeminiClient::from_config(
            Some("test-key".to_string()),
            None,
            // Closed port: any attempt to actually call the API fails fast.
            Some("http://127.0.0.1:1".to_string()),
        )
        .unwrap()
    }

    #[test]
    fn missing_api_key_is_a_config_error() {
        let err = GeminiClient::from_config(None, None, None).unwrap_err();
        assert!(matches!(err, GenerationError::MissingApiKey));
    }

    #[test]
    fn blank_api_key_is_a_config_error() {
        let err = GeminiClient::from_config(Some("   ".to_string()), None, None).unwrap_err();
        assert!(matches!(err, GenerationError::MissingApiKey));
    }

    #[test]
    fn defaults_apply_when_unconfigured() {
        let client =
            GeminiClient::from_config(Some("test-key".to_string()), None, None).unwrap();
        assert_eq!(client.model(), DEFAULT_GENERATION_MODEL);
        assert_eq!(client.base_url, DEFAULT_GEMINI_BASE_URL);
    }

    #[test]
    fn empty_prompt_returns_fallback_without_calling_the_model() {
        // The base URL is unreachable, so any network attempt would error.
        let client = test_client();
        let response = client.generate("   \n  ").unwrap();
        assert_eq!(response, EMPTY_PROMPT_FALLBACK);
    }

    #[test]
    fn unreachable_endpoint_surfaces_as_http_error() {
        let client = test_client();
        let err = client.generate("a real prompt").unwrap_err();
        assert!(matches!(err, GenerationError::Http(_)));
    }

    #[test]
    fn request_body_uses_the_wire_field_names() {
        let body = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: "hello" }],
            }],
            generation_config: GenerationConfig::fixed(),
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 600);
        assert_eq!(value["generationConfig"]["topP"], 0.8);
        assert_eq!(value["generationConfig"]["topK"], 40);
        assert_eq!(value["generationConfig"]["temperature"], 0.3);
    }

    #[test]
    fn parse_response_joins_parts_and_trims() {
        let payload = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "  Section 66E "}, {"text": "applies.  "}]}}
            ]
        }"#;
        let text = parse_response(payload).unwrap();
        assert_eq!(text, "Section 66E applies.");
    }

    #[test]
    fn parse_response_rejects_missing_candidates() {
        let err = parse_response(r#"{"candidates": []}"#).unwrap_err();
        assert!(matches!(err, GenerationError::MalformedResponse(_)));
    }

    #[test]
    fn parse_response_rejects_invalid_json() {
        let err = parse_response("not json").unwrap_err();
        assert!(matches!(err, GenerationError::MalformedResponse(_)));
    }

    #[test]
    fn parse_response_rejects_empty_text() {
        let payload = r#"{"candidates": [{"content": {"parts": [{"text": "  "}]}}]}"#;
        let err = parse_response(payload).unwrap_err();
        assert!(matches!(err, GenerationError::MalformedResponse(_)));
    }
}
