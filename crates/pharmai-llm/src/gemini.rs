//! Gemini REST client.
//!
//! Uses the blocking `reqwest` client. Build it outside any async context and
//! call it from a blocking thread (`tokio::task::spawn_blocking`).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::inference::{InferenceError, InferenceResult, Inferencer};

/// Default public endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Gemini `generateContent` client.
pub struct GeminiClient {
    base_url: String,
    model: String,
    api_key: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Create a client. `timeout_secs` bounds every request end to end.
    pub fn new(
        base_url: &str,
        model: &str,
        api_key: &str,
        timeout_secs: u64,
    ) -> InferenceResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| InferenceError::Http(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
            client,
            timeout_secs,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
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

impl GenerateResponse {
    /// Concatenated text of the first candidate.
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().map(|p| p.text).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

impl Inferencer for GeminiClient {
    fn infer(&self, prompt: &str, context: &str) -> InferenceResult<String> {
        let body = GenerateRequest {
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: prompt }],
            }],
            system_instruction: (!context.is_empty()).then(|| Content {
                role: None,
                parts: vec![Part { text: context }],
            }),
        };

        tracing::debug!(model = %self.model, prompt_chars = prompt.len(), "Gemini request");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    InferenceError::Connection(self.base_url.clone())
                } else if e.is_timeout() {
                    InferenceError::Timeout(self.timeout_secs)
                } else {
                    InferenceError::Http(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(InferenceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response.json().map_err(|e| {
            if e.is_timeout() {
                InferenceError::Timeout(self.timeout_secs)
            } else {
                InferenceError::JsonParse(e.to_string())
            }
        })?;

        parsed.into_text().ok_or(InferenceError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = GeminiClient::new("http://localhost:8080/", DEFAULT_MODEL, "k", 5).unwrap();
        assert_eq!(client.base_url, "http://localhost:8080");
        assert_eq!(
            client.endpoint(),
            "http://localhost:8080/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn test_debug_hides_api_key() {
        let client = GeminiClient::new(DEFAULT_BASE_URL, DEFAULT_MODEL, "secret-key", 5).unwrap();
        let printed = format!("{:?}", client);
        assert!(!printed.contains("secret-key"));
        assert!(printed.contains("gemini-1.5-flash"));
    }

    #[test]
    fn test_request_serialization() {
        let body = GenerateRequest {
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: "hi" }],
            }],
            system_instruction: None,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"contents":[{"role":"user","parts":[{"text":"hi"}]}]}"#);
    }

    #[test]
    fn test_response_text_extraction() {
        let raw = r#"{"candidates":[{"content":{"parts":[{"text":"{\"interaction\":"},{"text":"false}"}]}}]}"#;
        let parsed: GenerateResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.into_text().as_deref(), Some(r#"{"interaction":false}"#));
    }

    #[test]
    fn test_empty_response_has_no_text() {
        let parsed: GenerateResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(parsed.into_text().is_none());
    }

    #[test]
    fn test_unreachable_host_is_connection_error() {
        // Port 9 (discard) on localhost is not expected to accept connections.
        let client = GeminiClient::new("http://127.0.0.1:9", DEFAULT_MODEL, "k", 2).unwrap();
        let err = client.infer("prompt", "").unwrap_err();
        assert!(matches!(
            err,
            InferenceError::Connection(_) | InferenceError::Http(_) | InferenceError::Timeout(_)
        ));
    }
}
