use anyhow::{bail, Context, Result};
use reqwest::blocking::Client as HttpClient;
use serde_json::{json, Value};

use crate::config::StudioConfig;

/// A text model that turns a prompt into raw response text.
pub trait CopyGenerator: Send + Sync {
    fn name(&self) -> &str;
    fn generate(&self, prompt: &str) -> Result<String>;
}

/// Gemini `generateContent` over the REST API.
///
/// One request per call; failures are returned as-is for the caller to
/// degrade.
pub struct GeminiClient {
    api_base: String,
    api_key:  Option<String>,
    model:    String,
    http:     HttpClient,
}

impl GeminiClient {
    pub fn new(api_base: impl Into<String>, api_key: Option<String>, model: impl Into<String>) -> Self {
        GeminiClient {
            api_base: api_base.into(),
            api_key,
            model: model.into(),
            http: HttpClient::new(),
        }
    }

    pub fn from_config(config: &StudioConfig) -> Self {
        Self::new(
            config.gemini_api_base.clone(),
            config.gemini_api_key.clone(),
            config.gemini_model.clone(),
        )
    }

    fn endpoint(&self) -> String {
        let trimmed = self.model.trim();
        let model_path = if trimmed.starts_with("models/") {
            trimmed.to_owned()
        } else {
            format!("models/{trimmed}")
        };
        format!("{}/{}:generateContent", self.api_base, model_path)
    }
}

impl CopyGenerator for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    fn generate(&self, prompt: &str) -> Result<String> {
        let Some(api_key) = self.api_key.as_deref() else {
            bail!("GEMINI_API_KEY not set");
        };
        let endpoint = self.endpoint();

        let response = self
            .http
            .post(&endpoint)
            .query(&[("key", api_key)])
            .json(&request_payload(prompt))
            .send()
            .with_context(|| format!("Gemini request failed ({})", self.model))?;

        let status = response.status();
        let body = response.text().context("Gemini response body read failed")?;
        if !status.is_success() {
            bail!("Gemini request failed ({}): {}", status.as_u16(), truncate(&body, 512));
        }

        let payload: Value =
            serde_json::from_str(&body).context("Gemini returned invalid JSON payload")?;
        extract_text(&payload)
    }
}

/// JSON body for a single-turn text request that asks for JSON output.
pub fn request_payload(prompt: &str) -> Value {
    json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": prompt }],
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
        },
    })
}

/// Concatenates the text parts of the first candidate.
pub fn extract_text(payload: &Value) -> Result<String> {
    let parts = payload
        .get("candidates")
        .and_then(Value::as_array)
        .and_then(|candidates| candidates.first())
        .and_then(|candidate| candidate.pointer("/content/parts"))
        .and_then(Value::as_array);

    let Some(parts) = parts else {
        let reason = payload
            .pointer("/promptFeedback/blockReason")
            .and_then(Value::as_str)
            .unwrap_or("no candidates");
        bail!("Gemini returned no text ({reason})");
    };

    let text: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();
    if text.trim().is_empty() {
        bail!("Gemini returned an empty candidate");
    }
    Ok(text)
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_owned();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn endpoint_accepts_bare_and_prefixed_models() {
        let bare = GeminiClient::new("https://example.test/v1beta", None, "gemini-2.5-flash");
        assert_eq!(
            bare.endpoint(),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
        let prefixed = GeminiClient::new("https://example.test/v1beta", None, "models/custom");
        assert_eq!(prefixed.endpoint(), "https://example.test/v1beta/models/custom:generateContent");
    }

    #[test]
    fn missing_key_fails_without_network() {
        let client = GeminiClient::from_config(&StudioConfig::default());
        let err = client.generate("hello").expect_err("no key configured");
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn payload_requests_json_output() {
        let payload = request_payload("describe this");
        assert_eq!(payload["contents"][0]["parts"][0]["text"], "describe this");
        assert_eq!(payload["generationConfig"]["responseMimeType"], "application/json");
    }

    #[test]
    fn extracts_and_joins_candidate_text() -> anyhow::Result<()> {
        let payload = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "[\"a\", " }, { "text": "\"b\"]" }] }
            }]
        });
        assert_eq!(extract_text(&payload)?, "[\"a\", \"b\"]");
        Ok(())
    }

    #[test]
    fn blocked_prompt_is_an_error() {
        let payload = json!({ "promptFeedback": { "blockReason": "SAFETY" } });
        let err = extract_text(&payload).expect_err("no candidates");
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn truncates_long_bodies() {
        assert_eq!(truncate("abcdef", 3), "abc…");
        assert_eq!(truncate("abc", 3), "abc");
    }
}
