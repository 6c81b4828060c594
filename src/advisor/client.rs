use serde_json::{json, Value};

use crate::advisor::generator::{ChatRole, ModelTier, Prompt, ServiceError, TextGenerator};
use crate::config::AdvisorConfig;

/// Gemini `generateContent` over HTTPS. One blocking request per call, no retry.
#[derive(Clone, Debug)]
pub struct GeminiClient {
    endpoint: String,
    api_key: String,
    reasoning_model: String,
    fast_model: String,
}

impl GeminiClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        reasoning_model: impl Into<String>,
        fast_model: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            reasoning_model: reasoning_model.into(),
            fast_model: fast_model.into(),
        }
    }

    /// None when the config carries no API key.
    pub fn from_config(config: &AdvisorConfig) -> Option<Self> {
        let key = config.api_key.as_deref()?.trim();
        if key.is_empty() {
            return None;
        }
        Some(Self::new(
            config.endpoint.clone(),
            key,
            config.reasoning_model.clone(),
            config.fast_model.clone(),
        ))
    }

    fn model_for(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Reasoning => &self.reasoning_model,
            ModelTier::Fast => &self.fast_model,
        }
    }

    fn url_for(&self, tier: ModelTier) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model_for(tier)
        )
    }
}

/// Request body for `generateContent`: history turns followed by the prompt as a user turn.
pub fn request_body(prompt: &Prompt) -> Value {
    let mut contents: Vec<Value> = prompt
        .history
        .iter()
        .map(|message| {
            let role = match message.role {
                ChatRole::User => "user",
                ChatRole::Model => "model",
            };
            json!({ "role": role, "parts": [{ "text": message.text }] })
        })
        .collect();
    contents.push(json!({ "role": "user", "parts": [{ "text": prompt.text }] }));

    let mut body = json!({ "contents": contents });
    if let Some(instruction) = &prompt.system_instruction {
        body["systemInstruction"] = json!({ "parts": [{ "text": instruction }] });
    }
    body
}

/// Join the text parts of the first candidate.
pub fn extract_text(response: &Value) -> Result<String, ServiceError> {
    let parts = response
        .pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            ServiceError::MalformedResponse("missing candidates[0].content.parts".to_string())
        })?;
    let text: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();
    if text.trim().is_empty() {
        return Err(ServiceError::EmptyResponse);
    }
    Ok(text)
}

impl TextGenerator for GeminiClient {
    fn generate(&self, prompt: &Prompt) -> Result<String, ServiceError> {
        let url = self.url_for(prompt.tier);
        tracing::debug!(%url, tier = ?prompt.tier, "sending generateContent request");
        let response = ureq::post(&url)
            .query("key", &self.api_key)
            .send_json(request_body(prompt));

        let response = match response {
            Ok(response) => response,
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().unwrap_or_default();
                return Err(ServiceError::Status { status, body });
            }
            Err(err) => return Err(ServiceError::Transport(err.to_string())),
        };
        let text = response
            .into_string()
            .map_err(|e| ServiceError::Transport(format!("read response body failed: {e}")))?;
        let value: Value = serde_json::from_str(&text)
            .map_err(|e| ServiceError::MalformedResponse(format!("parse json failed: {e}")))?;
        extract_text(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::generator::ChatMessage;

    #[test]
    fn body_places_history_before_prompt_and_adds_system_instruction() {
        let prompt = Prompt::new(ModelTier::Fast, "and now?")
            .with_system("be brief")
            .with_history(vec![ChatMessage::model("hello"), ChatMessage::user("hi")]);
        let body = request_body(&prompt);
        let contents = body["contents"].as_array().expect("contents");
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0]["role"], "model");
        assert_eq!(contents[2]["parts"][0]["text"], "and now?");
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "be brief");
    }

    #[test]
    fn extract_text_joins_parts_and_rejects_blank() {
        let ok = json!({"candidates":[{"content":{"parts":[{"text":"a"},{"text":"b"}]}}]});
        assert_eq!(extract_text(&ok).expect("text"), "ab");

        let blank = json!({"candidates":[{"content":{"parts":[{"text":"  "}]}}]});
        assert!(matches!(extract_text(&blank), Err(ServiceError::EmptyResponse)));

        let missing = json!({"error": {"code": 429}});
        assert!(matches!(
            extract_text(&missing),
            Err(ServiceError::MalformedResponse(_))
        ));
    }

    #[test]
    fn url_uses_model_for_tier() {
        let client = GeminiClient::new("https://example.test/v1beta/", "k", "pro", "flash");
        assert_eq!(
            client.url_for(ModelTier::Reasoning),
            "https://example.test/v1beta/models/pro:generateContent"
        );
        assert_eq!(
            client.url_for(ModelTier::Fast),
            "https://example.test/v1beta/models/flash:generateContent"
        );
    }
}
