use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("no API key configured for the text-generation service")]
    MissingApiKey,
    #[error("request to text-generation service failed: {0}")]
    Transport(String),
    #[error("text-generation service returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed response from text-generation service: {0}")]
    MalformedResponse(String),
    #[error("text-generation service returned no text")]
    EmptyResponse,
}

/// Which configured model a prompt should go to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelTier {
    /// Longer strategic analysis.
    Reasoning,
    /// Quick comparisons, insights and chat.
    Fast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub tier: ModelTier,
    pub system_instruction: Option<String>,
    pub history: Vec<ChatMessage>,
    pub text: String,
}

impl Prompt {
    pub fn new(tier: ModelTier, text: impl Into<String>) -> Self {
        Self {
            tier,
            system_instruction: None,
            history: Vec::new(),
            text: text.into(),
        }
    }

    pub fn with_system(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    pub fn with_history(mut self, history: Vec<ChatMessage>) -> Self {
        self.history = history;
        self
    }
}

/// Remote prose generation. Implementations make one attempt per call.
pub trait TextGenerator: Send + Sync {
    fn generate(&self, prompt: &Prompt) -> Result<String, ServiceError>;
}

/// Used when no API key is configured; every call fails with [ServiceError::MissingApiKey].
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredGenerator;

impl TextGenerator for UnconfiguredGenerator {
    fn generate(&self, _prompt: &Prompt) -> Result<String, ServiceError> {
        Err(ServiceError::MissingApiKey)
    }
}
