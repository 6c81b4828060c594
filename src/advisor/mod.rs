//! AI advisory text. Every call is a single remote generation; failures and empty replies are
//! logged and replaced by a fixed user-facing string, so callers always get prose back.

pub mod chat;
pub mod client;
pub mod generator;
pub mod prompts;

pub use chat::ChatSession;
pub use client::GeminiClient;
pub use generator::{
    ChatMessage, ChatRole, ModelTier, Prompt, ServiceError, TextGenerator, UnconfiguredGenerator,
};

use crate::scoring::{VendorResult, WeightState};

pub const ANALYSIS_EMPTY: &str = "Analysis could not be generated at this time.";
pub const ANALYSIS_FAILED: &str =
    "Unable to connect to the Consultant AI. Please verify your API Key.";
pub const COMPARISON_EMPTY: &str = "Comparison unavailable.";
pub const COMPARISON_FAILED: &str = "AI comparison unavailable.";
pub const INSIGHT_UNAVAILABLE: &str = "Insight unavailable.";
pub const CHAT_EMPTY: &str = "I didn't catch that.";
pub const CHAT_FAILED: &str = "Sorry, I'm having trouble connecting right now.";

/// Advisory operations over an injected [TextGenerator].
pub struct Advisor<'a> {
    generator: &'a dyn TextGenerator,
}

impl<'a> Advisor<'a> {
    pub fn new(generator: &'a dyn TextGenerator) -> Self {
        Self { generator }
    }

    fn generate_or(
        &self,
        operation: &'static str,
        prompt: &Prompt,
        empty: &str,
        failed: &str,
    ) -> String {
        match self.generator.generate(prompt) {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) | Err(ServiceError::EmptyResponse) => {
                tracing::warn!(operation, "text generation returned no text");
                empty.to_string()
            }
            Err(err) => {
                tracing::error!(operation, %err, "text generation failed");
                failed.to_string()
            }
        }
    }

    /// Executive summary of why `winner` leads under the current weights.
    pub fn analyze_selection(
        &self,
        winner: &VendorResult,
        weights: &WeightState,
        results: &[VendorResult],
    ) -> String {
        let prompt = Prompt::new(
            ModelTier::Reasoning,
            prompts::selection_analysis_prompt(winner, weights, results),
        );
        self.generate_or("analyze_selection", &prompt, ANALYSIS_EMPTY, ANALYSIS_FAILED)
    }

    pub fn compare_vendors(
        &self,
        target: &VendorResult,
        winner: &VendorResult,
        weights: &WeightState,
    ) -> String {
        let prompt = Prompt::new(
            ModelTier::Fast,
            prompts::comparison_prompt(target, winner, weights),
        );
        self.generate_or("compare_vendors", &prompt, COMPARISON_EMPTY, COMPARISON_FAILED)
    }

    pub fn vendor_insight(&self, vendor: &VendorResult, weights: &WeightState) -> String {
        let prompt = Prompt::new(ModelTier::Fast, prompts::vendor_insight_prompt(vendor, weights));
        self.generate_or(
            "vendor_insight",
            &prompt,
            INSIGHT_UNAVAILABLE,
            INSIGHT_UNAVAILABLE,
        )
    }

    /// Reply to `message` given prior `history` (which must not already contain `message`).
    pub fn chat_reply(
        &self,
        history: &[ChatMessage],
        message: &str,
        weights: &WeightState,
        results: &[VendorResult],
    ) -> String {
        let prompt = Prompt::new(ModelTier::Fast, message)
            .with_system(prompts::chat_system_instruction(weights, results))
            .with_history(history.to_vec());
        self.generate_or("chat_reply", &prompt, CHAT_EMPTY, CHAT_FAILED)
    }
}
