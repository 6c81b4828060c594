use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::advisor::generator::ChatMessage;
use crate::advisor::Advisor;
use crate::scoring::{VendorResult, WeightState};

pub const GREETING: &str =
    "Hello! I can help you analyze your vendor selection matrix. What questions do you have?";

/// One assistant conversation. Messages are kept in submission order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub messages: Vec<ChatMessage>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            messages: vec![ChatMessage::model(GREETING)],
        }
    }

    /// Record the user's message, ask the advisor, record and return the reply.
    /// Blank input is ignored and returns None.
    pub fn send(
        &mut self,
        advisor: &Advisor<'_>,
        message: &str,
        weights: &WeightState,
        results: &[VendorResult],
    ) -> Option<&ChatMessage> {
        let message = message.trim();
        if message.is_empty() {
            return None;
        }
        let history = self.messages.clone();
        self.messages.push(ChatMessage::user(message));
        let reply = advisor.chat_reply(&history, message, weights, results);
        self.messages.push(ChatMessage::model(reply));
        self.messages.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::generator::{ChatRole, Prompt, ServiceError, TextGenerator};
    use crate::advisor::CHAT_FAILED;

    struct Echo;

    impl TextGenerator for Echo {
        fn generate(&self, prompt: &Prompt) -> Result<String, ServiceError> {
            Ok(format!("{} after {} turns", prompt.text, prompt.history.len()))
        }
    }

    struct Down;

    impl TextGenerator for Down {
        fn generate(&self, _prompt: &Prompt) -> Result<String, ServiceError> {
            Err(ServiceError::Transport("offline".to_string()))
        }
    }

    #[test]
    fn session_starts_with_greeting_and_appends_in_order() {
        let mut session = ChatSession::new();
        let advisor_gen = Echo;
        let advisor = Advisor::new(&advisor_gen);
        let weights = WeightState::new();

        let reply = session
            .send(&advisor, " which CRM? ", &weights, &[])
            .expect("reply")
            .text
            .clone();
        assert_eq!(reply, "which CRM? after 1 turns");
        session.send(&advisor, "thanks", &weights, &[]);

        let roles: Vec<_> = session.messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![
                ChatRole::Model,
                ChatRole::User,
                ChatRole::Model,
                ChatRole::User,
                ChatRole::Model
            ]
        );
        assert_eq!(session.messages[4].text, "thanks after 3 turns");
    }

    #[test]
    fn blank_message_is_ignored_and_failure_still_answers() {
        let mut session = ChatSession::new();
        let down = Down;
        let advisor = Advisor::new(&down);
        assert!(session.send(&advisor, "   ", &WeightState::new(), &[]).is_none());
        assert_eq!(session.messages.len(), 1);

        let reply = session
            .send(&advisor, "hello", &WeightState::new(), &[])
            .expect("reply");
        assert_eq!(reply.text, CHAT_FAILED);
    }
}
