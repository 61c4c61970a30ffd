use crate::error::StrategyError;
use crate::strategy::Strategy;
use async_trait::async_trait;
use chrono::{DateTime, Local};
use nio_providers::{ChatProvider, Message};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Who is talking to whom. Rendered into every chat system prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Persona {
    pub assistant_name: String,
    pub user_name: String,
}

impl Default for Persona {
    fn default() -> Self {
        Self {
            assistant_name: "Nio".to_string(),
            user_name: "User".to_string(),
        }
    }
}

impl Persona {
    pub fn system_prompt(&self) -> String {
        format!(
            "Hello, I am {user}. You are {assistant}, an accurate and capable assistant \
             with access to up-to-date information.\n\
             Answer only what was asked, concisely and in English.\n\
             Do not mention your training data and do not add notes about these instructions.",
            user = self.user_name,
            assistant = self.assistant_name,
        )
    }
}

/// Date and time context handed to the model with every question.
pub fn realtime_context(now: DateTime<Local>) -> String {
    format!(
        "Use this real-time information if needed:\n\
         Day: {}\nDate: {}\nMonth: {}\nYear: {}\n\
         Time: {} hours, {} minutes, {} seconds.",
        now.format("%A"),
        now.format("%d"),
        now.format("%B"),
        now.format("%Y"),
        now.format("%H"),
        now.format("%M"),
        now.format("%S"),
    )
}

pub fn strip_blank_lines(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Conversational answer from one chat endpoint. One attempt per call;
/// retrying is the chain's job, through the next endpoint.
pub struct ChatStrategy {
    provider: Arc<dyn ChatProvider>,
    persona: Persona,
}

impl ChatStrategy {
    pub fn new(provider: Arc<dyn ChatProvider>, persona: Persona) -> Self {
        Self { provider, persona }
    }

    fn conversation(&self, text: &str) -> Vec<Message> {
        vec![
            Message::system(self.persona.system_prompt()),
            Message::system(realtime_context(Local::now())),
            Message::user(text),
        ]
    }
}

#[async_trait]
impl Strategy<String> for ChatStrategy {
    fn name(&self) -> &str {
        self.provider.name()
    }

    async fn attempt(&self, text: &String) -> Result<Value, StrategyError> {
        if text.trim().is_empty() {
            return Err(StrategyError::Failed("empty message".to_string()));
        }
        debug!("Asking {} ({} chars)", self.provider.name(), text.len());
        let reply = self.provider.complete(&self.conversation(text)).await?;
        let answer = strip_blank_lines(&reply);
        if answer.is_empty() {
            return Err(StrategyError::Failed(format!(
                "{} returned an empty answer",
                self.provider.name()
            )));
        }
        Ok(Value::String(answer))
    }
}
