//! Decision-making model: asks a chat model to label a request with task
//! categories before it is routed.

use crate::traits::*;
use async_trait::async_trait;
use std::sync::Arc;

const DECISION_PROMPT: &str = r#"You are a decision-making model that decides what kind of query is given to you.
Do not answer the query, only label it. Reply with one or more comma separated labels:
-> 'general (query)' if a chatbot can answer it without up-to-date information.
-> 'realtime (query)' if answering needs up-to-date information from the internet.
-> 'open (application or website name)' to open an application or website.
-> 'close (application name)' to close an application.
-> 'play (song name)' to play a song or video.
-> 'generate image (image prompt)' to generate an image.
-> 'content (topic)' to write a letter, essay, code or any other content.
-> 'google search (topic)' or 'youtube search (topic)' to search on those sites.
-> 'system (mute|unmute|volume up|volume down)' for volume control.
If the query asks for several tasks, reply with one label per task, e.g. 'open chrome, close notepad'."#;

pub struct DecisionModel {
    chat: Arc<dyn ChatProvider>,
}

impl DecisionModel {
    pub fn new(chat: Arc<dyn ChatProvider>) -> Self {
        Self { chat }
    }
}

/// Splits a comma separated label reply into trimmed, non-empty labels.
pub fn split_labels(reply: &str) -> Vec<String> {
    reply
        .replace('\n', ",")
        .split(',')
        .map(|label| label.trim().trim_matches('\'').trim().to_string())
        .filter(|label| !label.is_empty())
        .collect()
}

#[async_trait]
impl IntentModel for DecisionModel {
    async fn categorize(&self, text: &str) -> Result<Vec<String>, ProviderError> {
        let messages = [Message::system(DECISION_PROMPT), Message::user(text)];
        let reply = self.chat.complete(&messages).await?;
        let labels = split_labels(&reply);
        if labels.is_empty() {
            return Err(ProviderError::Parse("decision model returned no labels".to_string()));
        }
        Ok(labels)
    }

    fn name(&self) -> &str {
        "decision-model"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_labels() {
        let labels = split_labels("open chrome, 'close notepad'\ngeneral how are you");
        assert_eq!(labels, vec!["open chrome", "close notepad", "general how are you"]);
    }

    #[test]
    fn test_split_labels_empty_reply() {
        assert!(split_labels(" , \n").is_empty());
    }
}
