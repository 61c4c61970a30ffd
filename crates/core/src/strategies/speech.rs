use crate::chain::CapabilityRequest;
use crate::error::StrategyError;
use crate::strategy::Strategy;
use async_trait::async_trait;
use nio_providers::{SpeechRecognizer, SpeechSynthesizer};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Texts at least this long are condensed before being spoken.
pub const CONDENSE_THRESHOLD: usize = 250;

const OVERFLOW_LINES: [&str; 6] = [
    "The rest of the result is on the chat screen.",
    "You can read the rest of the text on the chat screen.",
    "The remaining text is waiting on the chat screen.",
    "Please check the chat screen for the rest of the answer.",
    "There is more on the chat screen.",
    "The full answer is printed on the chat screen.",
];

/// Long answers are cut to their first two sentences plus a pointer to the
/// chat screen; short ones pass through untouched.
pub fn condense_for_speech(text: &str) -> String {
    if text.chars().count() < CONDENSE_THRESHOLD || text.trim().len() <= 4 {
        return text.to_string();
    }
    let lead: Vec<&str> = text
        .split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .take(2)
        .collect();
    let overflow = OVERFLOW_LINES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(OVERFLOW_LINES[0]);
    format!("{}. {}", lead.join(". "), overflow)
}

/// Trim, upper-case the first letter, and close with a period unless the
/// text already ends in terminal punctuation.
pub fn normalize_query(text: &str) -> String {
    let trimmed = text.trim();
    let mut chars = trimmed.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let mut normalized: String = first.to_uppercase().chain(chars).collect();
    if !normalized.ends_with(&['.', '?', '!'][..]) {
        normalized.push('.');
    }
    normalized
}

pub struct SynthesisStrategy {
    synthesizer: Arc<dyn SpeechSynthesizer>,
}

impl SynthesisStrategy {
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        Self { synthesizer }
    }
}

#[async_trait]
impl Strategy<String> for SynthesisStrategy {
    fn name(&self) -> &str {
        self.synthesizer.name()
    }

    fn available(&self) -> bool {
        self.synthesizer.available()
    }

    async fn attempt(&self, text: &String) -> Result<Value, StrategyError> {
        if text.trim().is_empty() {
            return Err(StrategyError::Failed("nothing to speak".to_string()));
        }
        let spoken = condense_for_speech(text);
        debug!("Synthesizing {} chars with {}", spoken.len(), self.synthesizer.name());
        let audio = self.synthesizer.synthesize(&spoken).await?;
        Ok(Value::String(audio.display().to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SttRequest {
    pub timeout_secs: u64,
}

impl CapabilityRequest for SttRequest {
    fn summary(&self) -> String {
        format!("listen for up to {}s", self.timeout_secs)
    }
}

pub struct RecognitionStrategy {
    recognizer: Arc<dyn SpeechRecognizer>,
}

impl RecognitionStrategy {
    pub fn new(recognizer: Arc<dyn SpeechRecognizer>) -> Self {
        Self { recognizer }
    }
}

#[async_trait]
impl Strategy<SttRequest> for RecognitionStrategy {
    fn name(&self) -> &str {
        self.recognizer.name()
    }

    fn available(&self) -> bool {
        self.recognizer.available()
    }

    async fn attempt(&self, request: &SttRequest) -> Result<Value, StrategyError> {
        let heard = self.recognizer.listen(request.timeout_secs).await?;
        let query = normalize_query(&heard);
        if query.is_empty() {
            return Err(StrategyError::Failed("no speech detected".to_string()));
        }
        Ok(Value::String(query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_untouched() {
        assert_eq!(condense_for_speech("Hello there."), "Hello there.");
    }

    #[test]
    fn test_long_text_condensed() {
        let long = format!("First point. Second point. {}", "filler words ".repeat(30));
        let spoken = condense_for_speech(&long);
        assert!(spoken.starts_with("First point. Second point. "));
        assert!(OVERFLOW_LINES.iter().any(|line| spoken.ends_with(*line)));
        assert!(!spoken.contains("filler"));
    }

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query("  what time is it "), "What time is it.");
        assert_eq!(normalize_query("really?"), "Really?");
        assert_eq!(normalize_query("done!"), "Done!");
        assert_eq!(normalize_query("   "), "");
    }
}
