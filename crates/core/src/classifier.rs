//! Intent classification: a fallible model first, deterministic keywords
//! always behind it.

use crate::capability::CapabilityName;
use crate::metrics::Metrics;
use nio_providers::IntentModel;
use std::sync::Arc;
use tracing::{debug, warn};

/// Keyword sets in match priority. The first capability with a phrase
/// contained in the lower-cased text wins.
const KEYWORDS: [(CapabilityName, &[&str]); 4] = [
    (
        CapabilityName::Image,
        &["generate image", "create image", "image of", "make image"],
    ),
    (
        CapabilityName::Automation,
        &["open ", "close ", "automation", "run automation", "play "],
    ),
    (
        CapabilityName::Tts,
        &["speak", "say", "tell me", "read", "text to speech"],
    ),
    (
        CapabilityName::Search,
        &["search", "google", "find", "look up"],
    ),
];

const AUTOMATION_LABELS: [&str; 4] = ["open", "close", "play", "content"];

/// Deterministic fallback classifier. Defaults to chat.
pub fn keyword_intent(text: &str) -> CapabilityName {
    let lower = text.to_lowercase();
    KEYWORDS
        .iter()
        .find(|(_, phrases)| phrases.iter().any(|phrase| lower.contains(phrase)))
        .map(|(capability, _)| *capability)
        .unwrap_or(CapabilityName::Chat)
}

/// Maps the model's first label onto a capability. `image` may appear
/// anywhere in the label; the other categories must lead it.
pub fn interpret_model_output(labels: &[String]) -> Option<CapabilityName> {
    let label = labels.first()?.trim().to_lowercase();
    if label.contains("image") {
        return Some(CapabilityName::Image);
    }
    if label.starts_with("general") {
        return Some(CapabilityName::Chat);
    }
    if label.starts_with("realtime") {
        return Some(CapabilityName::Search);
    }
    if AUTOMATION_LABELS.iter().any(|verb| label.starts_with(verb)) {
        return Some(CapabilityName::Automation);
    }
    None
}

pub struct IntentClassifier {
    model: Option<Arc<dyn IntentModel>>,
    metrics: Arc<Metrics>,
}

impl IntentClassifier {
    pub fn new(model: Option<Arc<dyn IntentModel>>) -> Self {
        Self {
            model,
            metrics: Arc::new(Metrics::default()),
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    pub async fn classify(&self, text: &str) -> CapabilityName {
        if text.trim().is_empty() {
            return CapabilityName::Chat;
        }

        if let Some(model) = &self.model {
            match model.categorize(text).await {
                Ok(labels) => match interpret_model_output(&labels) {
                    Some(capability) => {
                        debug!("{} classified '{}' as {}", model.name(), text, capability);
                        self.metrics.inc_model_classifications();
                        return capability;
                    }
                    None => debug!("Unrecognized model labels {:?}, using keywords", labels),
                },
                Err(e) => warn!("Intent model {} failed, using keywords: {}", model.name(), e),
            }
        }

        self.metrics.inc_keyword_classifications();
        keyword_intent(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_keyword_priority() {
        assert_eq!(keyword_intent("generate image of a cat"), CapabilityName::Image);
        assert_eq!(keyword_intent("please open chrome"), CapabilityName::Automation);
        assert_eq!(keyword_intent("Say hello to everyone"), CapabilityName::Tts);
        assert_eq!(keyword_intent("look up the weather"), CapabilityName::Search);
        assert_eq!(keyword_intent("what is the capital of France"), CapabilityName::Chat);
        // Image outranks automation
        assert_eq!(
            keyword_intent("open a window and make image of it"),
            CapabilityName::Image
        );
    }

    #[test]
    fn test_keyword_matching_is_case_insensitive() {
        assert_eq!(keyword_intent("GOOGLE the news"), CapabilityName::Search);
    }

    #[test]
    fn test_interpret_model_output() {
        assert_eq!(
            interpret_model_output(&labels(&["generate image of a fox"])),
            Some(CapabilityName::Image)
        );
        assert_eq!(
            interpret_model_output(&labels(&["general how are you"])),
            Some(CapabilityName::Chat)
        );
        assert_eq!(
            interpret_model_output(&labels(&["realtime who won the match"])),
            Some(CapabilityName::Search)
        );
        assert_eq!(
            interpret_model_output(&labels(&["open chrome", "close notepad"])),
            Some(CapabilityName::Automation)
        );
        assert_eq!(
            interpret_model_output(&labels(&["content essay on rivers"])),
            Some(CapabilityName::Automation)
        );
        assert_eq!(interpret_model_output(&labels(&["exit"])), None);
        assert_eq!(interpret_model_output(&[]), None);
    }

    #[test]
    fn test_general_label_mentioning_open_is_chat() {
        assert_eq!(
            interpret_model_output(&labels(&["general what does open source mean"])),
            Some(CapabilityName::Chat)
        );
    }
}
