//! The capability router: one fallback chain per capability, built once at
//! startup and shared read-only afterwards.

use crate::audit::AuditJournal;
use crate::capability::CapabilityName;
use crate::chain::FallbackChain;
use crate::classifier::IntentClassifier;
use crate::dispatch::{DispatchEngine, DispatchOptions, NO_HANDLER};
use crate::envelope::{BatchOutcome, ResultEnvelope};
use crate::error::RouterError;
use crate::metrics::{Metrics, MetricsSnapshot};
use crate::parser::Action;
use crate::strategies::{ImageRequest, SttRequest};
use crate::strategy::Strategy;
use nio_providers::IntentModel;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

pub const DEFAULT_LISTEN_SECS: u64 = 10;

/// Split free text into automation command lines on newlines and commas.
/// Lines are trimmed and lower-cased so they meet the parser's verbs.
pub fn split_commands(text: &str) -> Vec<String> {
    text.split(|c: char| c == '\n' || c == ',')
        .map(|line| line.trim().to_lowercase())
        .filter(|line| !line.is_empty())
        .collect()
}

pub struct CapabilityRouter {
    chat: FallbackChain<String>,
    image: FallbackChain<ImageRequest>,
    tts: FallbackChain<String>,
    stt: FallbackChain<SttRequest>,
    search: FallbackChain<String>,
    automation: Arc<FallbackChain<Action>>,
    dispatcher: DispatchEngine,
    classifier: IntentClassifier,
    metrics: Arc<Metrics>,
    default_listen_secs: u64,
}

impl CapabilityRouter {
    pub fn builder() -> RouterBuilder {
        RouterBuilder::default()
    }

    pub async fn chat(&self, text: &str) -> ResultEnvelope {
        self.chat.resolve(&text.to_string()).await
    }

    pub async fn image(&self, prompt: &str, count: u32) -> ResultEnvelope {
        self.image.resolve(&ImageRequest::new(prompt, count)).await
    }

    pub async fn tts(&self, text: &str) -> ResultEnvelope {
        self.tts.resolve(&text.to_string()).await
    }

    pub async fn stt(&self, timeout_secs: u64) -> ResultEnvelope {
        self.stt.resolve(&SttRequest { timeout_secs }).await
    }

    pub async fn search(&self, query: &str) -> ResultEnvelope {
        self.search.resolve(&query.to_string()).await
    }

    /// Run one parsed action through the automation chain.
    pub async fn automation(&self, action: &Action) -> ResultEnvelope {
        if !action.is_recognized() {
            let err = RouterError::ParseUnrecognized(NO_HANDLER.to_string());
            return ResultEnvelope::from_error(&err);
        }
        self.automation.resolve(action).await
    }

    pub async fn dispatch_batch<S: AsRef<str>>(&self, lines: &[S]) -> BatchOutcome {
        self.dispatcher.dispatch_batch(lines).await
    }

    pub async fn classify(&self, text: &str) -> CapabilityName {
        self.classifier.classify(text).await
    }

    /// Classify, then hand the text to the matching capability.
    pub async fn route(&self, text: &str) -> ResultEnvelope {
        let capability = self.classify(text).await;
        info!("Routing to {}", capability);
        match capability {
            CapabilityName::Chat => self.chat(text).await,
            CapabilityName::Image => self.image(text, 1).await,
            CapabilityName::Tts => self.tts(text).await,
            CapabilityName::Stt => self.stt(self.default_listen_secs).await,
            CapabilityName::Search => self.search(text).await,
            CapabilityName::Automation => self.route_commands(text).await,
        }
    }

    async fn route_commands(&self, text: &str) -> ResultEnvelope {
        let lines = split_commands(text);
        if lines.is_empty() {
            return ResultEnvelope::failure(NO_HANDLER);
        }
        let outcome = self.dispatch_batch(&lines).await;
        if outcome.all_succeeded() {
            return match serde_json::to_value(&outcome) {
                Ok(payload) => ResultEnvelope::ok(payload),
                Err(e) => ResultEnvelope::failure(format!("unserializable batch outcome: {e}")),
            };
        }
        let failed: Vec<String> = outcome
            .iter()
            .filter(|entry| !entry.outcome.success)
            .map(|entry| {
                format!(
                    "{}: {}",
                    entry.source_line,
                    entry.outcome.error.as_deref().unwrap_or("unknown failure")
                )
            })
            .collect();
        ResultEnvelope::failure(format!(
            "{} of {} command(s) failed: {}",
            failed.len(),
            outcome.len(),
            failed.join("; ")
        ))
    }

    /// Whether each capability has at least one strategy that reported itself
    /// available when the router was built.
    pub fn status(&self) -> BTreeMap<CapabilityName, bool> {
        BTreeMap::from([
            (CapabilityName::Chat, self.chat.is_available()),
            (CapabilityName::Image, self.image.is_available()),
            (CapabilityName::Tts, self.tts.is_available()),
            (CapabilityName::Stt, self.stt.is_available()),
            (CapabilityName::Search, self.search.is_available()),
            (CapabilityName::Automation, self.automation.is_available()),
        ])
    }

    pub fn strategies(&self) -> BTreeMap<CapabilityName, Vec<String>> {
        BTreeMap::from([
            (CapabilityName::Chat, self.chat.strategy_names()),
            (CapabilityName::Image, self.image.strategy_names()),
            (CapabilityName::Tts, self.tts.strategy_names()),
            (CapabilityName::Stt, self.stt.strategy_names()),
            (CapabilityName::Search, self.search.strategy_names()),
            (CapabilityName::Automation, self.automation.strategy_names()),
        ])
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn has_intent_model(&self) -> bool {
        self.classifier.has_model()
    }
}

/// Registers strategies in fallback order. `build` refuses to produce a
/// router with any capability left empty.
pub struct RouterBuilder {
    chat: Vec<Arc<dyn Strategy<String>>>,
    image: Vec<Arc<dyn Strategy<ImageRequest>>>,
    tts: Vec<Arc<dyn Strategy<String>>>,
    stt: Vec<Arc<dyn Strategy<SttRequest>>>,
    search: Vec<Arc<dyn Strategy<String>>>,
    automation: Vec<Arc<dyn Strategy<Action>>>,
    intent_model: Option<Arc<dyn IntentModel>>,
    journal: Option<Arc<AuditJournal>>,
    dispatch: DispatchOptions,
    default_listen_secs: u64,
    metrics: Arc<Metrics>,
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self {
            chat: Vec::new(),
            image: Vec::new(),
            tts: Vec::new(),
            stt: Vec::new(),
            search: Vec::new(),
            automation: Vec::new(),
            intent_model: None,
            journal: None,
            dispatch: DispatchOptions::default(),
            default_listen_secs: DEFAULT_LISTEN_SECS,
            metrics: Metrics::new(),
        }
    }
}

impl RouterBuilder {
    pub fn chat_strategy(mut self, strategy: Arc<dyn Strategy<String>>) -> Self {
        self.chat.push(strategy);
        self
    }

    pub fn image_strategy(mut self, strategy: Arc<dyn Strategy<ImageRequest>>) -> Self {
        self.image.push(strategy);
        self
    }

    pub fn tts_strategy(mut self, strategy: Arc<dyn Strategy<String>>) -> Self {
        self.tts.push(strategy);
        self
    }

    pub fn stt_strategy(mut self, strategy: Arc<dyn Strategy<SttRequest>>) -> Self {
        self.stt.push(strategy);
        self
    }

    pub fn search_strategy(mut self, strategy: Arc<dyn Strategy<String>>) -> Self {
        self.search.push(strategy);
        self
    }

    pub fn automation_strategy(mut self, strategy: Arc<dyn Strategy<Action>>) -> Self {
        self.automation.push(strategy);
        self
    }

    pub fn intent_model(mut self, model: Arc<dyn IntentModel>) -> Self {
        self.intent_model = Some(model);
        self
    }

    pub fn journal(mut self, journal: Arc<AuditJournal>) -> Self {
        self.journal = Some(journal);
        self
    }

    pub fn dispatch_options(mut self, options: DispatchOptions) -> Self {
        self.dispatch = options;
        self
    }

    pub fn default_listen_secs(mut self, secs: u64) -> Self {
        self.default_listen_secs = secs;
        self
    }

    pub fn build(self) -> Result<CapabilityRouter, RouterError> {
        let metrics = self.metrics;
        let journal = self.journal;

        macro_rules! chain {
            ($capability:expr, $strategies:expr) => {
                FallbackChain::new($capability, $strategies)?
                    .with_metrics(metrics.clone())
                    .with_journal(journal.clone())
            };
        }

        let chat = chain!(CapabilityName::Chat, self.chat);
        let image = chain!(CapabilityName::Image, self.image);
        let tts = chain!(CapabilityName::Tts, self.tts);
        let stt = chain!(CapabilityName::Stt, self.stt);
        let search = chain!(CapabilityName::Search, self.search);
        let automation = Arc::new(chain!(CapabilityName::Automation, self.automation));

        let dispatcher = DispatchEngine::new(automation.clone(), self.dispatch, metrics.clone())?;
        let classifier = IntentClassifier::new(self.intent_model).with_metrics(metrics.clone());

        info!(
            "Capability router ready (intent model: {})",
            if classifier.has_model() { "yes" } else { "keywords only" }
        );

        Ok(CapabilityRouter {
            chat,
            image,
            tts,
            stt,
            search,
            automation,
            dispatcher,
            classifier,
            metrics,
            default_listen_secs: self.default_listen_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_commands() {
        assert_eq!(
            split_commands("Open Chrome, close notepad\n\n play song ,"),
            vec!["open chrome", "close notepad", "play song"]
        );
        assert!(split_commands(" , \n").is_empty());
    }

    #[test]
    fn test_build_rejects_empty_chains() {
        let err = CapabilityRouter::builder().build().err();
        assert!(matches!(err, Some(RouterError::Configuration(_))));
    }
}
