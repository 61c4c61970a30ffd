//! Ordered fallback chains: strategies are tried in registration order and
//! the first success wins.

use crate::audit::{AuditJournal, JournalEntry};
use crate::capability::CapabilityName;
use crate::envelope::ResultEnvelope;
use crate::error::{RouterError, StrategyError};
use crate::metrics::Metrics;
use crate::strategy::Strategy;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

const SUMMARY_CHARS: usize = 200;

/// A request a chain can route. The summary is what lands in the journal.
pub trait CapabilityRequest: Clone + Send + Sync + 'static {
    fn summary(&self) -> String;
}

impl CapabilityRequest for String {
    fn summary(&self) -> String {
        self.chars().take(SUMMARY_CHARS).collect()
    }
}

pub struct FallbackChain<R: CapabilityRequest> {
    capability: CapabilityName,
    strategies: Vec<Arc<dyn Strategy<R>>>,
    metrics: Arc<Metrics>,
    journal: Option<Arc<AuditJournal>>,
}

impl<R: CapabilityRequest> FallbackChain<R> {
    /// Fails with a configuration error when no strategy is given; an empty
    /// chain must never reach call time.
    pub fn new(
        capability: CapabilityName,
        strategies: Vec<Arc<dyn Strategy<R>>>,
    ) -> Result<Self, RouterError> {
        if strategies.is_empty() {
            return Err(RouterError::Configuration(format!(
                "no strategies registered for {capability}"
            )));
        }
        Ok(Self {
            capability,
            strategies,
            metrics: Arc::new(Metrics::default()),
            journal: None,
        })
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_journal(mut self, journal: Option<Arc<AuditJournal>>) -> Self {
        self.journal = journal;
        self
    }

    pub fn capability(&self) -> CapabilityName {
        self.capability
    }

    pub fn strategy_names(&self) -> Vec<String> {
        self.strategies.iter().map(|s| s.name().to_string()).collect()
    }

    /// True when at least one strategy reported itself available at
    /// construction.
    pub fn is_available(&self) -> bool {
        self.strategies.iter().any(|s| s.available())
    }

    pub async fn resolve(&self, request: &R) -> ResultEnvelope {
        let mut last_failure: Option<(String, StrategyError)> = None;

        for strategy in &self.strategies {
            let name = strategy.name().to_string();
            self.metrics.inc_strategy_attempts();
            debug!("{}: attempting strategy {}", self.capability, name);

            match self.attempt_isolated(strategy.clone(), request.clone()).await {
                Ok(payload) => {
                    info!("{} resolved by {}", self.capability, name);
                    self.journal(request, Some(name), true, None);
                    return ResultEnvelope::ok(payload);
                }
                Err(err) => {
                    self.metrics.inc_strategy_failures();
                    warn!("{} strategy {} failed: {}", self.capability, name, err);
                    last_failure = Some((name, err));
                }
            }
        }

        self.metrics.inc_chain_exhaustions();
        let err = self.exhausted(last_failure);
        warn!("{}", err);
        let envelope = ResultEnvelope::from_error(&err);
        self.journal(request, None, false, envelope.error.clone());
        envelope
    }

    // Each attempt runs on its own task so a panicking provider counts as a
    // failed strategy instead of taking the caller down.
    async fn attempt_isolated(
        &self,
        strategy: Arc<dyn Strategy<R>>,
        request: R,
    ) -> Result<serde_json::Value, StrategyError> {
        let handle = tokio::spawn(async move { strategy.attempt(&request).await });
        match handle.await {
            Ok(result) => result,
            Err(join_err) if join_err.is_panic() => {
                error!("{} strategy panicked", self.capability);
                Err(StrategyError::Failed("strategy panicked".to_string()))
            }
            Err(_) => Err(StrategyError::Failed("strategy cancelled".to_string())),
        }
    }

    fn exhausted(&self, last_failure: Option<(String, StrategyError)>) -> RouterError {
        let capability = self.capability;
        match last_failure {
            Some((strategy, StrategyError::Timeout(reason))) => RouterError::ProviderTimeout {
                capability,
                reason: format!("{strategy}: {reason}"),
            },
            Some((strategy, StrategyError::Transient(reason))) => {
                RouterError::ProviderTransientFailure {
                    capability,
                    strategy,
                    reason,
                }
            }
            Some((strategy, err)) => RouterError::ProviderUnavailable {
                capability,
                strategy,
                reason: err.to_string(),
            },
            None => RouterError::Configuration(format!(
                "no strategies registered for {capability}"
            )),
        }
    }

    fn journal(&self, request: &R, strategy: Option<String>, success: bool, error: Option<String>) {
        let Some(journal) = &self.journal else {
            return;
        };
        let entry = JournalEntry::new(self.capability, request.summary(), strategy, success, error);
        if let Err(e) = journal.record(&entry) {
            warn!("Failed to write audit journal: {}", e);
        }
    }
}
