use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Default)]
pub struct Metrics {
    strategy_attempts: AtomicU64,
    strategy_failures: AtomicU64,
    chain_exhaustions: AtomicU64,
    batches: AtomicU64,
    actions_dispatched: AtomicU64,
    action_failures: AtomicU64,
    model_classifications: AtomicU64,
    keyword_classifications: AtomicU64,
}

impl Metrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_strategy_attempts(&self) {
        self.strategy_attempts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_strategy_failures(&self) {
        self.strategy_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_chain_exhaustions(&self) {
        self.chain_exhaustions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_batches(&self) {
        self.batches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_actions_dispatched(&self) {
        self.actions_dispatched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_action_failures(&self) {
        self.action_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_model_classifications(&self) {
        self.model_classifications.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_keyword_classifications(&self) {
        self.keyword_classifications.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            strategy_attempts: self.strategy_attempts.load(Ordering::Relaxed),
            strategy_failures: self.strategy_failures.load(Ordering::Relaxed),
            chain_exhaustions: self.chain_exhaustions.load(Ordering::Relaxed),
            batches: self.batches.load(Ordering::Relaxed),
            actions_dispatched: self.actions_dispatched.load(Ordering::Relaxed),
            action_failures: self.action_failures.load(Ordering::Relaxed),
            model_classifications: self.model_classifications.load(Ordering::Relaxed),
            keyword_classifications: self.keyword_classifications.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct MetricsSnapshot {
    pub strategy_attempts: u64,
    pub strategy_failures: u64,
    pub chain_exhaustions: u64,
    pub batches: u64,
    pub actions_dispatched: u64,
    pub action_failures: u64,
    pub model_classifications: u64,
    pub keyword_classifications: u64,
}

impl MetricsSnapshot {
    pub fn strategy_success_rate(&self) -> f64 {
        if self.strategy_attempts == 0 {
            return 1.0;
        }
        1.0 - (self.strategy_failures as f64 / self.strategy_attempts as f64)
    }

    pub fn action_success_rate(&self) -> f64 {
        if self.actions_dispatched == 0 {
            return 1.0;
        }
        1.0 - (self.action_failures as f64 / self.actions_dispatched as f64)
    }
}
