//! Concurrent execution of automation command batches.

use crate::capability::CapabilityName;
use crate::chain::FallbackChain;
use crate::envelope::{BatchEntry, BatchOutcome, ResultEnvelope};
use crate::error::RouterError;
use crate::metrics::Metrics;
use crate::parser::{parse, Action};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio::time::{timeout, Duration};
use tracing::{error, info, warn};

pub const NO_HANDLER: &str = "no handler for command";

#[derive(Debug, Clone)]
pub struct DispatchOptions {
    /// Upper bound on actions executing at once.
    pub max_concurrency: usize,
    /// Stop waiting for an action after this long. The action itself keeps
    /// running; only its outcome is abandoned.
    pub action_timeout: Option<Duration>,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            max_concurrency: 8,
            action_timeout: None,
        }
    }
}

enum Slot {
    Ready(ResultEnvelope),
    Pending(JoinHandle<ResultEnvelope>),
}

pub struct DispatchEngine {
    automation: Arc<FallbackChain<Action>>,
    limiter: Arc<Semaphore>,
    action_timeout: Option<Duration>,
    metrics: Arc<Metrics>,
}

impl DispatchEngine {
    pub fn new(
        automation: Arc<FallbackChain<Action>>,
        options: DispatchOptions,
        metrics: Arc<Metrics>,
    ) -> Result<Self, RouterError> {
        if options.max_concurrency == 0 {
            return Err(RouterError::Configuration(
                "max_concurrency must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            automation,
            limiter: Arc::new(Semaphore::new(options.max_concurrency)),
            action_timeout: options.action_timeout,
            metrics,
        })
    }

    /// Parse every line, run the recognized ones concurrently, and return one
    /// outcome per line in input order. One action failing, panicking or
    /// timing out never affects the others.
    pub async fn dispatch_batch<S: AsRef<str>>(&self, lines: &[S]) -> BatchOutcome {
        self.metrics.inc_batches();
        info!("Dispatching batch of {} command(s)", lines.len());

        let mut slots = Vec::with_capacity(lines.len());
        for line in lines {
            let action = parse(line.as_ref());
            if !action.is_recognized() {
                warn!("No handler for command: {}", action.source_line);
                let err = RouterError::ParseUnrecognized(NO_HANDLER.to_string());
                slots.push((action.source_line, Slot::Ready(ResultEnvelope::from_error(&err))));
                continue;
            }
            self.metrics.inc_actions_dispatched();
            let source_line = action.source_line.clone();
            slots.push((source_line, Slot::Pending(self.submit(action))));
        }

        let mut entries = Vec::with_capacity(slots.len());
        for (source_line, slot) in slots {
            let outcome = match slot {
                Slot::Ready(envelope) => envelope,
                Slot::Pending(handle) => match handle.await {
                    Ok(envelope) => envelope,
                    Err(join_err) => {
                        error!("Action '{}' aborted: {}", source_line, join_err);
                        ResultEnvelope::failure(format!("action aborted: {join_err}"))
                    }
                },
            };
            if !outcome.success {
                self.metrics.inc_action_failures();
            }
            entries.push(BatchEntry {
                source_line,
                outcome,
            });
        }

        BatchOutcome { entries }
    }

    fn submit(&self, action: Action) -> JoinHandle<ResultEnvelope> {
        let chain = self.automation.clone();
        let limiter = self.limiter.clone();
        let action_timeout = self.action_timeout;

        tokio::spawn(async move {
            let source_line = action.source_line.clone();
            let execution = tokio::spawn(async move {
                let _permit = match limiter.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => return ResultEnvelope::failure("dispatch engine shut down"),
                };
                chain.resolve(&action).await
            });

            let joined = match action_timeout {
                Some(limit) => match timeout(limit, execution).await {
                    Ok(joined) => joined,
                    Err(_) => {
                        warn!("Gave up waiting for '{}' after {:?}", source_line, limit);
                        let err = RouterError::ProviderTimeout {
                            capability: CapabilityName::Automation,
                            reason: format!("no outcome for '{source_line}' within {limit:?}"),
                        };
                        return ResultEnvelope::from_error(&err);
                    }
                },
                None => execution.await,
            };

            match joined {
                Ok(envelope) => envelope,
                Err(join_err) if join_err.is_panic() => {
                    error!("Action '{}' panicked", source_line);
                    ResultEnvelope::failure("action panicked")
                }
                Err(join_err) => ResultEnvelope::failure(format!("action cancelled: {join_err}")),
            }
        })
    }
}
