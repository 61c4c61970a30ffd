//! Capability routing core: fallback chains, command parsing, concurrent
//! dispatch of automation batches, and intent classification.

pub mod audit;
pub mod capability;
pub mod chain;
pub mod classifier;
pub mod dispatch;
pub mod envelope;
pub mod error;
pub mod metrics;
pub mod parser;
pub mod router;
pub mod strategies;
pub mod strategy;

pub use audit::{AuditJournal, AuditJournalError, JournalEntry};
pub use capability::CapabilityName;
pub use chain::{CapabilityRequest, FallbackChain};
pub use classifier::{keyword_intent, IntentClassifier};
pub use dispatch::{DispatchEngine, DispatchOptions, NO_HANDLER};
pub use envelope::{BatchEntry, BatchOutcome, ResultEnvelope};
pub use error::{RouterError, StrategyError};
pub use metrics::{Metrics, MetricsSnapshot};
pub use parser::{parse, Action, Verb};
pub use router::{split_commands, CapabilityRouter, RouterBuilder, DEFAULT_LISTEN_SECS};
pub use strategies::{ImageRequest, SttRequest};
pub use strategy::Strategy;
