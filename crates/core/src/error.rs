use crate::capability::CapabilityName;
use nio_providers::ProviderError;
use thiserror::Error;

/// Failures surfaced by the router, dispatch engine and startup wiring.
#[derive(Debug, Error)]
pub enum RouterError {
    #[error("no strategy succeeded for {capability} (last error from {strategy}: {reason})")]
    ProviderUnavailable {
        capability: CapabilityName,
        strategy: String,
        reason: String,
    },

    #[error("{0}")]
    ParseUnrecognized(String),

    #[error("{capability} timed out: {reason}")]
    ProviderTimeout {
        capability: CapabilityName,
        reason: String,
    },

    #[error("{capability} failed transiently (last error from {strategy}: {reason})")]
    ProviderTransientFailure {
        capability: CapabilityName,
        strategy: String,
        reason: String,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Why a single strategy attempt failed.
#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("unavailable: {0}")]
    Unavailable(String),

    #[error("timed out: {0}")]
    Timeout(String),

    #[error("transient failure: {0}")]
    Transient(String),

    #[error("{0}")]
    Failed(String),
}

impl From<ProviderError> for StrategyError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NotConfigured(_) => StrategyError::Unavailable(err.to_string()),
            ProviderError::Timeout(_) => StrategyError::Timeout(err.to_string()),
            ref e if e.is_transient() => StrategyError::Transient(err.to_string()),
            _ => StrategyError::Failed(err.to_string()),
        }
    }
}

impl From<std::io::Error> for StrategyError {
    fn from(err: std::io::Error) -> Self {
        StrategyError::Failed(format!("IO error: {err}"))
    }
}
