//! Provider contracts consumed by the capability router.
//!
//! Each external collaborator is declared once as a typed trait. Concrete
//! implementations are chosen at startup and registered as strategies; the
//! router never probes a provider for which functions it happens to expose.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("API error: {0}")]
    Api(String),
    #[error("Rate limited: {0}")]
    RateLimited(String),
    #[error("Timed out after {0}s")]
    Timeout(u64),
    #[error("Not configured: {0}")]
    NotConfigured(String),
    #[error("Command failed: {0}")]
    Command(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProviderError {
    /// Network and rate-limit failures that may clear up on their own.
    pub fn is_transient(&self) -> bool {
        matches!(self, ProviderError::Http(_) | ProviderError::RateLimited(_))
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Http(format!("request timed out: {err}"))
        } else {
            ProviderError::Http(err.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// One web search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub source: String,
    pub date: Option<String>,
    pub snippet: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeDirective {
    Mute,
    Unmute,
    Up,
    Down,
}

impl FromStr for VolumeDirective {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "mute" => Ok(VolumeDirective::Mute),
            "unmute" => Ok(VolumeDirective::Unmute),
            "volume up" => Ok(VolumeDirective::Up),
            "volume down" => Ok(VolumeDirective::Down),
            other => Err(ProviderError::InvalidArgument(format!(
                "unknown system directive: {other}"
            ))),
        }
    }
}

impl fmt::Display for VolumeDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VolumeDirective::Mute => "mute",
            VolumeDirective::Unmute => "unmute",
            VolumeDirective::Up => "volume up",
            VolumeDirective::Down => "volume down",
        };
        f.write_str(s)
    }
}

#[async_trait]
pub trait ChatProvider: Send + Sync {
    async fn complete(&self, messages: &[Message]) -> Result<String, ProviderError>;

    fn name(&self) -> &str;
}

#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Returns the encoded image bytes (PNG or JPEG, provider dependent).
    async fn synthesize(&self, prompt: &str) -> Result<Vec<u8>, ProviderError>;

    fn name(&self) -> &str;
}

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Renders `text` to an audio file and returns its path.
    async fn synthesize(&self, text: &str) -> Result<PathBuf, ProviderError>;

    fn name(&self) -> &str;

    /// Whether the backing engine was found when the synthesizer was built.
    fn available(&self) -> bool {
        true
    }
}

#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    async fn listen(&self, timeout_secs: u64) -> Result<String, ProviderError>;

    fn name(&self) -> &str;

    fn available(&self) -> bool {
        true
    }
}

#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn query(&self, text: &str) -> Result<Vec<SearchResult>, ProviderError>;

    fn name(&self) -> &str;
}

/// Desktop side effects: launching, closing, and volume.
#[async_trait]
pub trait OsActionProvider: Send + Sync {
    async fn open_target(&self, name_or_url: &str) -> Result<(), ProviderError>;

    async fn close_target(&self, name: &str) -> Result<(), ProviderError>;

    async fn set_volume(&self, directive: VolumeDirective) -> Result<(), ProviderError>;

    fn name(&self) -> &str;
}

/// Resolves a free-text media query to a playable URL.
#[async_trait]
pub trait MediaLocator: Send + Sync {
    async fn locate(&self, query: &str) -> Result<String, ProviderError>;
}

/// Model-based intent classifier. Returns one category line per detected
/// task, e.g. `["general how are you", "open chrome"]`.
#[async_trait]
pub trait IntentModel: Send + Sync {
    async fn categorize(&self, text: &str) -> Result<Vec<String>, ProviderError>;

    fn name(&self) -> &str;
}
