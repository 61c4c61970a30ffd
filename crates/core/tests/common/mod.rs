#![allow(dead_code)]
//! In-memory providers shared by the integration tests.

use async_trait::async_trait;
use nio_providers::*;
use parking_lot::Mutex;
use std::path::PathBuf;

pub struct FakeChat {
    pub name: &'static str,
    pub reply: Option<String>,
    pub seen: Mutex<Vec<Vec<Message>>>,
}

impl FakeChat {
    pub fn answering(name: &'static str, reply: &str) -> Self {
        Self {
            name,
            reply: Some(reply.to_string()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(name: &'static str) -> Self {
        Self {
            name,
            reply: None,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().len()
    }
}

#[async_trait]
impl ChatProvider for FakeChat {
    async fn complete(&self, messages: &[Message]) -> Result<String, ProviderError> {
        self.seen.lock().push(messages.to_vec());
        self.reply
            .clone()
            .ok_or_else(|| ProviderError::Http("connection refused".to_string()))
    }

    fn name(&self) -> &str {
        self.name
    }
}

pub struct FakeImages {
    pub bytes: Vec<u8>,
}

#[async_trait]
impl ImageProvider for FakeImages {
    async fn synthesize(&self, _prompt: &str) -> Result<Vec<u8>, ProviderError> {
        Ok(self.bytes.clone())
    }

    fn name(&self) -> &str {
        "fake-images"
    }
}

pub struct FakeVoice {
    pub output: PathBuf,
    pub spoken: Mutex<Vec<String>>,
}

#[async_trait]
impl SpeechSynthesizer for FakeVoice {
    async fn synthesize(&self, text: &str) -> Result<PathBuf, ProviderError> {
        self.spoken.lock().push(text.to_string());
        Ok(self.output.clone())
    }

    fn name(&self) -> &str {
        "fake-voice"
    }
}

pub struct FakeEars {
    pub heard: String,
    pub installed: bool,
}

#[async_trait]
impl SpeechRecognizer for FakeEars {
    async fn listen(&self, _timeout_secs: u64) -> Result<String, ProviderError> {
        if self.heard.is_empty() {
            return Err(ProviderError::NotFound("no speech detected".to_string()));
        }
        Ok(self.heard.clone())
    }

    fn name(&self) -> &str {
        "fake-ears"
    }

    fn available(&self) -> bool {
        self.installed
    }
}

pub struct FakeSearch {
    pub results: Vec<SearchResult>,
}

impl FakeSearch {
    pub fn with_hit(title: &str, snippet: &str) -> Self {
        Self {
            results: vec![SearchResult {
                title: title.to_string(),
                source: "example.org".to_string(),
                date: Some("2024-05-01".to_string()),
                snippet: snippet.to_string(),
                url: "https://example.org/hit".to_string(),
            }],
        }
    }
}

#[async_trait]
impl SearchProvider for FakeSearch {
    async fn query(&self, _text: &str) -> Result<Vec<SearchResult>, ProviderError> {
        Ok(self.results.clone())
    }

    fn name(&self) -> &str {
        "fake-search"
    }
}

/// Records every OS call. Opening anything containing `missing` fails.
#[derive(Default)]
pub struct FakeDesktop {
    pub opened: Mutex<Vec<String>>,
    pub closed: Mutex<Vec<String>>,
    pub volume: Mutex<Vec<VolumeDirective>>,
}

#[async_trait]
impl OsActionProvider for FakeDesktop {
    async fn open_target(&self, name_or_url: &str) -> Result<(), ProviderError> {
        if name_or_url.contains("missing") && !name_or_url.starts_with("https://") {
            return Err(ProviderError::NotFound(format!("no application named {name_or_url}")));
        }
        self.opened.lock().push(name_or_url.to_string());
        Ok(())
    }

    async fn close_target(&self, name: &str) -> Result<(), ProviderError> {
        self.closed.lock().push(name.to_string());
        Ok(())
    }

    async fn set_volume(&self, directive: VolumeDirective) -> Result<(), ProviderError> {
        self.volume.lock().push(directive);
        Ok(())
    }

    fn name(&self) -> &str {
        "fake-desktop"
    }
}

pub struct FakeMedia {
    pub url: Option<String>,
}

#[async_trait]
impl MediaLocator for FakeMedia {
    async fn locate(&self, query: &str) -> Result<String, ProviderError> {
        self.url
            .clone()
            .ok_or_else(|| ProviderError::NotFound(format!("no video for {query}")))
    }
}

pub struct FakeIntent {
    pub labels: Option<Vec<String>>,
}

#[async_trait]
impl IntentModel for FakeIntent {
    async fn categorize(&self, _text: &str) -> Result<Vec<String>, ProviderError> {
        self.labels
            .clone()
            .ok_or_else(|| ProviderError::Api("model offline".to_string()))
    }

    fn name(&self) -> &str {
        "fake-intent"
    }
}
