//! Automation strategies: drive the desktop first, fall back to the browser.

use super::clip_stem;
use crate::dispatch::NO_HANDLER;
use crate::error::StrategyError;
use crate::parser::{Action, Verb};
use crate::strategy::Strategy;
use async_trait::async_trait;
use nio_providers::{ChatProvider, MediaLocator, Message, OsActionProvider, VolumeDirective};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

const CONTENT_WRITER_PROMPT: &str = "You are a content writer. Write the requested letter, \
    application, essay, note, song, poem or code in English. Reply with the text only.";

pub fn google_search_url(query: &str) -> String {
    format!("https://www.google.com/search?q={}", urlencoding::encode(query))
}

pub fn youtube_search_url(query: &str) -> String {
    format!(
        "https://www.youtube.com/results?search_query={}",
        urlencoding::encode(query)
    )
}

fn content_topic(argument: &str) -> String {
    argument.replace("content", "").trim().to_string()
}

fn content_file_name(topic: &str) -> String {
    let stem: String = topic
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '/' && *c != '\\')
        .collect();
    format!("{}.txt", clip_stem(&stem))
}

fn require_argument(action: &Action) -> Result<&str, StrategyError> {
    let argument = action.argument.trim();
    if argument.is_empty() {
        return Err(StrategyError::Failed(format!(
            "'{}' is missing its target",
            action.source_line
        )));
    }
    Ok(argument)
}

/// Executes actions on the local desktop.
pub struct DesktopActions {
    os: Arc<dyn OsActionProvider>,
    writer: Arc<dyn ChatProvider>,
    media: Arc<dyn MediaLocator>,
    content_dir: PathBuf,
    protected_apps: Vec<String>,
}

impl DesktopActions {
    pub fn new(
        os: Arc<dyn OsActionProvider>,
        writer: Arc<dyn ChatProvider>,
        media: Arc<dyn MediaLocator>,
        content_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            os,
            writer,
            media,
            content_dir: content_dir.into(),
            protected_apps: vec!["chrome".to_string()],
        }
    }

    /// Apps that a close command must never terminate.
    pub fn with_protected_apps(mut self, apps: Vec<String>) -> Self {
        self.protected_apps = apps.into_iter().map(|a| a.to_lowercase()).collect();
        self
    }

    fn is_protected(&self, target: &str) -> bool {
        let target = target.to_lowercase();
        self.protected_apps
            .iter()
            .any(|app| !app.is_empty() && target.contains(app.as_str()))
    }

    async fn open(&self, target: &str) -> Result<Value, StrategyError> {
        self.os.open_target(target).await?;
        Ok(json!({ "opened": target }))
    }

    async fn close(&self, target: &str) -> Result<Value, StrategyError> {
        if self.is_protected(target) {
            info!("Not closing protected app '{}'", target);
            return Ok(json!({ "closed": null, "skipped": target }));
        }
        self.os.close_target(target).await?;
        Ok(json!({ "closed": target }))
    }

    async fn write_content(&self, argument: &str) -> Result<Value, StrategyError> {
        let topic = content_topic(argument);
        if topic.is_empty() {
            return Err(StrategyError::Failed("no content topic given".to_string()));
        }
        let messages = vec![Message::system(CONTENT_WRITER_PROMPT), Message::user(topic.as_str())];
        let text = self.writer.complete(&messages).await?;
        if text.trim().is_empty() {
            return Err(StrategyError::Failed(format!("no content written for '{topic}'")));
        }

        tokio::fs::create_dir_all(&self.content_dir).await?;
        let path = self.content_dir.join(content_file_name(&topic));
        tokio::fs::write(&path, text.as_bytes()).await?;
        let display = path.display().to_string();
        if let Err(e) = self.os.open_target(&display).await {
            if let Err(remove_err) = tokio::fs::remove_file(&path).await {
                warn!("Could not remove {}: {}", path.display(), remove_err);
            }
            return Err(e.into());
        }
        Ok(Value::String(display))
    }

    async fn play(&self, query: &str) -> Result<Value, StrategyError> {
        let url = self.media.locate(query).await?;
        self.os.open_target(&url).await?;
        Ok(json!({ "playing": url }))
    }

    async fn system(&self, argument: &str) -> Result<Value, StrategyError> {
        let directive: VolumeDirective = argument
            .parse()
            .map_err(|e: nio_providers::ProviderError| StrategyError::Failed(e.to_string()))?;
        self.os.set_volume(directive).await?;
        Ok(json!({ "volume": directive.to_string() }))
    }
}

#[async_trait]
impl Strategy<Action> for DesktopActions {
    fn name(&self) -> &str {
        self.os.name()
    }

    async fn attempt(&self, action: &Action) -> Result<Value, StrategyError> {
        match action.verb {
            Verb::Open => self.open(require_argument(action)?).await,
            Verb::Close => self.close(require_argument(action)?).await,
            Verb::Content => self.write_content(&action.argument).await,
            Verb::GoogleSearch => {
                let query = require_argument(action)?;
                self.open(&google_search_url(query)).await
            }
            Verb::YouTubeSearch => {
                let query = require_argument(action)?;
                self.open(&youtube_search_url(query)).await
            }
            Verb::Play => self.play(require_argument(action)?).await,
            Verb::System => self.system(action.argument.trim()).await,
            Verb::Unrecognized => Err(StrategyError::Failed(NO_HANDLER.to_string())),
        }
    }
}

/// Browser-only rendition of what the desktop could not do.
pub struct WebFallback {
    browser: Arc<dyn OsActionProvider>,
}

impl WebFallback {
    pub fn new(browser: Arc<dyn OsActionProvider>) -> Self {
        Self { browser }
    }

    async fn visit(&self, url: String) -> Result<Value, StrategyError> {
        self.browser.open_target(&url).await?;
        Ok(json!({ "opened": url }))
    }
}

#[async_trait]
impl Strategy<Action> for WebFallback {
    fn name(&self) -> &str {
        "web"
    }

    async fn attempt(&self, action: &Action) -> Result<Value, StrategyError> {
        match action.verb {
            Verb::Open => {
                let target = require_argument(action)?;
                warn!("Falling back to a web search for '{}'", target);
                self.visit(google_search_url(target)).await
            }
            Verb::GoogleSearch => self.visit(google_search_url(require_argument(action)?)).await,
            Verb::Play | Verb::YouTubeSearch => {
                self.visit(youtube_search_url(require_argument(action)?)).await
            }
            verb => Err(StrategyError::Failed(format!(
                "no web fallback for {verb:?} '{}'",
                action.argument
            ))),
        }
    }
}
