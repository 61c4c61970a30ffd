use super::chat::{realtime_context, strip_blank_lines, Persona};
use crate::error::StrategyError;
use crate::strategy::Strategy;
use async_trait::async_trait;
use chrono::Local;
use nio_providers::{ChatProvider, Message, SearchProvider, SearchResult};
use serde_json::{json, Value};
use std::fmt::Write;
use std::sync::Arc;
use tracing::debug;

/// Plain-text rendering of search hits, also used as model context.
pub fn format_digest(query: &str, results: &[SearchResult]) -> String {
    let mut digest = format!("The search results for '{query}' are:\n[start]\n");
    for result in results {
        let _ = writeln!(digest, "Title: {}", result.title);
        let _ = writeln!(digest, "Source: {}", result.source);
        if let Some(date) = &result.date {
            let _ = writeln!(digest, "Date: {date}");
        }
        let _ = writeln!(digest, "Description: {}", result.snippet);
        let _ = writeln!(digest, "URL: {}\n", result.url);
    }
    digest.push_str("[end]");
    digest
}

async fn fetch(search: &dyn SearchProvider, query: &str) -> Result<Vec<SearchResult>, StrategyError> {
    if query.trim().is_empty() {
        return Err(StrategyError::Failed("empty search query".to_string()));
    }
    let results = search.query(query).await?;
    if results.is_empty() {
        return Err(StrategyError::Failed(format!("no results for '{query}'")));
    }
    debug!("{} returned {} result(s)", search.name(), results.len());
    Ok(results)
}

/// Searches the web and has a chat model answer from the hits.
pub struct AnsweredSearch {
    search: Arc<dyn SearchProvider>,
    chat: Arc<dyn ChatProvider>,
    persona: Persona,
    name: String,
}

impl AnsweredSearch {
    pub fn new(search: Arc<dyn SearchProvider>, chat: Arc<dyn ChatProvider>, persona: Persona) -> Self {
        let name = format!("{}+{}", search.name(), chat.name());
        Self {
            search,
            chat,
            persona,
            name,
        }
    }
}

#[async_trait]
impl Strategy<String> for AnsweredSearch {
    fn name(&self) -> &str {
        &self.name
    }

    async fn attempt(&self, query: &String) -> Result<Value, StrategyError> {
        let results = fetch(self.search.as_ref(), query).await?;
        let messages = vec![
            Message::system(self.persona.system_prompt()),
            Message::system(format_digest(query, &results)),
            Message::system(realtime_context(Local::now())),
            Message::user(query.as_str()),
        ];
        let answer = strip_blank_lines(&self.chat.complete(&messages).await?);
        if answer.is_empty() {
            return Err(StrategyError::Failed(format!(
                "{} returned an empty answer",
                self.chat.name()
            )));
        }
        Ok(json!({ "answer": answer, "results": results }))
    }
}

/// Raw hits, formatted. Needs no model.
pub struct DigestSearch {
    search: Arc<dyn SearchProvider>,
}

impl DigestSearch {
    pub fn new(search: Arc<dyn SearchProvider>) -> Self {
        Self { search }
    }
}

#[async_trait]
impl Strategy<String> for DigestSearch {
    fn name(&self) -> &str {
        self.search.name()
    }

    async fn attempt(&self, query: &String) -> Result<Value, StrategyError> {
        let results = fetch(self.search.as_ref(), query).await?;
        Ok(json!({ "answer": format_digest(query, &results), "results": results }))
    }
}
