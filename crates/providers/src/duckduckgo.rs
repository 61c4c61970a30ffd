//! Web search through the DuckDuckGo instant answer API.

use crate::traits::*;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

const API_URL: &str = "https://api.duckduckgo.com/";

pub struct DuckDuckGoSearch {
    client: Client,
    base_url: String,
    max_results: usize,
}

impl DuckDuckGoSearch {
    pub fn new(max_results: usize) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(20))
            .user_agent("nio/0.1")
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: API_URL.to_string(),
            max_results,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }
}

fn topic_result(topic: &Value) -> Option<SearchResult> {
    let text = topic["Text"].as_str()?.trim();
    let url = topic["FirstURL"].as_str()?.trim();
    if text.is_empty() || url.is_empty() {
        return None;
    }
    // Topic text reads "Title - description"
    let (title, snippet) = match text.split_once(" - ") {
        Some((title, rest)) => (title.to_string(), rest.to_string()),
        None => (text.to_string(), text.to_string()),
    };
    Some(SearchResult {
        title,
        source: "DuckDuckGo".to_string(),
        date: None,
        snippet,
        url: url.to_string(),
    })
}

/// Flattens an instant answer body into ordered results: the abstract first,
/// then related topics (including grouped sub-topics).
pub fn parse_instant_answer(body: &Value, max_results: usize) -> Vec<SearchResult> {
    let mut results = Vec::new();

    let abstract_text = body["AbstractText"].as_str().unwrap_or_default().trim();
    let abstract_url = body["AbstractURL"].as_str().unwrap_or_default().trim();
    if !abstract_text.is_empty() && !abstract_url.is_empty() {
        results.push(SearchResult {
            title: body["Heading"].as_str().unwrap_or_default().to_string(),
            source: body["AbstractSource"]
                .as_str()
                .unwrap_or("DuckDuckGo")
                .to_string(),
            date: None,
            snippet: abstract_text.to_string(),
            url: abstract_url.to_string(),
        });
    }

    if let Some(topics) = body["RelatedTopics"].as_array() {
        for topic in topics {
            if let Some(group) = topic["Topics"].as_array() {
                results.extend(group.iter().filter_map(topic_result));
            } else if let Some(result) = topic_result(topic) {
                results.push(result);
            }
        }
    }

    results.truncate(max_results);
    results
}

#[async_trait]
impl SearchProvider for DuckDuckGoSearch {
    async fn query(&self, text: &str) -> Result<Vec<SearchResult>, ProviderError> {
        if text.trim().is_empty() {
            return Err(ProviderError::InvalidArgument("query cannot be empty".to_string()));
        }

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("q", text),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api(format!("{}: {}", status, text)));
        }

        // The API answers with a javascript content type, so parse by hand
        let raw = response.text().await?;
        let body: Value =
            serde_json::from_str(&raw).map_err(|e| ProviderError::Parse(e.to_string()))?;

        let results = parse_instant_answer(&body, self.max_results);
        if results.is_empty() {
            return Err(ProviderError::NotFound(format!("no results for '{text}'")));
        }
        Ok(results)
    }

    fn name(&self) -> &str {
        "duckduckgo"
    }
}
