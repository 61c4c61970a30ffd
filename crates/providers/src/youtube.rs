use crate::traits::*;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

const RESULTS_URL: &str = "https://www.youtube.com/results";

/// Finds the first video on the YouTube results page for a query.
pub struct YouTubeLocator {
    client: Client,
}

impl YouTubeLocator {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent(
                "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36",
            )
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client }
    }
}

impl Default for YouTubeLocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Extracts the first 11-character video id embedded in a results page.
pub fn first_video_id(html: &str) -> Option<&str> {
    const MARKER: &str = "\"videoId\":\"";
    let mut rest = html;
    while let Some(pos) = rest.find(MARKER) {
        let tail = &rest[pos + MARKER.len()..];
        let end = tail.find('"')?;
        let id = &tail[..end];
        if id.len() == 11
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Some(id);
        }
        rest = &tail[end..];
    }
    None
}

#[async_trait]
impl MediaLocator for YouTubeLocator {
    async fn locate(&self, query: &str) -> Result<String, ProviderError> {
        let response = self
            .client
            .get(RESULTS_URL)
            .query(&[("search_query", query)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Api(response.status().to_string()));
        }

        let html = response.text().await?;
        first_video_id(&html)
            .map(|id| format!("https://www.youtube.com/watch?v={id}"))
            .ok_or_else(|| ProviderError::NotFound(format!("no video found for '{query}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_video_id() {
        let html = r#"{"videoId":"bad"},{"videoId":"dQw4w9WgXcQ","title":"x"},{"videoId":"aaaaaaaaaaa"}"#;
        assert_eq!(first_video_id(html), Some("dQw4w9WgXcQ"));
    }

    #[test]
    fn test_no_video_id() {
        assert_eq!(first_video_id("<html>nothing here</html>"), None);
    }
}
