use crate::traits::*;
use async_trait::async_trait;
use base64::Engine;
use reqwest::{Client, StatusCode};
use serde_json::json;
use std::time::Duration;

/// `/images/generations` on an OpenAI-compatible endpoint.
pub struct OpenAIImageProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl OpenAIImageProvider {
    pub fn new(base_url: String, api_key: Option<String>, model: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url,
            api_key,
            model,
        }
    }
}

pub(crate) fn decode_image_response(json: &serde_json::Value) -> Result<Vec<u8>, ProviderError> {
    let encoded = json["data"]
        .get(0)
        .and_then(|entry| entry["b64_json"].as_str())
        .ok_or_else(|| ProviderError::Parse("No b64_json image in response".to_string()))?;

    base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| ProviderError::Parse(e.to_string()))
}

#[async_trait]
impl ImageProvider for OpenAIImageProvider {
    async fn synthesize(&self, prompt: &str) -> Result<Vec<u8>, ProviderError> {
        let url = format!("{}/images/generations", self.base_url.trim_end_matches('/'));
        let body = json!({
            "model": self.model,
            "prompt": prompt,
            "n": 1,
            "response_format": "b64_json",
        });

        let mut request = self.client.post(&url).json(&body);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await?;
        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let text = response.text().await.unwrap_or_default();
            return Err(ProviderError::RateLimited(text));
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api(format!("{}: {}", status, text)));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        decode_image_response(&json)
    }

    fn name(&self) -> &str {
        "openai-images"
    }
}
