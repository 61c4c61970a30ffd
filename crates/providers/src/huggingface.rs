use crate::traits::*;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::json;
use std::time::Duration;

const INFERENCE_URL: &str = "https://api-inference.huggingface.co/models";

/// Text-to-image through the Hugging Face inference API.
pub struct HuggingFaceImageProvider {
    client: Client,
    model: String,
    api_key: Option<String>,
    base_url: String,
}

impl HuggingFaceImageProvider {
    pub fn new(model: String, api_key: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            model,
            api_key,
            base_url: INFERENCE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }
}

#[async_trait]
impl ImageProvider for HuggingFaceImageProvider {
    async fn synthesize(&self, prompt: &str) -> Result<Vec<u8>, ProviderError> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| ProviderError::NotConfigured("missing Hugging Face API key".into()))?;

        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), self.model);
        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&json!({ "inputs": prompt }))
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                let bytes = response.bytes().await?;
                Ok(bytes.to_vec())
            }
            // Model still loading on the inference side
            StatusCode::TOO_MANY_REQUESTS | StatusCode::SERVICE_UNAVAILABLE => {
                let text = response.text().await.unwrap_or_default();
                Err(ProviderError::RateLimited(text))
            }
            status => {
                let text = response.text().await.unwrap_or_default();
                Err(ProviderError::Api(format!("{}: {}", status, text)))
            }
        }
    }

    fn name(&self) -> &str {
        "huggingface"
    }
}
