use super::clip_stem;
use crate::chain::CapabilityRequest;
use crate::error::StrategyError;
use crate::strategy::Strategy;
use async_trait::async_trait;
use nio_providers::ImageProvider;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRequest {
    pub prompt: String,
    pub count: u32,
}

impl ImageRequest {
    pub fn new(prompt: impl Into<String>, count: u32) -> Self {
        Self {
            prompt: prompt.into(),
            count: count.max(1),
        }
    }
}

impl CapabilityRequest for ImageRequest {
    fn summary(&self) -> String {
        format!("{} (x{})", self.prompt, self.count)
    }
}

/// `<prompt with spaces as underscores>_<index>.png`. Path separators are
/// flattened too so a prompt can never leave the output directory. Long
/// prompts are clipped to `MAX_STEM_BYTES`.
pub fn image_file_name(prompt: &str, index: u32) -> String {
    let stem: String = prompt
        .trim()
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            other => other,
        })
        .collect();
    format!("{}_{index}.png", clip_stem(&stem))
}

pub struct ImageStrategy {
    provider: Arc<dyn ImageProvider>,
    output_dir: PathBuf,
    delay: Duration,
}

impl ImageStrategy {
    pub fn new(provider: Arc<dyn ImageProvider>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            provider,
            output_dir: output_dir.into(),
            delay: Duration::ZERO,
        }
    }

    /// Pause between consecutive generations of one request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    async fn discard(paths: &[PathBuf]) {
        for path in paths {
            if let Err(e) = tokio::fs::remove_file(path).await {
                warn!("Could not remove partial image {}: {}", path.display(), e);
            }
        }
    }

    async fn generate(&self, request: &ImageRequest, written: &mut Vec<PathBuf>) -> Result<(), StrategyError> {
        let count = request.count.max(1);
        for index in 1..=count {
            if index > 1 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            let bytes = self.provider.synthesize(&request.prompt).await?;
            if bytes.is_empty() {
                return Err(StrategyError::Failed(format!(
                    "{} returned an empty image",
                    self.provider.name()
                )));
            }
            let path = self.output_dir.join(image_file_name(&request.prompt, index));
            tokio::fs::write(&path, &bytes).await?;
            written.push(path);
        }
        Ok(())
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

#[async_trait]
impl Strategy<ImageRequest> for ImageStrategy {
    fn name(&self) -> &str {
        self.provider.name()
    }

    async fn attempt(&self, request: &ImageRequest) -> Result<Value, StrategyError> {
        if request.prompt.trim().is_empty() {
            return Err(StrategyError::Failed("empty image prompt".to_string()));
        }
        tokio::fs::create_dir_all(&self.output_dir).await?;

        let mut written = Vec::new();
        if let Err(e) = self.generate(request, &mut written).await {
            Self::discard(&written).await;
            return Err(e);
        }

        info!("Generated {} image(s) for '{}'", written.len(), request.prompt);
        Ok(Value::Array(
            written
                .iter()
                .map(|p| Value::String(p.display().to_string()))
                .collect(),
        ))
    }
}
