use crate::{audio, desktop, process};
use async_trait::async_trait;
use nio_providers::{OsActionProvider, ProviderError, VolumeDirective};
use tracing::info;

/// `OsActionProvider` backed by the local desktop session.
pub struct DesktopProvider;

impl DesktopProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DesktopProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OsActionProvider for DesktopProvider {
    async fn open_target(&self, name_or_url: &str) -> Result<(), ProviderError> {
        desktop::open_target(name_or_url).await?;
        info!("Opened {}", name_or_url);
        Ok(())
    }

    async fn close_target(&self, name: &str) -> Result<(), ProviderError> {
        let killed = process::kill_by_name(name).await?;
        info!("Closed {} process(es) matching {}", killed, name);
        Ok(())
    }

    async fn set_volume(&self, directive: VolumeDirective) -> Result<(), ProviderError> {
        audio::set_volume(directive).await?;
        Ok(())
    }

    fn name(&self) -> &str {
        "desktop"
    }
}
