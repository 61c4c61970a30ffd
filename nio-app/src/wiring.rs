//! Turns a `Config` into a ready `CapabilityRouter`.

use crate::config::{ChatEndpoint, Config, ImageBackend};
use anyhow::{bail, Context, Result};
use nio_core::strategies::*;
use nio_core::{AuditJournal, CapabilityRouter, DispatchOptions};
use nio_os::DesktopProvider;
use nio_providers::{
    ChatProvider, CommandRecognizer, CommandSynthesizer, DecisionModel, DuckDuckGoSearch,
    HuggingFaceImageProvider, ImageProvider, OpenAICompatibleProvider, OpenAIImageProvider,
    OsActionProvider, YouTubeLocator,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

fn api_key(env: &Option<String>) -> Option<String> {
    let var = env.as_deref()?;
    match std::env::var(var) {
        Ok(key) if !key.trim().is_empty() => Some(key),
        _ => {
            warn!("{} is not set", var);
            None
        }
    }
}

fn chat_provider(endpoint: &ChatEndpoint) -> Arc<dyn ChatProvider> {
    Arc::new(OpenAICompatibleProvider::new(
        endpoint.name.clone(),
        endpoint.base_url.clone(),
        api_key(&endpoint.api_key_env),
        endpoint.model.clone(),
    ))
}

fn image_provider(backend: &ImageBackend) -> Arc<dyn ImageProvider> {
    match backend {
        ImageBackend::Huggingface { model, api_key_env } => Arc::new(
            HuggingFaceImageProvider::new(model.clone(), api_key(api_key_env)),
        ),
        ImageBackend::Openai {
            base_url,
            model,
            api_key_env,
        } => Arc::new(OpenAIImageProvider::new(
            base_url.clone(),
            api_key(api_key_env),
            model.clone(),
        )),
    }
}

/// Registers every configured backend, in file order, and builds the router.
pub fn build_router(config: &Config) -> Result<CapabilityRouter> {
    config.validate()?;

    let persona = Persona {
        assistant_name: config.assistant_name.clone(),
        user_name: config.user_name.clone(),
    };
    let chats: Vec<Arc<dyn ChatProvider>> = config.chat.iter().map(chat_provider).collect();
    let Some(writer) = chats.first().cloned() else {
        bail!("at least one chat endpoint must be configured");
    };

    let mut builder = CapabilityRouter::builder()
        .default_listen_secs(config.listen_timeout_secs)
        .dispatch_options(DispatchOptions {
            max_concurrency: config.automation.max_concurrency,
            action_timeout: config.automation.action_timeout_secs.map(Duration::from_secs),
        });

    for chat in &chats {
        builder = builder.chat_strategy(Arc::new(ChatStrategy::new(chat.clone(), persona.clone())));
    }

    if let Some(endpoint) = &config.classifier {
        builder = builder.intent_model(Arc::new(DecisionModel::new(chat_provider(endpoint))));
    }

    let delay = Duration::from_millis(config.image_delay_ms);
    for backend in &config.image {
        let strategy = ImageStrategy::new(image_provider(backend), config.data_dir.clone()).with_delay(delay);
        builder = builder.image_strategy(Arc::new(strategy));
    }

    let speech_dir = config.data_dir.join("speech");
    for engine in &config.tts {
        let synthesizer = CommandSynthesizer::new(
            engine.name.clone(),
            engine.command.clone(),
            speech_dir.clone(),
            engine.extension.clone(),
        );
        builder = builder.tts_strategy(Arc::new(SynthesisStrategy::new(Arc::new(synthesizer))));
    }

    for engine in &config.stt {
        let recognizer = CommandRecognizer::new(engine.name.clone(), engine.command.clone());
        builder = builder.stt_strategy(Arc::new(RecognitionStrategy::new(Arc::new(recognizer))));
    }

    let search = Arc::new(DuckDuckGoSearch::new(config.search.max_results));
    if config.search.summarize {
        builder = builder.search_strategy(Arc::new(AnsweredSearch::new(
            search.clone(),
            writer.clone(),
            persona.clone(),
        )));
    }
    builder = builder.search_strategy(Arc::new(DigestSearch::new(search)));

    let desktop: Arc<dyn OsActionProvider> = Arc::new(DesktopProvider::new());
    let actions = DesktopActions::new(
        desktop.clone(),
        writer,
        Arc::new(YouTubeLocator::new()),
        config.data_dir.clone(),
    )
    .with_protected_apps(config.automation.protected_apps.clone());
    builder = builder
        .automation_strategy(Arc::new(actions))
        .automation_strategy(Arc::new(WebFallback::new(desktop)));

    if let Some(path) = &config.audit_log {
        let journal = AuditJournal::new(path)
            .with_context(|| format!("Failed to open audit journal {}", path.display()))?;
        info!("Audit journal at {}", path.display());
        builder = builder.journal(Arc::new(journal));
    }

    let router = builder.build().context("Failed to build capability router")?;
    Ok(router)
}
