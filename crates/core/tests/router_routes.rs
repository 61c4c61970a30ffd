#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
//! End-to-end routing through real strategies backed by in-memory providers.

mod common;

use common::*;
use nio_core::strategies::*;
use nio_core::*;
use nio_providers::{IntentModel, VolumeDirective};
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

struct Fixture {
    router: CapabilityRouter,
    chat: Arc<FakeChat>,
    desktop: Arc<FakeDesktop>,
    dir: TempDir,
}

fn fixture(intent: Option<Arc<dyn IntentModel>>) -> Fixture {
    let dir = TempDir::new().unwrap();
    let chat = Arc::new(FakeChat::answering("fake-chat", "Paris.\n\nIt is in France."));
    let desktop = Arc::new(FakeDesktop::default());
    let search = Arc::new(FakeSearch::with_hit("Weather", "Sunny all day"));
    let persona = Persona::default();

    let mut builder = CapabilityRouter::builder()
        .chat_strategy(Arc::new(ChatStrategy::new(chat.clone(), persona.clone())))
        .image_strategy(Arc::new(ImageStrategy::new(
            Arc::new(FakeImages { bytes: vec![1, 2, 3] }),
            dir.path().join("images"),
        )))
        .tts_strategy(Arc::new(SynthesisStrategy::new(Arc::new(FakeVoice {
            output: dir.path().join("speech.mp3"),
            spoken: Default::default(),
        }))))
        .stt_strategy(Arc::new(RecognitionStrategy::new(Arc::new(FakeEars {
            heard: "what time is it".to_string(),
            installed: false,
        }))))
        .search_strategy(Arc::new(AnsweredSearch::new(search.clone(), chat.clone(), persona)))
        .search_strategy(Arc::new(DigestSearch::new(search)))
        .automation_strategy(Arc::new(DesktopActions::new(
            desktop.clone(),
            chat.clone(),
            Arc::new(FakeMedia { url: None }),
            dir.path().join("content"),
        )))
        .automation_strategy(Arc::new(WebFallback::new(desktop.clone())));
    if let Some(model) = intent {
        builder = builder.intent_model(model);
    }

    Fixture {
        router: builder.build().unwrap(),
        chat,
        desktop,
        dir,
    }
}

#[tokio::test]
async fn test_plain_question_goes_to_chat() {
    let f = fixture(None);
    let envelope = f.router.route("what is the capital of France").await;
    assert!(envelope.success);
    assert_eq!(envelope.payload, Some(json!("Paris.\nIt is in France.")));
}

#[tokio::test]
async fn test_image_request_writes_one_file() {
    let f = fixture(None);
    let envelope = f.router.route("generate image of a cat").await;
    assert!(envelope.success);

    let paths = envelope.payload.unwrap();
    let paths = paths.as_array().unwrap();
    assert_eq!(paths.len(), 1);
    let path = paths[0].as_str().unwrap();
    assert!(path.ends_with("generate_image_of_a_cat_1.png"));
    assert_eq!(std::fs::read(path).unwrap(), vec![1, 2, 3]);
    assert!(path.starts_with(f.dir.path().to_str().unwrap()));
}

#[tokio::test]
async fn test_automation_text_is_split_into_commands() {
    let f = fixture(None);
    let envelope = f.router.route("Open notepad, close notepad").await;

    assert!(envelope.success, "{:?}", envelope.error);
    let batch: BatchOutcome = serde_json::from_value(envelope.payload.unwrap()).unwrap();
    assert_eq!(batch.len(), 2);
    assert_eq!(batch.entries[0].source_line, "open notepad");
    assert_eq!(batch.entries[1].source_line, "close notepad");
    assert_eq!(f.desktop.opened.lock().clone(), vec!["notepad"]);
    assert_eq!(f.desktop.closed.lock().clone(), vec!["notepad"]);
}

#[tokio::test]
async fn test_partial_batch_failure_fails_route() {
    let f = fixture(None);
    let envelope = f.router.route("open notepad, dance wildly").await;

    assert!(!envelope.success);
    assert!(envelope.payload.is_none());
    let error = envelope.error.unwrap();
    assert!(error.contains("1 of 2"));
    assert!(error.contains("dance wildly: no handler for command"));
    assert_eq!(f.desktop.opened.lock().clone(), vec!["notepad"]);
}

#[tokio::test]
async fn test_protected_app_is_never_closed() {
    let f = fixture(None);
    let outcome = f.router.dispatch_batch(&["close Google Chrome"]).await;
    assert!(outcome.all_succeeded());
    assert!(f.desktop.closed.lock().is_empty());
}

#[tokio::test]
async fn test_missing_app_falls_back_to_web_search() {
    let f = fixture(None);
    let outcome = f.router.dispatch_batch(&["open missing-app"]).await;
    assert!(outcome.all_succeeded());
    assert_eq!(
        f.desktop.opened.lock().clone(),
        vec!["https://www.google.com/search?q=missing-app"]
    );
}

#[tokio::test]
async fn test_model_labels_take_precedence() {
    let model = Arc::new(FakeIntent {
        labels: Some(vec!["realtime weather in paris".to_string()]),
    });
    let f = fixture(Some(model));

    // "tell me" would send this to speech synthesis on keywords alone.
    let envelope = f.router.route("tell me the weather in paris").await;
    assert!(envelope.success);
    let payload = envelope.payload.unwrap();
    assert_eq!(payload["answer"], "Paris.\nIt is in France.");
    assert_eq!(payload["results"][0]["title"], "Weather");
    assert_eq!(f.router.metrics().model_classifications, 1);
}

#[tokio::test]
async fn test_failing_model_falls_back_to_keywords() {
    let f = fixture(Some(Arc::new(FakeIntent { labels: None })));
    assert_eq!(f.router.classify("please open chrome").await, CapabilityName::Automation);
    assert_eq!(f.router.classify("say hello").await, CapabilityName::Tts);
    assert_eq!(f.router.metrics().keyword_classifications, 2);
}

#[tokio::test]
async fn test_blank_text_is_chat() {
    let f = fixture(Some(Arc::new(FakeIntent {
        labels: Some(vec!["open chrome".to_string()]),
    })));
    assert_eq!(f.router.classify("   ").await, CapabilityName::Chat);
}

#[tokio::test]
async fn test_direct_capability_calls() {
    let f = fixture(None);

    let heard = f.router.stt(5).await;
    assert_eq!(heard.payload, Some(json!("What time is it.")));

    let spoken = f.router.tts("Hello there").await;
    assert!(spoken.success);
    assert!(spoken.payload.unwrap().as_str().unwrap().ends_with("speech.mp3"));

    let two = f.router.image("two dogs", 2).await;
    assert_eq!(two.payload.unwrap().as_array().unwrap().len(), 2);

    let unrecognized = f.router.automation(&parse("wave hands")).await;
    assert_eq!(unrecognized.error.as_deref(), Some(NO_HANDLER));

    let volume = f.router.automation(&parse("system volume up")).await;
    assert!(volume.success);
    assert_eq!(f.desktop.volume.lock().clone(), vec![VolumeDirective::Up]);
}

#[tokio::test]
async fn test_status_reports_construction_time_availability() {
    let f = fixture(None);
    let status = f.router.status();
    assert_eq!(status.len(), 6);
    assert_eq!(status[&CapabilityName::Stt], false);
    assert!(status[&CapabilityName::Chat]);
    assert!(status[&CapabilityName::Automation]);
    assert_eq!(f.chat.calls(), 0);
}

#[test]
fn test_missing_capability_fails_build() {
    let chat = Arc::new(FakeChat::answering("fake-chat", "hi"));
    let result = CapabilityRouter::builder()
        .chat_strategy(Arc::new(ChatStrategy::new(chat, Persona::default())))
        .build();
    match result {
        Err(RouterError::Configuration(msg)) => assert!(msg.contains("image")),
        _ => panic!("router built without image strategies"),
    }
}
