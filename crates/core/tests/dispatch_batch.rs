#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
//! Concurrent batch dispatch: ordering, isolation and timeouts.

use async_trait::async_trait;
use nio_core::*;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Pretends to be the desktop. Targets steer its behavior:
/// `slow-<ms>` sleeps, `broken` fails, `explode` panics.
#[derive(Default)]
struct FakeDesktop {
    completed: Mutex<Vec<String>>,
}

#[async_trait]
impl Strategy<Action> for FakeDesktop {
    fn name(&self) -> &str {
        "fake-desktop"
    }

    async fn attempt(&self, action: &Action) -> Result<Value, StrategyError> {
        let target = action.argument.as_str();
        if let Some(ms) = target.strip_prefix("slow-") {
            let ms: u64 = ms.parse().unwrap();
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
        if target == "explode" {
            panic!("desktop crashed");
        }
        if target == "broken" {
            return Err(StrategyError::Failed("could not open broken".to_string()));
        }
        self.completed.lock().push(action.source_line.clone());
        Ok(json!({ "verb": action.verb, "target": target }))
    }
}

fn engine(desktop: Arc<FakeDesktop>, options: DispatchOptions) -> (DispatchEngine, Arc<Metrics>) {
    let metrics = Metrics::new();
    let chain = FallbackChain::new(CapabilityName::Automation, vec![desktop as Arc<dyn Strategy<Action>>])
        .unwrap()
        .with_metrics(metrics.clone());
    let engine = DispatchEngine::new(Arc::new(chain), options, metrics.clone()).unwrap();
    (engine, metrics)
}

#[tokio::test]
async fn test_mixed_batch_keeps_input_order() {
    let (engine, _) = engine(Arc::new(FakeDesktop::default()), DispatchOptions::default());

    let outcome = engine
        .dispatch_batch(&["open Chrome", "bogus command", "close Chrome"])
        .await;

    assert_eq!(outcome.len(), 3);
    let lines: Vec<&str> = outcome.iter().map(|e| e.source_line.as_str()).collect();
    assert_eq!(lines, vec!["open Chrome", "bogus command", "close Chrome"]);

    assert!(outcome.entries[0].outcome.success);
    assert!(!outcome.entries[1].outcome.success);
    assert_eq!(outcome.entries[1].outcome.error.as_deref(), Some("no handler for command"));
    assert!(outcome.entries[1].outcome.payload.is_none());
    assert!(outcome.entries[2].outcome.success);
    assert_eq!(
        outcome.entries[2].outcome.payload,
        Some(json!({ "verb": "close", "target": "Chrome" }))
    );
}

#[tokio::test]
async fn test_order_independent_of_completion() {
    let desktop = Arc::new(FakeDesktop::default());
    let (engine, _) = engine(desktop.clone(), DispatchOptions::default());

    let lines = ["open slow-150", "open slow-1", "open slow-75"];
    let outcome = engine.dispatch_batch(&lines).await;

    let returned: Vec<&str> = outcome.iter().map(|e| e.source_line.as_str()).collect();
    assert_eq!(returned, lines);
    assert!(outcome.all_succeeded());

    let completed = desktop.completed.lock().clone();
    assert_eq!(completed, vec!["open slow-1", "open slow-75", "open slow-150"]);
}

#[tokio::test]
async fn test_one_failure_does_not_affect_others() {
    let (engine, metrics) = engine(Arc::new(FakeDesktop::default()), DispatchOptions::default());

    let lines = [
        "open one",
        "open two",
        "open broken",
        "play three",
        "google search four",
    ];
    let outcome = engine.dispatch_batch(&lines).await;

    assert_eq!(outcome.len(), 5);
    assert_eq!(outcome.failures(), 1);
    for (index, entry) in outcome.iter().enumerate() {
        assert_eq!(entry.outcome.success, index != 2, "line {}", entry.source_line);
    }
    assert!(outcome.entries[2]
        .outcome
        .error
        .as_deref()
        .unwrap()
        .contains("could not open broken"));

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.batches, 1);
    assert_eq!(snapshot.actions_dispatched, 5);
    assert_eq!(snapshot.action_failures, 1);
}

#[tokio::test]
async fn test_panicking_action_is_isolated() {
    let (engine, _) = engine(Arc::new(FakeDesktop::default()), DispatchOptions::default());

    let outcome = engine
        .dispatch_batch(&["open explode", "open fine"])
        .await;

    assert!(!outcome.entries[0].outcome.success);
    assert!(outcome.entries[1].outcome.success);
}

#[tokio::test]
async fn test_actions_run_concurrently() {
    let (engine, _) = engine(Arc::new(FakeDesktop::default()), DispatchOptions::default());

    let started = Instant::now();
    let outcome = engine
        .dispatch_batch(&["open slow-200", "open slow-200", "open slow-200", "open slow-200"])
        .await;

    assert!(outcome.all_succeeded());
    assert!(started.elapsed() < Duration::from_millis(700));
}

#[tokio::test]
async fn test_action_timeout_stops_waiting() {
    let options = DispatchOptions {
        max_concurrency: 4,
        action_timeout: Some(Duration::from_millis(50)),
    };
    let (engine, _) = engine(Arc::new(FakeDesktop::default()), options);

    let outcome = engine
        .dispatch_batch(&["open slow-2000", "open quick"])
        .await;

    assert!(!outcome.entries[0].outcome.success);
    assert!(outcome.entries[0]
        .outcome
        .error
        .as_deref()
        .unwrap()
        .contains("timed out"));
    assert!(outcome.entries[1].outcome.success);
}

#[tokio::test]
async fn test_empty_batch() {
    let (engine, _) = engine(Arc::new(FakeDesktop::default()), DispatchOptions::default());
    let outcome = engine.dispatch_batch::<&str>(&[]).await;
    assert!(outcome.is_empty());
    assert!(outcome.all_succeeded());
}

#[test]
fn test_zero_concurrency_rejected() {
    let chain = FallbackChain::new(
        CapabilityName::Automation,
        vec![Arc::new(FakeDesktop::default()) as Arc<dyn Strategy<Action>>],
    )
    .unwrap();
    let options = DispatchOptions {
        max_concurrency: 0,
        action_timeout: None,
    };
    let result = DispatchEngine::new(Arc::new(chain), options, Metrics::new());
    assert!(matches!(result, Err(RouterError::Configuration(_))));
}
