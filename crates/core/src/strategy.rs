use crate::error::StrategyError;
use async_trait::async_trait;
use serde_json::Value;

/// One way of satisfying a capability request through one provider.
///
/// An attempt either succeeds with a payload or fails with a reason; it is
/// never partial. Failing must leave no global effect behind, since the
/// chain moves straight on to the next strategy.
#[async_trait]
pub trait Strategy<R: Sync>: Send + Sync {
    fn name(&self) -> &str;

    /// Construction-time diagnostic, not a liveness probe.
    fn available(&self) -> bool {
        true
    }

    async fn attempt(&self, request: &R) -> Result<Value, StrategyError>;
}
