use crate::error::RouterError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Uniform outcome of every capability call.
///
/// A failed envelope never carries a payload and always carries an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResultEnvelope {
    pub fn ok(payload: Value) -> Self {
        Self {
            success: true,
            payload: Some(payload),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        let error = error.into();
        Self {
            success: false,
            payload: None,
            error: Some(if error.is_empty() {
                "unknown failure".to_string()
            } else {
                error
            }),
        }
    }

    pub fn from_error(err: &RouterError) -> Self {
        Self::failure(err.to_string())
    }
}

/// One line of a dispatched batch and what became of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchEntry {
    pub source_line: String,
    pub outcome: ResultEnvelope,
}

/// Per-line outcomes of a batch, in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchOutcome {
    pub entries: Vec<BatchEntry>,
}

impl BatchOutcome {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn all_succeeded(&self) -> bool {
        self.entries.iter().all(|entry| entry.outcome.success)
    }

    pub fn failures(&self) -> usize {
        self.entries.iter().filter(|entry| !entry.outcome.success).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BatchEntry> {
        self.entries.iter()
    }
}
