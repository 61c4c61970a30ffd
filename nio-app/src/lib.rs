pub mod config;
pub mod repl;
pub mod wiring;

use serde::Serialize;

/// Pretty JSON for terminal output.
pub fn render<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!("{{\"success\": false, \"error\": \"render failed: {e}\"}}"))
}
