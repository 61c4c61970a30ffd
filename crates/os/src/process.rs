//! Process management - find and terminate processes by name.

use crate::{OsError, OsResult};
use sysinfo::System;
use tokio::task;

#[derive(Debug, Clone, serde::Serialize)]
pub struct ProcessInfo {
    pub pid: u32,
    pub name: String,
}

/// Case-insensitive match: the whole target, the target with spaces removed,
/// or any single word of it may name the process, so "Google Chrome"
/// matches a `chrome` process.
pub fn name_matches(process_name: &str, target: &str) -> bool {
    let process = process_name.to_lowercase();
    let process = process.trim_end_matches(".exe");
    let target = target.trim().to_lowercase();
    if process.is_empty() || target.is_empty() {
        return false;
    }

    let joined = target.replace(' ', "");
    if process == joined || process == target.replace(' ', "-") {
        return true;
    }
    if joined.len() >= 3 && process.contains(&joined) {
        return true;
    }
    target.split_whitespace().any(|word| word == process)
}

/// List running processes whose name matches `target`.
pub async fn find(target: &str) -> OsResult<Vec<ProcessInfo>> {
    let target = target.to_string();
    task::spawn_blocking(move || {
        let mut system = System::new();
        system.refresh_processes();

        let own_pid = std::process::id();
        Ok(system
            .processes()
            .iter()
            .filter(|(pid, process)| pid.as_u32() != own_pid && name_matches(process.name(), &target))
            .map(|(pid, process)| ProcessInfo {
                pid: pid.as_u32(),
                name: process.name().to_string(),
            })
            .collect())
    })
    .await
    .map_err(|e| OsError::OperationFailed(e.to_string()))?
}

/// Terminate every process matching `target`; returns how many were killed.
pub async fn kill_by_name(target: &str) -> OsResult<usize> {
    if target.trim().is_empty() {
        return Err(OsError::InvalidArgument("name cannot be empty".to_string()));
    }

    let target = target.trim().to_string();
    task::spawn_blocking(move || {
        let mut system = System::new();
        system.refresh_processes();

        let own_pid = std::process::id();
        let killed = system
            .processes()
            .iter()
            .filter(|(pid, process)| pid.as_u32() != own_pid && name_matches(process.name(), &target))
            .filter(|(_, process)| process.kill())
            .count();

        if killed == 0 {
            return Err(OsError::NotFound(format!("no running process matches '{target}'")));
        }
        Ok(killed)
    })
    .await
    .map_err(|e| OsError::OperationFailed(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_matches() {
        assert!(name_matches("chrome", "Google Chrome"));
        assert!(name_matches("google-chrome", "Google Chrome"));
        assert!(name_matches("google-chrome", "chrome"));
        assert!(name_matches("Telegram", "telegram"));
        assert!(name_matches("notepad.exe", "notepad"));
        assert!(!name_matches("bash", "telegram"));
        assert!(!name_matches("sh", "brush"));
        assert!(!name_matches("bash", " "));
    }

    #[tokio::test]
    async fn test_kill_unknown_process() {
        let result = kill_by_name("no-such-process-name-xyz").await;
        assert!(matches!(result, Err(OsError::NotFound(_))));
    }
}
