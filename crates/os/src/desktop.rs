//! Desktop operations - launching apps and opening URLs or files.

use crate::{OsError, OsResult};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

pub(crate) fn validate_name(name: &str) -> OsResult<()> {
    if name.trim().is_empty() {
        return Err(OsError::InvalidArgument("target cannot be empty".to_string()));
    }
    if name.chars().any(|ch| ch.is_control()) {
        return Err(OsError::InvalidArgument(
            "target contains control characters".to_string(),
        ));
    }
    Ok(())
}

pub fn is_url(target: &str) -> bool {
    let lower = target.trim().to_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Open a URL or file with the desktop's default handler.
pub fn open_with_handler(target: &str) -> OsResult<()> {
    validate_name(target)?;
    open::that_detached(target.trim()).map_err(OsError::Io)
}

/// Launch an app by program name. Multi-word names ("google chrome") are
/// also tried hyphenated ("google-chrome").
pub async fn launch_app(app: &str) -> OsResult<u32> {
    validate_name(app)?;
    let trimmed = app.trim();

    let mut candidates = vec![trimmed.to_string()];
    if trimmed.contains(' ') {
        candidates.push(trimmed.to_lowercase().replace(' ', "-"));
    }
    let lower = trimmed.to_lowercase();
    if lower != trimmed && !candidates.contains(&lower) {
        candidates.push(lower);
    }

    let mut last_err = None;
    for program in &candidates {
        match Command::new(program)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(child) => return Ok(child.id().unwrap_or_default()),
            Err(e) => {
                debug!("Launching {} failed: {}", program, e);
                last_err = Some(e);
            }
        }
    }

    Err(last_err
        .map(OsError::Io)
        .unwrap_or_else(|| OsError::NotFound(format!("no program named {trimmed}"))))
}

/// Open whatever `target` names: URLs and existing paths go to the default
/// handler; anything else is launched as an app, falling back to the handler.
pub async fn open_target(target: &str) -> OsResult<()> {
    validate_name(target)?;
    let trimmed = target.trim();

    if is_url(trimmed) || Path::new(trimmed).exists() {
        return open_with_handler(trimmed);
    }

    match launch_app(trimmed).await {
        Ok(pid) => {
            debug!("Launched {} (pid {})", trimmed, pid);
            Ok(())
        }
        Err(launch_err) => open_with_handler(trimmed).map_err(|handler_err| {
            OsError::OperationFailed(format!(
                "could not open {trimmed}: {launch_err}; {handler_err}"
            ))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com"));
        assert!(is_url("HTTP://example.com"));
        assert!(!is_url("chrome"));
        assert!(!is_url("ftp://example.com"));
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Google Chrome").is_ok());
        assert!(validate_name("  ").is_err());
        assert!(validate_name("bad\nname").is_err());
    }

    #[tokio::test]
    async fn test_launch_missing_app_fails() {
        let result = launch_app("definitely-not-an-installed-app").await;
        assert!(result.is_err());
    }
}
