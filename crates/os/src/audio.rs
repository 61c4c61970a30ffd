//! Volume control through whichever mixer CLI is installed.

use crate::{OsError, OsResult};
use nio_providers::VolumeDirective;
use tokio::process::Command;
use tracing::debug;

const VOLUME_STEP: u8 = 5;

async fn command_exists(command: &str) -> bool {
    Command::new("which")
        .arg(command)
        .output()
        .await
        .map(|output| output.status.success())
        .unwrap_or(false)
}

async fn run_checked(command: &str, args: &[String]) -> OsResult<()> {
    let output = Command::new(command).args(args).output().await?;
    if output.status.success() {
        return Ok(());
    }
    Err(OsError::OperationFailed(
        String::from_utf8_lossy(&output.stderr).to_string(),
    ))
}

fn owned(args: &[&str]) -> Vec<String> {
    args.iter().map(|arg| arg.to_string()).collect()
}

/// Mixer backends in preference order.
pub const BACKENDS: [&str; 3] = ["wpctl", "pactl", "amixer"];

/// Arguments for `backend` to apply `directive`.
pub fn mixer_args(backend: &str, directive: VolumeDirective) -> Option<Vec<String>> {
    let step = VOLUME_STEP;
    let args: Vec<String> = match (backend, directive) {
        ("wpctl", VolumeDirective::Mute) => owned(&["set-mute", "@DEFAULT_AUDIO_SINK@", "1"]),
        ("wpctl", VolumeDirective::Unmute) => owned(&["set-mute", "@DEFAULT_AUDIO_SINK@", "0"]),
        ("wpctl", VolumeDirective::Up) => vec![
            "set-volume".to_string(),
            "@DEFAULT_AUDIO_SINK@".to_string(),
            format!("{step}%+"),
        ],
        ("wpctl", VolumeDirective::Down) => vec![
            "set-volume".to_string(),
            "@DEFAULT_AUDIO_SINK@".to_string(),
            format!("{step}%-"),
        ],
        ("pactl", VolumeDirective::Mute) => owned(&["set-sink-mute", "@DEFAULT_SINK@", "1"]),
        ("pactl", VolumeDirective::Unmute) => owned(&["set-sink-mute", "@DEFAULT_SINK@", "0"]),
        ("pactl", VolumeDirective::Up) => vec![
            "set-sink-volume".to_string(),
            "@DEFAULT_SINK@".to_string(),
            format!("+{step}%"),
        ],
        ("pactl", VolumeDirective::Down) => vec![
            "set-sink-volume".to_string(),
            "@DEFAULT_SINK@".to_string(),
            format!("-{step}%"),
        ],
        ("amixer", VolumeDirective::Mute) => owned(&["set", "Master", "mute"]),
        ("amixer", VolumeDirective::Unmute) => owned(&["set", "Master", "unmute"]),
        ("amixer", VolumeDirective::Up) => {
            vec!["set".to_string(), "Master".to_string(), format!("{step}%+")]
        }
        ("amixer", VolumeDirective::Down) => {
            vec!["set".to_string(), "Master".to_string(), format!("{step}%-")]
        }
        _ => return None,
    };
    Some(args)
}

/// Apply a volume directive with the first installed mixer.
pub async fn set_volume(directive: VolumeDirective) -> OsResult<()> {
    for backend in BACKENDS {
        if !command_exists(backend).await {
            continue;
        }
        if let Some(args) = mixer_args(backend, directive) {
            debug!("Applying '{}' with {}", directive, backend);
            return run_checked(backend, &args).await;
        }
    }
    Err(OsError::OperationFailed(
        "No mixer backend found (install 'wpctl', 'pactl' or 'amixer')".to_string(),
    ))
}
