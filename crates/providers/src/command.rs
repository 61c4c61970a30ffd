//! Speech engines driven through local command-line tools.
//!
//! Templates are argv lists whose elements may contain `{text}`, `{output}`
//! and `{timeout}` placeholders, e.g. `["espeak-ng", "-w", "{output}", "{text}"]`.

use crate::traits::*;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::process::Command;
use tokio::time::{timeout, Duration};
use tracing::debug;

/// Substitutes `{key}` placeholders in every template element.
pub fn render_args(template: &[String], vars: &[(&str, &str)]) -> Vec<String> {
    template
        .iter()
        .map(|arg| {
            vars.iter().fold(arg.clone(), |acc, (key, value)| {
                acc.replace(&format!("{{{key}}}"), value)
            })
        })
        .collect()
}

/// Whether `program` resolves to a file on `PATH` (or is an existing path).
pub fn program_on_path(program: &str) -> bool {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return candidate.is_file();
    }
    std::env::var_os("PATH")
        .map(|paths| std::env::split_paths(&paths).any(|dir| dir.join(program).is_file()))
        .unwrap_or(false)
}

fn split_template(template: &[String]) -> Result<(&String, &[String]), ProviderError> {
    template
        .split_first()
        .ok_or_else(|| ProviderError::NotConfigured("empty command template".to_string()))
}

pub struct CommandSynthesizer {
    name: String,
    template: Vec<String>,
    output_dir: PathBuf,
    extension: String,
    available: bool,
    counter: AtomicU64,
}

impl CommandSynthesizer {
    pub fn new(name: String, template: Vec<String>, output_dir: PathBuf, extension: String) -> Self {
        let available = template
            .first()
            .map(|program| program_on_path(program))
            .unwrap_or(false);
        Self {
            name,
            template,
            output_dir,
            extension,
            available,
            counter: AtomicU64::new(0),
        }
    }

    fn next_output_path(&self) -> PathBuf {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        self.output_dir
            .join(format!("speech-{}-{n}.{}", std::process::id(), self.extension))
    }
}

#[async_trait]
impl SpeechSynthesizer for CommandSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<PathBuf, ProviderError> {
        if text.trim().is_empty() {
            return Err(ProviderError::InvalidArgument("text cannot be empty".to_string()));
        }

        tokio::fs::create_dir_all(&self.output_dir).await?;
        let output = self.next_output_path();
        let output_str = output.to_string_lossy().to_string();
        let (program, _) = split_template(&self.template)?;
        let args = render_args(&self.template[1..], &[("text", text), ("output", &output_str)]);

        debug!("Synthesizing speech with {}", program);
        let result = Command::new(program)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .await?;

        if !result.status.success() {
            return Err(ProviderError::Command(
                String::from_utf8_lossy(&result.stderr).to_string(),
            ));
        }
        if !output.exists() {
            return Err(ProviderError::Command(format!(
                "{} produced no audio file",
                program
            )));
        }
        Ok(output)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn available(&self) -> bool {
        self.available
    }
}

pub struct CommandRecognizer {
    name: String,
    template: Vec<String>,
    available: bool,
}

impl CommandRecognizer {
    pub fn new(name: String, template: Vec<String>) -> Self {
        let available = template
            .first()
            .map(|program| program_on_path(program))
            .unwrap_or(false);
        Self {
            name,
            template,
            available,
        }
    }
}

#[async_trait]
impl SpeechRecognizer for CommandRecognizer {
    async fn listen(&self, timeout_secs: u64) -> Result<String, ProviderError> {
        let (program, _) = split_template(&self.template)?;
        let secs = timeout_secs.to_string();
        let args = render_args(&self.template[1..], &[("timeout", &secs)]);

        let child = Command::new(program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let output = match timeout(Duration::from_secs(timeout_secs), child.wait_with_output()).await {
            Ok(output) => output?,
            Err(_) => return Err(ProviderError::Timeout(timeout_secs)),
        };

        if !output.status.success() {
            return Err(ProviderError::Command(
                String::from_utf8_lossy(&output.stderr).to_string(),
            ));
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if text.is_empty() {
            return Err(ProviderError::NotFound("no speech detected".to_string()));
        }
        Ok(text)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn available(&self) -> bool {
        self.available
    }
}
