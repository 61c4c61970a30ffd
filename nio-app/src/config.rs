use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_CONFIG_PATH: &str = "nio.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_dir: PathBuf,
    pub log_level: String,
    pub audit_log: Option<PathBuf>,
    pub assistant_name: String,
    pub user_name: String,
    pub chat: Vec<ChatEndpoint>,
    pub classifier: Option<ChatEndpoint>,
    pub image: Vec<ImageBackend>,
    pub image_delay_ms: u64,
    pub tts: Vec<SpeechCommand>,
    pub stt: Vec<ListenCommand>,
    pub listen_timeout_secs: u64,
    pub search: SearchConfig,
    pub automation: AutomationConfig,
}

/// An OpenAI-compatible chat completions endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatEndpoint {
    pub name: String,
    pub base_url: String,
    pub model: String,
    #[serde(default)]
    pub api_key_env: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ImageBackend {
    Huggingface {
        model: String,
        #[serde(default)]
        api_key_env: Option<String>,
    },
    Openai {
        base_url: String,
        model: String,
        #[serde(default)]
        api_key_env: Option<String>,
    },
}

/// Speech synthesis command. `{text}` and `{output}` are substituted per
/// argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechCommand {
    pub name: String,
    pub command: Vec<String>,
    #[serde(default = "default_audio_extension")]
    pub extension: String,
}

/// Speech recognition command printing the transcript on stdout.
/// `{timeout}` is substituted with the listen timeout in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListenCommand {
    pub name: String,
    pub command: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub max_results: usize,
    /// Ask a chat model to answer from the results before falling back to
    /// the raw digest.
    pub summarize: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutomationConfig {
    pub protected_apps: Vec<String>,
    pub action_timeout_secs: Option<u64>,
    pub max_concurrency: usize,
}

fn default_audio_extension() -> String {
    "mp3".to_string()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            log_level: "info".to_string(),
            audit_log: Some(PathBuf::from("data/audit.jsonl")),
            assistant_name: "Nio".to_string(),
            user_name: "User".to_string(),
            chat: vec![ChatEndpoint {
                name: "groq".to_string(),
                base_url: "https://api.groq.com/openai/v1".to_string(),
                model: "llama3-70b-8192".to_string(),
                api_key_env: Some("GROQ_API_KEY".to_string()),
            }],
            classifier: None,
            image: vec![ImageBackend::Huggingface {
                model: "stabilityai/stable-diffusion-xl-base-1.0".to_string(),
                api_key_env: Some("HUGGINGFACE_API_KEY".to_string()),
            }],
            image_delay_ms: 1000,
            tts: vec![
                SpeechCommand {
                    name: "edge-tts".to_string(),
                    command: strings(&["edge-tts", "--text", "{text}", "--write-media", "{output}"]),
                    extension: "mp3".to_string(),
                },
                SpeechCommand {
                    name: "espeak-ng".to_string(),
                    command: strings(&["espeak-ng", "-w", "{output}", "{text}"]),
                    extension: "wav".to_string(),
                },
            ],
            stt: vec![ListenCommand {
                name: "nio-listen".to_string(),
                command: strings(&["nio-listen", "--timeout", "{timeout}"]),
            }],
            listen_timeout_secs: nio_core::DEFAULT_LISTEN_SECS,
            search: SearchConfig::default(),
            automation: AutomationConfig::default(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: 5,
            summarize: true,
        }
    }
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            protected_apps: vec!["chrome".to_string()],
            action_timeout_secs: None,
            max_concurrency: 8,
        }
    }
}

impl Config {
    /// Reads the YAML file at `path`. A missing file yields the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write {}", path.as_ref().display()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        for endpoint in self.chat.iter().chain(self.classifier.iter()) {
            validate_endpoint(endpoint)?;
        }
        for backend in &self.image {
            match backend {
                ImageBackend::Huggingface { model, .. } => {
                    if model.trim().is_empty() {
                        bail!("huggingface image backend has an empty model");
                    }
                }
                ImageBackend::Openai { base_url, model, .. } => {
                    if base_url.trim().is_empty() {
                        bail!("openai image backend has an empty base_url");
                    }
                    if model.trim().is_empty() {
                        bail!("openai image backend has an empty model");
                    }
                }
            }
        }
        for engine in &self.tts {
            if engine.command.is_empty() {
                bail!("tts engine '{}' has an empty command", engine.name);
            }
        }
        for engine in &self.stt {
            if engine.command.is_empty() {
                bail!("stt engine '{}' has an empty command", engine.name);
            }
        }
        if self.search.max_results == 0 {
            bail!("search.max_results must be at least 1");
        }
        if self.automation.max_concurrency == 0 {
            bail!("automation.max_concurrency must be at least 1");
        }
        Ok(())
    }
}

fn validate_endpoint(endpoint: &ChatEndpoint) -> Result<()> {
    if endpoint.base_url.trim().is_empty() {
        bail!("chat endpoint '{}' has an empty base_url", endpoint.name);
    }
    if endpoint.model.trim().is_empty() {
        bail!("chat endpoint '{}' has an empty model", endpoint.name);
    }
    Ok(())
}
