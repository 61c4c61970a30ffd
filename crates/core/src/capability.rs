use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The request categories the router can serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityName {
    Chat,
    Image,
    Tts,
    Stt,
    Search,
    Automation,
}

impl CapabilityName {
    pub const ALL: [CapabilityName; 6] = [
        CapabilityName::Chat,
        CapabilityName::Image,
        CapabilityName::Tts,
        CapabilityName::Stt,
        CapabilityName::Search,
        CapabilityName::Automation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CapabilityName::Chat => "chat",
            CapabilityName::Image => "image",
            CapabilityName::Tts => "tts",
            CapabilityName::Stt => "stt",
            CapabilityName::Search => "search",
            CapabilityName::Automation => "automation",
        }
    }
}

impl fmt::Display for CapabilityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CapabilityName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CapabilityName::ALL
            .into_iter()
            .find(|name| name.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown capability: {s}"))
    }
}
