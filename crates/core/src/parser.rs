//! Automation command parsing: one raw line in, one typed `Action` out.

use crate::chain::CapabilityRequest;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verb {
    Open,
    Close,
    Content,
    GoogleSearch,
    YouTubeSearch,
    Play,
    System,
    Unrecognized,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub verb: Verb,
    pub argument: String,
    pub source_line: String,
}

impl Action {
    pub fn is_recognized(&self) -> bool {
        self.verb != Verb::Unrecognized
    }
}

impl CapabilityRequest for Action {
    fn summary(&self) -> String {
        self.source_line.clone()
    }
}

/// Verb prefixes in match priority. Matching is case-sensitive.
const PREFIXES: [(&str, Verb); 7] = [
    ("open ", Verb::Open),
    ("content ", Verb::Content),
    ("google search ", Verb::GoogleSearch),
    ("youtube search ", Verb::YouTubeSearch),
    ("play ", Verb::Play),
    ("close ", Verb::Close),
    ("system ", Verb::System),
];

fn unrecognized(line: &str) -> Action {
    Action {
        verb: Verb::Unrecognized,
        argument: line.to_string(),
        source_line: line.to_string(),
    }
}

/// Classify one command line. Total: never fails, only classifies.
///
/// "open file" and anything mentioning "open it" refer to something already
/// on screen and are not treated as app launches.
pub fn parse(line: &str) -> Action {
    for (prefix, verb) in PREFIXES {
        let Some(rest) = line.strip_prefix(prefix) else {
            continue;
        };
        if verb == Verb::Open && (line == "open file" || line.contains("open it")) {
            return unrecognized(line);
        }
        return Action {
            verb,
            argument: rest.trim().to_string(),
            source_line: line.to_string(),
        };
    }
    unrecognized(line)
}
