use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::core::error::CheckError;

/// The closed set of platforms a handle can be checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Instagram,
    Youtube,
    X,
    Linkedin,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::Instagram,
        Platform::Youtube,
        Platform::X,
        Platform::Linkedin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::Youtube => "youtube",
            Platform::X => "x",
            Platform::Linkedin => "linkedin",
        }
    }

    /// Public profile URL template; `{handle}` is replaced by the canonical handle.
    pub fn url_template(&self) -> &'static str {
        match self {
            Platform::Instagram => "https://www.instagram.com/{handle}/",
            Platform::Youtube => "https://www.youtube.com/@{handle}",
            Platform::X => "https://x.com/{handle}",
            Platform::Linkedin => "https://www.linkedin.com/in/{handle}/",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = CheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| CheckError::UnknownPlatform(s.to_string()))
    }
}

/// A user-supplied name together with its URL-safe form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateName {
    pub raw: String,
    pub canonical: String,
}

impl CandidateName {
    pub fn is_degenerate(&self) -> bool {
        self.canonical.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProbeResult {
    pub platform: Platform,
    pub available: bool,
}

/// Per-name outcome across every requested platform.
///
/// Serializes flat, `{ "name": ..., "<platform>": bool, ... }`, with
/// platforms in the order they were requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRecord {
    pub name: String,
    pub results: Vec<ProbeResult>,
}

impl CheckRecord {
    pub fn get(&self, platform: Platform) -> Option<bool> {
        self.results
            .iter()
            .find(|r| r.platform == platform)
            .map(|r| r.available)
    }

    pub fn any_available(&self) -> bool {
        self.results.iter().any(|r| r.available)
    }

    pub fn any_taken(&self) -> bool {
        self.results.iter().any(|r| !r.available)
    }
}

impl Serialize for CheckRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.results.len() + 1))?;
        map.serialize_entry("name", &self.name)?;
        for r in &self.results {
            map.serialize_entry(r.platform.as_str(), &r.available)?;
        }
        map.end()
    }
}
