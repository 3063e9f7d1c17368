//! Turning a profile-page response into an availability verdict.

use regex::Regex;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::{config::SniffConfig, core::types::Platform};

/// How a platform's response is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationStrategy {
    /// 404/410 means available; the body is never read.
    StatusOnly,
    /// The platform answers 200 for missing profiles, so the body decides first.
    StatusPlusBodySniff,
}

impl ClassificationStrategy {
    /// Strategy for a platform with no configuration entry.
    pub fn default_for(platform: Platform) -> Self {
        match platform {
            Platform::Instagram => ClassificationStrategy::StatusPlusBodySniff,
            _ => ClassificationStrategy::StatusOnly,
        }
    }

    pub fn needs_body(&self) -> bool {
        matches!(self, ClassificationStrategy::StatusPlusBodySniff)
    }
}

pub fn status_means_missing(status: StatusCode) -> bool {
    matches!(status, StatusCode::NOT_FOUND | StatusCode::GONE)
}

/// Compiled body-sniff rules, shared read-only across probes.
#[derive(Debug, Clone)]
pub struct Sniffer {
    tags: Regex,
    whitespace: Regex,
    not_found_phrases: Vec<String>,
    not_found_all_tokens: Vec<String>,
    profile_markers: Vec<String>,
}

impl Sniffer {
    pub fn new(cfg: &SniffConfig) -> Self {
        Self {
            tags: Regex::new(r"<[^>]*>").expect("static regex"),
            whitespace: Regex::new(r"\s+").expect("static regex"),
            not_found_phrases: lowercase_all(&cfg.not_found_phrases),
            not_found_all_tokens: lowercase_all(&cfg.not_found_all_tokens),
            profile_markers: lowercase_all(&cfg.profile_markers),
        }
    }

    /// Tags stripped, whitespace collapsed, lowercased.
    pub fn clean_text(&self, body: &str) -> String {
        let stripped = self.tags.replace_all(body, " ");
        self.whitespace
            .replace_all(&stripped, " ")
            .trim()
            .to_lowercase()
    }

    /// Order matters: not-found copy wins over status, status wins over profile markers.
    pub fn classify(&self, status: StatusCode, body: &str) -> bool {
        let text = self.clean_text(body);
        if self.says_not_found(&text) {
            return true;
        }
        if status_means_missing(status) {
            return true;
        }
        let raw = body.to_lowercase();
        if self
            .profile_markers
            .iter()
            .any(|m| text.contains(m.as_str()) || raw.contains(m.as_str()))
        {
            return false;
        }
        crate::core::engine::ASSUME_TAKEN
    }

    fn says_not_found(&self, text: &str) -> bool {
        if self
            .not_found_phrases
            .iter()
            .any(|p| text.contains(p.as_str()))
        {
            return true;
        }
        !self.not_found_all_tokens.is_empty()
            && self
                .not_found_all_tokens
                .iter()
                .all(|t| text.contains(t.as_str()))
    }
}

fn lowercase_all(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

pub fn classify(
    strategy: ClassificationStrategy,
    sniffer: &Sniffer,
    status: StatusCode,
    body: Option<&str>,
) -> bool {
    match (strategy, body) {
        (ClassificationStrategy::StatusPlusBodySniff, Some(body)) => sniffer.classify(status, body),
        _ => status_means_missing(status),
    }
}
