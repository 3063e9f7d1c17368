use crate::config::HANDLE_PLACEHOLDER;
use crate::core::error::CheckError;
use crate::core::types::{CandidateName, Platform};

/// Reduce a raw name to a URL-safe handle: trimmed, lowercased, `[a-z0-9_]` only.
///
/// Never fails; an input with nothing usable yields an empty string.
pub fn normalize(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_')
        .collect()
}

pub fn candidate(raw: &str) -> CandidateName {
    CandidateName {
        raw: raw.trim().to_string(),
        canonical: normalize(raw),
    }
}

/// Canonical public profile URL for `platform`.
pub fn url_for(platform: &str, canonical: &str) -> Result<String, CheckError> {
    let platform: Platform = platform.parse()?;
    Ok(render_template(platform.url_template(), canonical))
}

pub fn render_template(template: &str, canonical: &str) -> String {
    template.replace(HANDLE_PLACEHOLDER, canonical)
}
