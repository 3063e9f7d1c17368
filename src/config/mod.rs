use std::{collections::HashSet, fs, path::Path};

use serde::Deserialize;

use crate::{
    core::{error::CheckError, types::Platform},
    modules::recon::classify::ClassificationStrategy,
};

/// Shipped defaults; a user file passed with `--config` replaces them wholesale.
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../config/handle-check.toml");

pub const HANDLE_PLACEHOLDER: &str = "{handle}";

#[derive(Debug, Clone, Deserialize)]
pub struct PlatformConfig {
    pub name: Platform,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub base_url: String,
    pub strategy: ClassificationStrategy,
}

/// Phrase lists used by the body-sniff strategy. Matched against lowercased text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SniffConfig {
    #[serde(default)]
    pub not_found_phrases: Vec<String>,
    #[serde(default)]
    pub not_found_all_tokens: Vec<String>,
    #[serde(default)]
    pub profile_markers: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub timeout_ms: u64,
    pub max_concurrent_requests: usize,
    #[serde(default)]
    pub cache_ttl_seconds: u64,
    #[serde(default = "default_cache_max_entries")]
    pub cache_max_entries: usize,
    pub user_agent: String,
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    pub platforms: Vec<PlatformConfig>,
    #[serde(default)]
    pub sniff: SniffConfig,
}

impl AppConfig {
    pub fn platform(&self, platform: Platform) -> Option<&PlatformConfig> {
        self.platforms.iter().find(|p| p.name == platform)
    }

    pub fn enabled_platforms(&self) -> Vec<Platform> {
        self.platforms
            .iter()
            .filter(|p| p.enabled)
            .map(|p| p.name)
            .collect()
    }

    pub fn validate(&self) -> Result<(), CheckError> {
        if self.timeout_ms == 0 {
            return Err(CheckError::Config("timeout_ms must be greater than 0".into()));
        }
        if self.max_concurrent_requests == 0 {
            return Err(CheckError::Config(
                "max_concurrent_requests must be greater than 0".into(),
            ));
        }
        let mut seen = HashSet::new();
        for p in &self.platforms {
            if !seen.insert(p.name) {
                return Err(CheckError::Config(format!(
                    "platform {} configured more than once",
                    p.name
                )));
            }
            if !p.base_url.contains(HANDLE_PLACEHOLDER) {
                return Err(CheckError::Config(format!(
                    "base_url for {} must contain {HANDLE_PLACEHOLDER}",
                    p.name
                )));
            }
        }
        Ok(())
    }
}

pub fn load_config(path: Option<&str>) -> Result<AppConfig, CheckError> {
    let default_path = Path::new("config/handle-check.toml");
    let path = path.map(Path::new).unwrap_or(default_path);

    if !path.exists() {
        tracing::debug!("no config at {}, using built-in defaults", path.display());
        return default_config();
    }

    let content = fs::read_to_string(path).map_err(|e| CheckError::Config(e.to_string()))?;
    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<AppConfig, CheckError> {
    let cfg: AppConfig =
        toml::from_str(content).map_err(|e| CheckError::Config(e.to_string()))?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn default_config() -> Result<AppConfig, CheckError> {
    parse_config(DEFAULT_CONFIG_TOML)
}

/// Restrict the enabled platforms to `names`. Unknown names are rejected.
pub fn apply_platform_filter(
    cfg: AppConfig,
    names: Option<&[String]>,
) -> Result<AppConfig, CheckError> {
    let Some(list) = names else {
        return Ok(cfg);
    };
    let wanted = list
        .iter()
        .map(|n| n.parse::<Platform>())
        .collect::<Result<Vec<_>, _>>()?;
    let mut cfg = cfg;
    for p in cfg.platforms.iter_mut() {
        p.enabled = wanted.contains(&p.name);
    }
    Ok(cfg)
}

fn default_enabled() -> bool {
    true
}

fn default_cache_max_entries() -> usize {
    10_000
}

fn default_max_redirects() -> usize {
    10
}

fn default_listen_addr() -> String {
    "127.0.0.1:3000".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_defaults_cover_every_platform() {
        let cfg = default_config().unwrap();
        assert_eq!(cfg.enabled_platforms(), Platform::ALL.to_vec());
        for platform in Platform::ALL {
            let pc = cfg.platform(platform).unwrap();
            assert_eq!(pc.base_url, platform.url_template());
        }
        assert_eq!(
            cfg.platform(Platform::Instagram).unwrap().strategy,
            ClassificationStrategy::StatusPlusBodySniff
        );
        assert_eq!(
            cfg.platform(Platform::X).unwrap().strategy,
            ClassificationStrategy::StatusOnly
        );
        assert!(cfg.user_agent.starts_with("Mozilla/5.0"));
        assert_eq!(cfg.cache_ttl_seconds, 0, "verdict cache must be opt-in");
        assert!(!cfg.sniff.not_found_phrases.is_empty());
        assert!(!cfg.sniff.profile_markers.is_empty());
    }

    #[test]
    fn filter_narrows_enabled_platforms() {
        let cfg = default_config().unwrap();
        let names = vec!["YouTube".to_string(), "x".to_string()];
        let cfg = apply_platform_filter(cfg, Some(&names)).unwrap();
        assert_eq!(cfg.enabled_platforms(), vec![Platform::Youtube, Platform::X]);
    }

    #[test]
    fn filter_rejects_unknown_platform() {
        let cfg = default_config().unwrap();
        let names = vec!["tiktok".to_string()];
        let err = apply_platform_filter(cfg, Some(&names)).unwrap_err();
        assert!(matches!(err, CheckError::UnknownPlatform(_)));
    }

    #[test]
    fn rejects_unknown_platform_in_file() {
        let toml = r#"
            timeout_ms = 1000
            max_concurrent_requests = 2
            user_agent = "ua"

            [[platforms]]
            name = "friendster"
            base_url = "https://friendster.com/{handle}"
            strategy = "status_only"
        "#;
        assert!(matches!(parse_config(toml), Err(CheckError::Config(_))));
    }

    #[test]
    fn rejects_template_without_placeholder() {
        let toml = r#"
            timeout_ms = 1000
            max_concurrent_requests = 2
            user_agent = "ua"

            [[platforms]]
            name = "x"
            base_url = "https://x.com/"
            strategy = "status_only"
        "#;
        let err = parse_config(toml).unwrap_err();
        assert!(err.to_string().contains("{handle}"));
    }

    #[test]
    fn rejects_zero_timeout() {
        let toml = r#"
            timeout_ms = 0
            max_concurrent_requests = 2
            user_agent = "ua"
            platforms = []
        "#;
        assert!(matches!(parse_config(toml), Err(CheckError::Config(_))));
    }
}
