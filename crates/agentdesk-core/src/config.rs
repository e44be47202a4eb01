use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result, anyhow};

use crate::deployment::Deployment;

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Full URL of the agent's chat endpoint; wins over `environment`.
    pub endpoint: Option<String>,
    /// "development" or "production".
    pub environment: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        Self {
            endpoint: None,
            environment: Some(Deployment::Production.as_str().to_string()),
        }
    }

    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("reading {}", config_path.display()))?;
        let config: Config = serde_json::from_str(&config_content)
            .with_context(|| format!("parsing {}", config_path.display()))?;
        Ok(config)
    }

    pub fn deployment(&self) -> Deployment {
        self.environment
            .as_deref()
            .and_then(Deployment::from_str)
            .unwrap_or_default()
    }

    /// Pick the endpoint: an explicit URL first, then the configured URL,
    /// then the default of the chosen (or configured) deployment.
    pub fn resolve_endpoint(&self, endpoint: Option<&str>, deployment: Option<Deployment>) -> String {
        let explicit = endpoint
            .or(self.endpoint.as_deref())
            .map(str::trim)
            .filter(|e| !e.is_empty());

        match explicit {
            Some(url) => url.to_string(),
            None => deployment
                .unwrap_or_else(|| self.deployment())
                .default_endpoint()
                .to_string(),
        }
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("agentdesk").join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::new());
        assert_eq!(config.deployment(), Deployment::Production);
    }

    #[test]
    fn test_load_reads_written_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{ "endpoint": "http://agent.internal/api/chat", "environment": "development" }"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.endpoint.as_deref(), Some("http://agent.internal/api/chat"));
        assert_eq!(config.deployment(), Deployment::Development);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_resolve_endpoint_precedence() {
        let config = Config {
            endpoint: Some("http://configured/api/chat".to_string()),
            environment: None,
        };
        assert_eq!(
            config.resolve_endpoint(Some("http://flag/api/chat"), None),
            "http://flag/api/chat"
        );
        assert_eq!(
            config.resolve_endpoint(None, Some(Deployment::Development)),
            "http://configured/api/chat"
        );

        let config = Config {
            endpoint: None,
            environment: Some("dev".to_string()),
        };
        assert_eq!(
            config.resolve_endpoint(None, None),
            Deployment::Development.default_endpoint()
        );
        assert_eq!(
            config.resolve_endpoint(Some("  "), Some(Deployment::Production)),
            Deployment::Production.default_endpoint()
        );
    }
}
