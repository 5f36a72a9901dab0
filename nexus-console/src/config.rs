//! Console configuration: API endpoint and poll cadence

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    pub api_base_url: String,
    pub poll_interval_secs: u64,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            poll_interval_secs: 5,
        }
    }
}

impl ConsoleConfig {
    /// Load config from the OS-specific location; defaults when absent
    pub async fn load() -> Result<Self> {
        let config_path = Self::config_file_path()?;

        if config_path.exists() {
            let content = tokio::fs::read_to_string(&config_path).await?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    pub async fn save(&self) -> Result<()> {
        let config_path = Self::config_file_path()?;

        if let Some(parent) = config_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let content = toml::to_string_pretty(self)?;
        tokio::fs::write(&config_path, content).await?;
        Ok(())
    }

    pub fn config_file_path() -> Result<PathBuf> {
        let mut path = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;

        path.push("nexus-console");
        path.push("config.toml");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ConsoleConfig::default();
        assert_eq!(config.api_base_url, "http://localhost:8000");
        assert_eq!(config.poll_interval_secs, 5);
    }

    #[test]
    fn test_config_file_path() {
        let path = ConsoleConfig::config_file_path().unwrap();
        assert!(path.to_string_lossy().contains("nexus-console"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_config_roundtrip() {
        let config = ConsoleConfig {
            api_base_url: "http://10.0.0.5:8000".into(),
            poll_interval_secs: 2,
        };
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: ConsoleConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.api_base_url, config.api_base_url);
        assert_eq!(parsed.poll_interval_secs, 2);
    }
}
