//! rune-stack configuration

use crate::error::{Result, StackError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default config file name inside the rune-stack config directory
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// rune-stack configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackConfig {
    /// docker binary to invoke
    pub docker_binary: PathBuf,
    /// Seconds between network checks while removing a stack
    pub poll_interval_secs: u64,
    /// Give up waiting for network removal after this many seconds
    pub removal_timeout_secs: Option<u64>,
    /// Seconds a task must have been running to count as stable
    pub stability_window_secs: u64,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            docker_binary: PathBuf::from("docker"),
            poll_interval_secs: 5,
            removal_timeout_secs: None,
            stability_window_secs: 5,
        }
    }
}

impl StackConfig {
    /// Default location of the config file, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("rune-stack").join(DEFAULT_CONFIG_FILE))
    }

    /// Load from an explicit path, the default path, or fall back to defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Parse config file from path
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            StackError::InvalidConfig(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::parse_str(&content)
    }

    /// Parse config from a YAML string
    pub fn parse_str(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| StackError::Yaml(format!("Failed to parse YAML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the removal loop cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_secs == 0 {
            return Err(StackError::InvalidConfig(
                "poll_interval_secs must be greater than zero".to_string(),
            ));
        }
        if self.docker_binary.as_os_str().is_empty() {
            return Err(StackError::InvalidConfig(
                "docker_binary must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Set docker binary
    pub fn docker_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.docker_binary = binary.into();
        self
    }

    /// Set poll interval
    pub fn poll_interval(mut self, secs: u64) -> Self {
        self.poll_interval_secs = secs;
        self
    }

    /// Set removal timeout
    pub fn removal_timeout(mut self, secs: Option<u64>) -> Self {
        self.removal_timeout_secs = secs;
        self
    }

    /// Set stability window
    pub fn stability_window(mut self, secs: u64) -> Self {
        self.stability_window_secs = secs;
        self
    }

    pub fn poll_interval_duration(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn removal_timeout_duration(&self) -> Option<Duration> {
        self.removal_timeout_secs.map(Duration::from_secs)
    }

    pub fn stability_window_duration(&self) -> Duration {
        Duration::from_secs(self.stability_window_secs)
    }
}
