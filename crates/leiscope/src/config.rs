//! Client configuration
//!
//! Values come from built-in defaults, an optional YAML file, and environment
//! overrides, in that order of increasing precedence. CLI flags are applied on
//! top by the binary.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{LeiscopeError, Result};

/// Largest candidate list the backend ranks per name.
pub const MAX_TOP_K: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
  /// Base URL of the entity backend
  #[serde(default = "default_base_url")]
  pub base_url: String,
  /// Request timeout for backend calls, in seconds
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
  /// Candidates requested per name
  #[serde(default = "default_top_k")]
  pub top_k: usize,
  /// Base URL of the country geocoding service
  #[serde(default = "default_geocoder_url")]
  pub geocoder_url: String,
  #[serde(default = "default_geocoder_timeout_secs")]
  pub geocoder_timeout_secs: u64,
  /// Length of the fixed pacing phases, in milliseconds
  #[serde(default = "default_pacing_ms")]
  pub pacing_ms: u64,
}

fn default_base_url() -> String {
  "http://127.0.0.1:8000".to_string()
}
fn default_timeout_secs() -> u64 {
  30
}
fn default_top_k() -> usize {
  MAX_TOP_K
}
fn default_geocoder_url() -> String {
  "https://restcountries.com/v3.1".to_string()
}
fn default_geocoder_timeout_secs() -> u64 {
  5
}
fn default_pacing_ms() -> u64 {
  300
}

impl Default for Config {
  fn default() -> Self {
    Self {
      base_url: default_base_url(),
      timeout_secs: default_timeout_secs(),
      top_k: default_top_k(),
      geocoder_url: default_geocoder_url(),
      geocoder_timeout_secs: default_geocoder_timeout_secs(),
      pacing_ms: default_pacing_ms(),
    }
  }
}

impl Config {
  /// Load the configuration the binary runs with.
  ///
  /// A path given as an argument or through `LEISCOPE_CONFIG` must exist;
  /// the default location is optional.
  pub fn load(explicit: Option<&Path>) -> Result<Self> {
    let selected = explicit.map(Path::to_path_buf).or_else(Self::env_path);
    let from_file = match selected {
      Some(path) => Some(Self::from_file(&path)?),
      None => match Self::default_path() {
        Some(path) if path.exists() => Some(Self::from_file(&path)?),
        _ => None,
      },
    };

    let mut config = from_file.unwrap_or_default();
    config.apply_env();
    config.validate()?;
    Ok(config)
  }

  pub fn from_file(path: &Path) -> Result<Self> {
    let content = std::fs::read_to_string(path).map_err(|e| {
      LeiscopeError::config(format!("cannot read {}: {e}", path.display()))
    })?;
    Self::from_yaml(&content)
      .map_err(|e| LeiscopeError::config(format!("{}: {e}", path.display())))
  }

  pub fn from_yaml(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
    if content.trim().is_empty() {
      return Ok(Self::default());
    }
    serde_yaml::from_str(content)
  }

  fn env_path() -> Option<PathBuf> {
    std::env::var("LEISCOPE_CONFIG").ok().filter(|path| !path.trim().is_empty()).map(PathBuf::from)
  }

  /// `<config dir>/leiscope/config.yaml`
  fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("leiscope").join("config.yaml"))
  }

  /// Apply `LEISCOPE_*` environment overrides. Unparseable numbers are ignored.
  pub fn apply_env(&mut self) {
    if let Ok(url) = std::env::var("LEISCOPE_URL") {
      if !url.trim().is_empty() {
        self.base_url = url;
      }
    }
    if let Some(secs) = std::env::var("LEISCOPE_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()) {
      self.timeout_secs = secs;
    }
    if let Ok(url) = std::env::var("LEISCOPE_GEOCODER_URL") {
      if !url.trim().is_empty() {
        self.geocoder_url = url;
      }
    }
  }

  pub fn validate(&self) -> Result<()> {
    if self.base_url.trim().is_empty() {
      return Err(LeiscopeError::config("base_url must not be empty"));
    }
    if self.timeout_secs == 0 {
      return Err(LeiscopeError::config("timeout_secs must be greater than zero"));
    }
    if self.top_k == 0 || self.top_k > MAX_TOP_K {
      return Err(LeiscopeError::config(format!("top_k must be between 1 and {MAX_TOP_K}")));
    }
    Ok(())
  }

  pub fn base_url(&self) -> &str {
    self.base_url.trim_end_matches('/')
  }

  pub fn timeout(&self) -> Duration {
    Duration::from_secs(self.timeout_secs)
  }

  pub fn geocoder_timeout(&self) -> Duration {
    Duration::from_secs(self.geocoder_timeout_secs.max(1))
  }

  pub fn pacing(&self) -> Duration {
    Duration::from_millis(self.pacing_ms)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_defaults_are_valid() {
    let config = Config::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.base_url(), "http://127.0.0.1:8000");
    assert_eq!(config.top_k, 5);
  }

  #[test]
  fn test_partial_yaml_keeps_defaults() {
    let config = Config::from_yaml("base_url: http://10.0.0.2:9000/\npacing_ms: 0\n").unwrap();
    assert_eq!(config.base_url(), "http://10.0.0.2:9000");
    assert_eq!(config.pacing_ms, 0);
    assert_eq!(config.timeout_secs, 30);
  }

  #[test]
  fn test_empty_yaml_is_default() {
    assert_eq!(Config::from_yaml("  \n").unwrap(), Config::default());
  }

  #[test]
  fn test_rejects_out_of_range_top_k() {
    let config = Config { top_k: 9, ..Config::default() };
    assert!(matches!(config.validate(), Err(LeiscopeError::Config { .. })));
  }
}
