//! Configuration for convenience-method synthesis.
//!
//! This module defines the `GeneratorConfig` struct which carries the global
//! policies the synthesizer consults. The configuration can be created
//! programmatically or loaded from a YAML file.
//!
//! # Examples
//!
//! ```no_run
//! use convgen_core::config::{GeneratorConfig, UnmatchedPolicy};
//!
//! let mut config = GeneratorConfig::default();
//! config.unmatched_parameters = UnmatchedPolicy::Strict;
//! config.allowed_unmatched.push("pollInterval".to_string());
//!
//! # #[tokio::main]
//! # async fn main() -> convgen_core::Result<()> {
//! let config = GeneratorConfig::from_file("convgen.yaml").await?;
//! # Ok(())
//! # }
//! ```

// Internal imports (std, crate)
use std::path::Path;

// External imports (alphabetized)
use serde::{Deserialize, Serialize};
use tokio::fs;

/// What to do with a convenience parameter that has no wire mapping and is
/// not consumed by a transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmatchedPolicy {
    /// Log a warning and leave the value to flow by identifier name
    #[default]
    PassThrough,
    /// Abort generation of the method unless the parameter is whitelisted
    Strict,
}

/// Global policies for convenience-method synthesis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Required flattened properties become constructor arguments instead of setters
    #[serde(default = "default_true")]
    pub required_fields_as_constructor_args: bool,

    /// Handling of convenience parameters without any wire mapping
    #[serde(default)]
    pub unmatched_parameters: UnmatchedPolicy,

    /// Parameters that may stay unmatched under the strict policy
    #[serde(default)]
    pub allowed_unmatched: Vec<String>,

    /// Name of the request-options variable created by every synthesized method
    #[serde(default = "default_request_options_name")]
    pub request_options_name: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            required_fields_as_constructor_args: true,
            unmatched_parameters: UnmatchedPolicy::default(),
            allowed_unmatched: Vec::new(),
            request_options_name: default_request_options_name(),
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = fs::read_to_string(path).await?;
        let config: Self = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub async fn save<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let content = serde_yaml::to_string(self)?;
        fs::write(path, content).await?;
        Ok(())
    }

    /// Reject configurations the synthesizer cannot honour
    pub fn validate(&self) -> crate::Result<()> {
        if self.request_options_name.trim().is_empty() {
            return Err(crate::Error::config("request_options_name must not be empty"));
        }
        Ok(())
    }

    /// Whether `parameter` may stay unmatched without failing generation
    pub fn allows_unmatched(&self, parameter: &str) -> bool {
        match self.unmatched_parameters {
            UnmatchedPolicy::PassThrough => true,
            UnmatchedPolicy::Strict => self.allowed_unmatched.iter().any(|p| p == parameter),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_request_options_name() -> String {
    "requestOptions".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_config_roundtrip() -> crate::Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("convgen.yaml");

        let mut config = GeneratorConfig::default();
        config.unmatched_parameters = UnmatchedPolicy::Strict;
        config.allowed_unmatched = vec!["pollInterval".to_string()];
        config.save(&file_path).await?;

        let loaded = GeneratorConfig::from_file(&file_path).await?;
        assert_eq!(loaded, config);
        assert!(loaded.required_fields_as_constructor_args);
        assert_eq!(loaded.request_options_name, "requestOptions");

        Ok(())
    }

    #[tokio::test]
    async fn test_config_defaults_from_sparse_file() -> crate::Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("sparse.yaml");
        tokio::fs::write(&file_path, "unmatched_parameters: strict\n").await?;

        let loaded = GeneratorConfig::from_file(&file_path).await?;
        assert_eq!(loaded.unmatched_parameters, UnmatchedPolicy::Strict);
        assert!(loaded.required_fields_as_constructor_args);
        assert!(loaded.allowed_unmatched.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_config_rejects_blank_request_options_name() -> crate::Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("blank.yaml");
        tokio::fs::write(&file_path, "request_options_name: \"  \"\n").await?;

        let err = GeneratorConfig::from_file(&file_path).await.unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
        Ok(())
    }

    #[test]
    fn test_allows_unmatched() {
        let mut config = GeneratorConfig::default();
        assert!(config.allows_unmatched("anything"));

        config.unmatched_parameters = UnmatchedPolicy::Strict;
        config.allowed_unmatched.push("pollInterval".to_string());
        assert!(config.allows_unmatched("pollInterval"));
        assert!(!config.allows_unmatched("filter"));
    }
}
