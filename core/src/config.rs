//! Material system configuration (`canvas-material.toml`)
//!
//! Every section and field is optional; a missing file or an empty file
//! yields the defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::MaterialError;

/// Preallocation above this is almost certainly a typo
const MAX_REASONABLE_CAPACITY: usize = 1 << 20;

/// Material system configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MaterialConfig {
    /// Canonical state cache settings
    #[serde(default)]
    pub cache: CacheConfig,
    /// Shader registry settings
    #[serde(default)]
    pub shaders: ShaderConfig,
    /// Lookup timing settings
    #[serde(default)]
    pub timing: TimingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// States to preallocate room for (default: 256)
    #[serde(default = "default_initial_capacity")]
    pub initial_capacity: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShaderConfig {
    /// Name of the shader used when a material does not pick one
    /// (default: "canvas:default")
    #[serde(default = "default_shader_name")]
    pub default_shader: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Time every cache lookup (default: false)
    #[serde(default)]
    pub enabled: bool,
    /// Lookups per timing report (default: 10000)
    #[serde(default = "default_sample_size")]
    pub sample_size: u64,
}

fn default_initial_capacity() -> usize {
    256
}
fn default_shader_name() -> String {
    "canvas:default".to_string()
}
fn default_sample_size() -> u64 {
    10_000
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            initial_capacity: default_initial_capacity(),
        }
    }
}

impl Default for ShaderConfig {
    fn default() -> Self {
        Self {
            default_shader: default_shader_name(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            sample_size: default_sample_size(),
        }
    }
}

impl MaterialConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, MaterialError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from `path`.
    ///
    /// A missing file yields the defaults. A file that exists but cannot be
    /// read or parsed is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MaterialError> {
        let path = path.as_ref();
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no material config, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        let config = Self::from_toml_str(&content)?;
        for warning in config.validate() {
            tracing::warn!(path = %path.display(), "{}", warning);
        }
        Ok(config)
    }

    /// Serialize to TOML
    pub fn to_toml_string(&self) -> Result<String, MaterialError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check for settings that are accepted but probably unintended.
    ///
    /// Returns a list of warning messages; an empty list means the
    /// configuration looks sane.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.shaders.default_shader.trim().is_empty() {
            warnings.push("shaders.default_shader is empty".to_string());
        }

        if self.cache.initial_capacity > MAX_REASONABLE_CAPACITY {
            warnings.push(format!(
                "cache.initial_capacity {} is unusually large (max suggested {})",
                self.cache.initial_capacity, MAX_REASONABLE_CAPACITY
            ));
        }

        if self.timing.sample_size == 0 {
            warnings.push("timing.sample_size is 0, treating as 1".to_string());
        }

        if !self.timing.enabled && self.timing.sample_size != default_sample_size() {
            warnings.push("timing.sample_size is set but timing.enabled is false".to_string());
        }

        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = MaterialConfig::default();
        assert_eq!(config.cache.initial_capacity, 256);
        assert_eq!(config.shaders.default_shader, "canvas:default");
        assert!(!config.timing.enabled);
        assert_eq!(config.timing.sample_size, 10_000);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_config_deserialize_empty() {
        let config = MaterialConfig::from_toml_str("").unwrap();
        assert_eq!(config, MaterialConfig::default());
    }

    #[test]
    fn test_config_deserialize_partial_timing() {
        let toml_str = r#"
[timing]
enabled = true
"#;
        let config = MaterialConfig::from_toml_str(toml_str).unwrap();
        assert!(config.timing.enabled);
        assert_eq!(config.timing.sample_size, 10_000); // default
        assert_eq!(config.cache.initial_capacity, 256); // default
    }

    #[test]
    fn test_config_serialize_roundtrip() {
        let mut config = MaterialConfig::default();
        config.shaders.default_shader = "canvas:wavy".to_string();
        config.cache.initial_capacity = 4096;

        let parsed = MaterialConfig::from_toml_str(&config.to_toml_string().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_config_serialize_has_sections() {
        let toml_str = MaterialConfig::default().to_toml_string().unwrap();
        assert!(toml_str.contains("[cache]"));
        assert!(toml_str.contains("default_shader = \"canvas:default\""));
    }

    #[test]
    fn test_config_malformed_is_error() {
        let err = MaterialConfig::from_toml_str("[cache]\ninitial_capacity = \"lots\"").unwrap_err();
        assert!(matches!(err, MaterialError::Config(_)));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = MaterialConfig::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, MaterialConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("canvas-material.toml");
        std::fs::write(&path, "[shaders]\ndefault_shader = \"canvas:flat\"\n").unwrap();

        let config = MaterialConfig::load(&path).unwrap();
        assert_eq!(config.shaders.default_shader, "canvas:flat");
    }

    #[test]
    fn test_load_malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("canvas-material.toml");
        std::fs::write(&path, "[cache\n").unwrap();

        assert!(matches!(
            MaterialConfig::load(&path),
            Err(MaterialError::Config(_))
        ));
    }

    #[test]
    fn test_validate_warnings() {
        let mut config = MaterialConfig::default();
        config.shaders.default_shader = "  ".to_string();
        config.timing.sample_size = 0;

        let warnings = config.validate();
        assert_eq!(warnings.len(), 3);
        assert!(warnings[0].contains("default_shader"));
        assert!(warnings[1].contains("treating as 1"));
        assert!(warnings[2].contains("timing.enabled is false"));
    }
}
