//! Bridge configuration loaded from `.otio-bridge.toml`

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = ".otio-bridge.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default)]
    pub registry: RegistryConfig,

    #[serde(default)]
    pub serialization: SerializationConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Record every projected wrapper in the weak identity registry
    #[serde(default = "default_true")]
    pub track_identity: bool,

    #[serde(default)]
    pub projection: ProjectionPolicy,
}

/// What projecting an already-wrapped native object produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionPolicy {
    /// A new wrapper every time
    #[default]
    Fresh,
    /// The live wrapper registered for that object, when there is one
    ReuseLive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializationConfig {
    #[serde(default = "default_indent")]
    pub indent: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub json: bool,

    /// Directory for daily-rotated log files; stderr when unset
    #[serde(default)]
    pub directory: Option<String>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            track_identity: true,
            projection: ProjectionPolicy::Fresh,
        }
    }
}

impl Default for SerializationConfig {
    fn default() -> Self {
        Self { indent: 4 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
            directory: None,
        }
    }
}

fn default_true() -> bool { true }
fn default_indent() -> u32 { 4 }
fn default_level() -> String { "info".to_string() }

impl BridgeConfig {
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config: {}", e))?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content)
            .map_err(|e| format!("Failed to parse config: {}", e))
    }

    /// Nearest `.otio-bridge.toml` from the current directory upwards
    pub fn discover() -> Self {
        std::env::current_dir()
            .ok()
            .and_then(|dir| Self::discover_from(&dir))
            .unwrap_or_default()
    }

    /// Nearest readable config at or above `start`
    pub fn discover_from(start: &Path) -> Option<Self> {
        let mut current: Option<PathBuf> = Some(start.to_path_buf());

        while let Some(dir) = current {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                match Self::load(&config_path) {
                    Ok(config) => return Some(config),
                    Err(e) => tracing::warn!(path = %config_path.display(), error = %e, "ignoring unreadable config"),
                }
            }
            current = dir.parent().map(|p| p.to_path_buf());
        }

        None
    }

    pub fn generate_default() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate config"))
    }

    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        fs::write(path, content)
            .map_err(|e| format!("Failed to write config: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BridgeConfig::default();
        assert!(config.registry.track_identity);
        assert_eq!(config.registry.projection, ProjectionPolicy::Fresh);
        assert_eq!(config.serialization.indent, 4);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[registry]
projection = "reuse_live"

[serialization]
indent = 2
"#;

        let config = BridgeConfig::parse(toml).unwrap();
        assert!(config.registry.track_identity);
        assert_eq!(config.registry.projection, ProjectionPolicy::ReuseLive);
        assert_eq!(config.serialization.indent, 2);
        assert!(!config.logging.json);
    }

    #[test]
    fn test_parse_rejects_unknown_policy() {
        let err = BridgeConfig::parse("[registry]\nprojection = \"sometimes\"\n").unwrap_err();
        assert!(err.starts_with("Failed to parse config"));
    }

    #[test]
    fn test_save_and_discover() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        let mut config = BridgeConfig::default();
        config.logging.json = true;
        config.save(&root.path().join(CONFIG_FILE_NAME)).unwrap();

        let found = BridgeConfig::discover_from(&nested).unwrap();
        assert_eq!(found, config);
    }

    #[test]
    fn test_generate_default_parses_back() {
        let text = BridgeConfig::generate_default();
        assert_eq!(BridgeConfig::parse(&text).unwrap(), BridgeConfig::default());
    }
}
