// TOML config adapter - Configuration management using TOML files

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::adapters::tracing_log::{parse_level, LogFormat};
use crate::domain::errors::DomainError;
use crate::domain::fields::EditSpecification;
use crate::error::{FfmetaError, FfmetaResult};

/// Environment variable naming a config file
pub const CONFIG_ENV: &str = "FFMETA_CONFIG";
/// Environment variable overriding the ffprobe executable
pub const FFPROBE_ENV: &str = "FFMETA_FFPROBE";
/// Environment variable overriding the ffmpeg executable
pub const FFMPEG_ENV: &str = "FFMETA_FFMPEG";
/// Environment variable overriding the log level
pub const LOG_LEVEL_ENV: &str = "FFMETA_LOG_LEVEL";

/// External executables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolsConfig {
    pub ffprobe: String,
    pub ffmpeg: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ffprobe: "ffprobe".to_string(),
            ffmpeg: "ffmpeg".to_string(),
        }
    }
}

/// Tag keys prompted for by `edit tags`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TagsConfig {
    pub required: Vec<String>,
    pub suggested: Vec<String>,
}

impl Default for TagsConfig {
    fn default() -> Self {
        Self {
            required: vec!["title".to_string(), "artist".to_string()],
            suggested: ["album", "date", "genre", "comment"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Whole configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub tools: ToolsConfig,
    pub tags: TagsConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Parse a TOML document
    pub fn from_toml(content: &str) -> FfmetaResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read and validate a config file
    pub fn from_file(path: &Path) -> FfmetaResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| FfmetaError::Config {
            path: path.display().to_string(),
            message: format!("cannot be read: {}", e),
        })?;
        let config = Self::from_toml(&content).map_err(|e| FfmetaError::Config {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        config.validate().map_err(|e| FfmetaError::Config {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(config)
    }

    /// Check log level and tag lists
    pub fn validate(&self) -> FfmetaResult<()> {
        parse_level(&self.logging.level)?;
        if self.tools.ffprobe.trim().is_empty() || self.tools.ffmpeg.trim().is_empty() {
            return Err(DomainError::BadArgs("tool paths cannot be empty".to_string()).into());
        }
        self.edit_specification()?;
        Ok(())
    }

    /// Tag edit specification built from `[tags]`
    pub fn edit_specification(&self) -> FfmetaResult<EditSpecification> {
        Ok(EditSpecification::for_tags(
            &self.tags.required,
            &self.tags.suggested,
        )?)
    }

    /// Apply `FFMETA_*` overrides from an environment lookup
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(ffprobe) = lookup(FFPROBE_ENV).filter(|v| !v.trim().is_empty()) {
            self.tools.ffprobe = ffprobe;
        }
        if let Some(ffmpeg) = lookup(FFMPEG_ENV).filter(|v| !v.trim().is_empty()) {
            self.tools.ffmpeg = ffmpeg;
        }
        if let Some(level) = lookup(LOG_LEVEL_ENV).filter(|v| !v.trim().is_empty()) {
            self.logging.level = level;
        }
    }
}

/// Candidate config files in lookup order, after an explicit `--config`
pub fn default_config_paths<F>(lookup: F) -> Vec<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    let mut paths = Vec::new();
    if let Some(path) = lookup(CONFIG_ENV).filter(|v| !v.is_empty()) {
        paths.push(PathBuf::from(path));
    }
    if let Some(xdg) = lookup("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        paths.push(PathBuf::from(xdg).join("ffmeta").join("config.toml"));
    } else if let Some(home) = lookup("HOME").filter(|v| !v.is_empty()) {
        paths.push(
            PathBuf::from(home)
                .join(".config")
                .join("ffmeta")
                .join("config.toml"),
        );
    }
    paths.push(PathBuf::from("ffmeta.toml"));
    paths
}

/// Load configuration with precedence environment > file > defaults.
///
/// An explicit path must exist; `FFMETA_CONFIG` and the default locations
/// are skipped when absent.
pub fn load_config<F>(explicit: Option<&Path>, lookup: F) -> FfmetaResult<(AppConfig, Option<PathBuf>)>
where
    F: Fn(&str) -> Option<String>,
{
    let source = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_paths(&lookup).into_iter().find(|p| p.is_file()),
    };

    let mut config = match &source {
        Some(path) => {
            debug!("Loading configuration from {}", path.display());
            AppConfig::from_file(path)?
        }
        None => {
            debug!("No configuration file found, using defaults");
            AppConfig::default()
        }
    };

    config.apply_env(&lookup);
    config.validate()?;
    Ok((config, source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.tools.ffprobe, "ffprobe");
        assert_eq!(config.tags.required, vec!["title", "artist"]);
        assert_eq!(config.logging.level, "warn");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = AppConfig::from_toml("[tags]\nrequired = [\"title\"]\n").unwrap();
        assert_eq!(config.tags.required, vec!["title"]);
        assert_eq!(config.tags.suggested, TagsConfig::default().suggested);
        assert_eq!(config.tools, ToolsConfig::default());
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(AppConfig::from_toml("[tools]\nffplay = \"x\"\n").is_err());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        std::fs::write(&path, "[logging]\nlevel = \"chatty\"\n").unwrap();
        let err = AppConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, FfmetaError::Config { .. }));

        std::fs::write(&path, "[tags]\nrequired = [\"title\", \" \"]\n").unwrap();
        assert!(AppConfig::from_file(&path).is_err());
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[tools]\nffprobe = \"/opt/ffprobe\"\nffmpeg = \"/opt/ffmpeg\"\n").unwrap();

        let (config, source) =
            load_config(Some(&path), env(&[(FFMPEG_ENV, "/usr/local/bin/ffmpeg")])).unwrap();
        assert_eq!(source.as_deref(), Some(path.as_path()));
        assert_eq!(config.tools.ffprobe, "/opt/ffprobe");
        assert_eq!(config.tools.ffmpeg, "/usr/local/bin/ffmpeg");
    }

    #[test]
    fn test_config_env_path_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[logging]\nformat = \"json\"\n").unwrap();
        let path_str = path.to_string_lossy().to_string();

        let (config, source) = load_config(None, env(&[(CONFIG_ENV, path_str.as_str())])).unwrap();
        assert_eq!(source, Some(path));
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let err = load_config(Some(Path::new("/no/such/ffmeta.toml")), env(&[])).unwrap_err();
        assert!(matches!(err, FfmetaError::Config { .. }));
    }

    #[test]
    fn test_default_paths_order() {
        let paths = default_config_paths(env(&[("HOME", "/home/u")]));
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/home/u/.config/ffmeta/config.toml"),
                PathBuf::from("ffmeta.toml"),
            ]
        );

        let paths = default_config_paths(env(&[("XDG_CONFIG_HOME", "/xdg"), ("HOME", "/home/u")]));
        assert_eq!(paths[0], PathBuf::from("/xdg/ffmeta/config.toml"));
    }
}
