//! `vrd.toml` project configuration.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

/// File name looked up in the working directory.
pub const CONFIG_FILE: &str = "vrd.toml";

/// Optional tool configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VrdConfig {
    /// Default jurisdiction code for freshly created documents (e.g. "MA").
    #[serde(default)]
    pub jurisdiction: Option<String>,
    /// Default log level (trace|debug|info|warn|error).
    #[serde(default)]
    pub log_level: Option<String>,
}

impl VrdConfig {
    /// Load the config from `dir/vrd.toml`; a missing file yields defaults.
    ///
    /// A `log_level` outside the known set is rejected, not silently
    /// downgraded; the stored value is normalized.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        let mut config: VrdConfig =
            toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
        if let Some(level) = config.log_level.take() {
            let normalized = normalize_level(&level)
                .with_context(|| format!("in {}", path.display()))?;
            config.log_level = Some(normalized.to_string());
        }
        Ok(config)
    }
}

/// Normalize a log level name, rejecting anything outside the known set.
pub fn normalize_level(level: &str) -> Result<&'static str> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => bail!("unsupported log level `{other}`; expected trace|debug|info|warn|error"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = VrdConfig::load(dir.path()).unwrap();
        assert!(config.jurisdiction.is_none());
        assert!(config.log_level.is_none());
    }

    #[test]
    fn minimal_config_parses() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "jurisdiction = \"MA\"\nlog_level = \"debug\"\n",
        )
        .unwrap();
        let config = VrdConfig::load(dir.path()).unwrap();
        assert_eq!(config.jurisdiction.as_deref(), Some("MA"));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn malformed_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "jurisdiction = [").unwrap();
        assert!(VrdConfig::load(dir.path()).is_err());
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "log_level = \"loud\"\n").unwrap();
        let err = VrdConfig::load(dir.path()).unwrap_err();
        assert!(format!("{err:#}").contains("unsupported log level `loud`"));
    }

    #[test]
    fn config_log_level_is_normalized() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "log_level = \"WARNING\"\n").unwrap();
        let config = VrdConfig::load(dir.path()).unwrap();
        assert_eq!(config.log_level.as_deref(), Some("warn"));
    }

    #[test]
    fn normalize_level_accepts_known_values() {
        assert_eq!(normalize_level("INFO").unwrap(), "info");
        assert_eq!(normalize_level(" warning ").unwrap(), "warn");
        assert_eq!(normalize_level("error").unwrap(), "error");
    }

    #[test]
    fn normalize_level_rejects_unknown_values() {
        let err = normalize_level("loud").unwrap_err();
        assert!(err.to_string().contains("unsupported log level"));
    }
}
