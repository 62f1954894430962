//! Identity cache configuration with precedence and validation
use edgescope_core::{
    Error, Result, DEFAULT_MAX_EDGE_DEPTH, DEFAULT_REFRESH_DELAY_SECS, DEFAULT_REFRESH_RATE_SECS,
    EDGESCOPE_EDGE_DEVICE_ID_VAR, EDGESCOPE_MAX_EDGE_DEPTH_VAR, EDGESCOPE_REFRESH_DELAY_VAR,
    EDGESCOPE_REFRESH_RATE_VAR, EDGESCOPE_STORE_DIR_VAR,
};
use edgescope_utils::XdgPaths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for a [`DeviceScopeIdentitiesCache`](crate::DeviceScopeIdentitiesCache)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityCacheConfig {
    /// Id of the local edge device; root of every authentication chain
    pub edge_device_id: String,
    /// Interval between scheduled full refreshes
    pub refresh_rate: Duration,
    /// Window during which repeated targeted refreshes of one id are suppressed
    pub refresh_delay: Duration,
    /// Maximum number of edge devices on a chain, root included
    pub max_edge_depth: usize,
    /// Directory for the file-backed identity store; in-memory when unset
    pub store_dir: Option<PathBuf>,
    /// Where the configuration came from
    #[serde(skip)]
    pub source: ConfigSource,
}

impl IdentityCacheConfig {
    /// Default configuration rooted at `edge_device_id`
    pub fn new(edge_device_id: impl Into<String>) -> Self {
        Self {
            edge_device_id: edge_device_id.into(),
            refresh_rate: Duration::from_secs(DEFAULT_REFRESH_RATE_SECS),
            refresh_delay: Duration::from_secs(DEFAULT_REFRESH_DELAY_SECS),
            max_edge_depth: DEFAULT_MAX_EDGE_DEPTH,
            store_dir: None,
            source: ConfigSource::Default,
        }
    }

    /// Check invariants the cache relies on
    pub fn validate(&self) -> Result<()> {
        if self.edge_device_id.trim().is_empty() {
            return Err(Error::configuration("edge device id must not be empty"));
        }
        if self.refresh_rate.is_zero() {
            return Err(Error::configuration("refresh rate must be greater than zero"));
        }
        if self.max_edge_depth == 0 {
            return Err(Error::configuration("max edge depth must be at least 1"));
        }
        Ok(())
    }
}

/// Source of configuration for debugging and precedence tracking
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default configuration
    #[default]
    Default,
    /// Configuration file
    ConfigFile(PathBuf),
    /// Environment variables
    EnvironmentVariable(String),
    /// Set in code through the builder
    Programmatic,
}

/// Builder for creating identity cache configurations
pub struct IdentityCacheConfigBuilder {
    config: IdentityCacheConfig,
}

impl IdentityCacheConfigBuilder {
    pub fn new(edge_device_id: impl Into<String>) -> Self {
        let mut config = IdentityCacheConfig::new(edge_device_id);
        config.source = ConfigSource::Programmatic;
        Self { config }
    }

    pub fn with_refresh_rate(mut self, refresh_rate: Duration) -> Self {
        self.config.refresh_rate = refresh_rate;
        self
    }

    /// Zero disables targeted-refresh debouncing
    pub fn with_refresh_delay(mut self, refresh_delay: Duration) -> Self {
        self.config.refresh_delay = refresh_delay;
        self
    }

    pub fn with_max_edge_depth(mut self, max_edge_depth: usize) -> Self {
        self.config.max_edge_depth = max_edge_depth;
        self
    }

    pub fn with_store_dir(mut self, store_dir: impl Into<PathBuf>) -> Self {
        self.config.store_dir = Some(store_dir.into());
        self
    }

    /// Validate and build the configuration
    pub fn build(self) -> Result<IdentityCacheConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Configuration loader that handles precedence: defaults, then the config
/// file, then `EDGESCOPE_*` environment variables.
///
/// Loaded configurations persist identities under the XDG state directory
/// unless a store directory is given.
pub struct IdentityCacheConfigLoader;

impl IdentityCacheConfigLoader {
    /// Load from the default config file location and the environment
    pub fn load() -> Result<IdentityCacheConfig> {
        Self::load_from(&Self::config_file_path())
    }

    /// Load using an explicit config file path
    pub fn load_from(config_path: &Path) -> Result<IdentityCacheConfig> {
        let mut config = IdentityCacheConfig::new(String::new());
        config.store_dir = Some(XdgPaths::identity_store_dir());

        if config_path.exists() {
            Self::apply_config_file(&mut config, config_path)?;
        }
        Self::apply_env(&mut config)?;

        config.validate()?;
        Ok(config)
    }

    /// `$XDG_CONFIG_HOME/edgescope/config.json`
    pub fn config_file_path() -> PathBuf {
        XdgPaths::config_dir().join("config.json")
    }

    fn apply_config_file(config: &mut IdentityCacheConfig, path: &Path) -> Result<()> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::file_system(path.to_path_buf(), "read config file", e))?;
        let file_config: serde_json::Value = serde_json::from_str(&content)?;

        let Some(section) = file_config.get("identityCache").and_then(|v| v.as_object()) else {
            return Ok(());
        };

        if let Some(id) = section.get("edgeDeviceId").and_then(|v| v.as_str()) {
            config.edge_device_id = id.to_string();
        }
        if let Some(secs) = section.get("refreshRateSecs").and_then(|v| v.as_u64()) {
            config.refresh_rate = Duration::from_secs(secs);
        }
        if let Some(secs) = section.get("refreshDelaySecs").and_then(|v| v.as_u64()) {
            config.refresh_delay = Duration::from_secs(secs);
        }
        if let Some(depth) = section.get("maxEdgeDepth").and_then(|v| v.as_u64()) {
            config.max_edge_depth = usize::try_from(depth)
                .map_err(|_| Error::configuration("maxEdgeDepth out of range"))?;
        }
        if let Some(dir) = section.get("storeDir").and_then(|v| v.as_str()) {
            config.store_dir = Some(PathBuf::from(dir));
        }

        config.source = ConfigSource::ConfigFile(path.to_path_buf());
        Ok(())
    }

    fn apply_env(config: &mut IdentityCacheConfig) -> Result<()> {
        let mut has_env_config = false;

        if let Ok(id) = std::env::var(EDGESCOPE_EDGE_DEVICE_ID_VAR) {
            config.edge_device_id = id;
            has_env_config = true;
        }
        if let Some(secs) = parse_env::<u64>(EDGESCOPE_REFRESH_RATE_VAR)? {
            config.refresh_rate = Duration::from_secs(secs);
            has_env_config = true;
        }
        if let Some(secs) = parse_env::<u64>(EDGESCOPE_REFRESH_DELAY_VAR)? {
            config.refresh_delay = Duration::from_secs(secs);
            has_env_config = true;
        }
        if let Some(depth) = parse_env::<usize>(EDGESCOPE_MAX_EDGE_DEPTH_VAR)? {
            config.max_edge_depth = depth;
            has_env_config = true;
        }
        if let Ok(dir) = std::env::var(EDGESCOPE_STORE_DIR_VAR) {
            config.store_dir = Some(PathBuf::from(dir));
            has_env_config = true;
        }

        if has_env_config {
            config.source = ConfigSource::EnvironmentVariable("EDGESCOPE_*".to_string());
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| Error::configuration(format!("{name} has invalid value '{raw}'"))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    const ALL_VARS: [&str; 5] = [
        EDGESCOPE_EDGE_DEVICE_ID_VAR,
        EDGESCOPE_REFRESH_RATE_VAR,
        EDGESCOPE_REFRESH_DELAY_VAR,
        EDGESCOPE_MAX_EDGE_DEPTH_VAR,
        EDGESCOPE_STORE_DIR_VAR,
    ];

    fn clear_env() {
        for var in ALL_VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_defaults() {
        let config = IdentityCacheConfig::new("edge1");
        assert_eq!(config.refresh_rate, Duration::from_secs(3600));
        assert_eq!(config.refresh_delay, Duration::from_secs(120));
        assert_eq!(config.max_edge_depth, 5);
        assert_eq!(config.source, ConfigSource::Default);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_validates() {
        assert!(IdentityCacheConfigBuilder::new("  ").build().is_err());
        assert!(IdentityCacheConfigBuilder::new("edge1")
            .with_max_edge_depth(0)
            .build()
            .is_err());
        assert!(IdentityCacheConfigBuilder::new("edge1")
            .with_refresh_rate(Duration::ZERO)
            .build()
            .is_err());

        let config = IdentityCacheConfigBuilder::new("edge1")
            .with_refresh_delay(Duration::ZERO)
            .with_store_dir("/var/lib/edgescope")
            .build()
            .unwrap();
        assert_eq!(config.source, ConfigSource::Programmatic);
        assert_eq!(config.store_dir, Some(PathBuf::from("/var/lib/edgescope")));
    }

    #[test]
    #[serial]
    fn test_file_then_env_precedence() {
        clear_env();
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"identityCache": {"edgeDeviceId": "edge-file", "refreshRateSecs": 60, "maxEdgeDepth": 3}}"#,
        )
        .unwrap();

        let config = IdentityCacheConfigLoader::load_from(&path).unwrap();
        assert_eq!(config.edge_device_id, "edge-file");
        assert_eq!(config.refresh_rate, Duration::from_secs(60));
        assert_eq!(config.store_dir, Some(XdgPaths::identity_store_dir()));
        assert_eq!(config.max_edge_depth, 3);
        assert_eq!(config.source, ConfigSource::ConfigFile(path.clone()));

        std::env::set_var(EDGESCOPE_REFRESH_RATE_VAR, "30");
        let config = IdentityCacheConfigLoader::load_from(&path).unwrap();
        assert_eq!(config.edge_device_id, "edge-file");
        assert_eq!(config.refresh_rate, Duration::from_secs(30));
        assert!(matches!(config.source, ConfigSource::EnvironmentVariable(_)));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_env_errors() {
        clear_env();
        let missing = PathBuf::from("/nonexistent/edgescope/config.json");

        // No edge device id anywhere
        assert!(IdentityCacheConfigLoader::load_from(&missing).is_err());

        std::env::set_var(EDGESCOPE_EDGE_DEVICE_ID_VAR, "edge-env");
        std::env::set_var(EDGESCOPE_MAX_EDGE_DEPTH_VAR, "deep");
        assert!(IdentityCacheConfigLoader::load_from(&missing).is_err());

        std::env::set_var(EDGESCOPE_MAX_EDGE_DEPTH_VAR, "4");
        let config = IdentityCacheConfigLoader::load_from(&missing).unwrap();
        assert_eq!(config.edge_device_id, "edge-env");
        assert_eq!(config.max_edge_depth, 4);
        clear_env();
    }
}
