//! Configuration file support for portscout.
//!
//! Configuration is loaded from multiple sources with the following priority (highest first):
//! 1. Command-line arguments and environment variables (PORTSCOUT_*)
//! 2. Local config file (./portscout.toml)
//! 3. Global config file (~/.config/portscout/config.toml)
//!
//! An explicit `--config PATH` replaces both files.

use anyhow::Context;
use directories::ProjectDirs;
use log::{debug, info, warn};
use portscout::{BridgePaths, DiscoveryConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the per-directory config file.
pub(crate) const LOCAL_CONFIG_FILE: &str = "portscout.toml";

/// Candidate label used for the bridge when none is configured.
pub(crate) const DEFAULT_BRIDGE_LABEL: &str = "BRIDGE";

/// Serial discovery and connection settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SerialSettings {
    /// Additional ports, blacklist and last used port.
    #[serde(flatten)]
    pub discovery: DiscoveryConfig,
    /// Default baud rate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baud: Option<u32>,
}

/// File bridge settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BridgeSettings {
    /// Candidate name routed to the bridge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// File the companion process writes device output to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<PathBuf>,
    /// File the companion process reads commands from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Serial configuration.
    #[serde(default)]
    pub serial: SerialSettings,
    /// Bridge configuration.
    #[serde(default)]
    pub bridge: BridgeSettings,
    /// File this configuration was loaded from explicitly, if any.
    #[serde(skip)]
    origin: Option<PathBuf>,
}

impl Config {
    /// Load configuration from all available sources.
    pub fn load() -> Self {
        let mut config = Self::default();

        // Load global config
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global_config) = Self::load_from_file(&global_path) {
                debug!("Loaded global config from {}", global_path.display());
                config.merge(global_config);
            }
        }

        // Load local config (overrides global)
        if let Some(local_config) = Self::load_from_file(Path::new(LOCAL_CONFIG_FILE)) {
            debug!("Loaded local config from {LOCAL_CONFIG_FILE}");
            config.merge(local_config);
        }

        config
    }

    /// Load configuration from a specific file path (--config flag).
    pub fn load_from_path(path: &Path) -> Self {
        let mut config = if let Some(config) = Self::load_from_file(path) {
            debug!("Loaded config from {}", path.display());
            config
        } else {
            warn!(
                "Could not load config from {}, using defaults",
                path.display()
            );
            Self::default()
        };
        config.origin = Some(path.to_path_buf());
        config
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }

        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => Some(config),
                Err(e) => {
                    warn!("Failed to parse config file {}: {}", path.display(), e);
                    None
                },
            },
            Err(e) => {
                warn!("Failed to read config file {}: {}", path.display(), e);
                None
            },
        }
    }

    /// Get the global configuration directory.
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "portscout").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the global configuration file path.
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Merge another config into this one.
    fn merge(&mut self, other: Self) {
        let discovery = other.serial.discovery;
        if discovery.port.is_some() {
            self.serial.discovery.port = discovery.port;
        }
        self.serial
            .discovery
            .additional_ports
            .extend(discovery.additional_ports);
        self.serial
            .discovery
            .blacklisted_ports
            .extend(discovery.blacklisted_ports);
        if other.serial.baud.is_some() {
            self.serial.baud = other.serial.baud;
        }

        if other.bridge.label.is_some() {
            self.bridge.label = other.bridge.label;
        }
        if other.bridge.input.is_some() {
            self.bridge.input = other.bridge.input;
        }
        if other.bridge.output.is_some() {
            self.bridge.output = other.bridge.output;
        }
    }

    /// Discovery inputs for the resolver.
    pub fn discovery(&self) -> &DiscoveryConfig {
        &self.serial.discovery
    }

    /// Mutable discovery inputs, for applying command-line overrides.
    pub fn discovery_mut(&mut self) -> &mut DiscoveryConfig {
        &mut self.serial.discovery
    }

    /// Bridge label and files, when both files are configured.
    pub fn bridge_paths(&self) -> Option<(String, BridgePaths)> {
        match (&self.bridge.input, &self.bridge.output) {
            (Some(input), Some(output)) => {
                let label = self
                    .bridge
                    .label
                    .clone()
                    .unwrap_or_else(|| DEFAULT_BRIDGE_LABEL.to_string());
                Some((label, BridgePaths::new(input, output)))
            },
            _ => None,
        }
    }

    /// Where a remembered port is written.
    ///
    /// The explicit config file if one was given, otherwise the local file if
    /// it exists, otherwise the global file.
    fn remember_target(&self) -> PathBuf {
        if let Some(origin) = &self.origin {
            return origin.clone();
        }
        if Path::new(LOCAL_CONFIG_FILE).exists() {
            return PathBuf::from(LOCAL_CONFIG_FILE);
        }
        Self::global_config_path().unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }

    /// Remember `port` as the last successfully used port.
    ///
    /// Only the target file is rewritten, so settings merged in from other
    /// files are not copied into it. A target that exists but cannot be read
    /// or parsed is left untouched and reported as an error.
    pub fn remember_port(&mut self, port: &str) -> anyhow::Result<PathBuf> {
        let path = self.remember_target();

        let mut stored = if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            toml::from_str::<Self>(&content).with_context(|| {
                format!(
                    "Refusing to overwrite unparsable config file {}",
                    path.display()
                )
            })?
        } else {
            Self::default()
        };
        stored.serial.discovery.port = Some(port.to_string());

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = toml::to_string_pretty(&stored)?;
        fs::write(&path, content)?;
        info!("Saved last used port to {}", path.display());

        self.serial.discovery.port = Some(port.to_string());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---- Default values ----

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.discovery().port.is_none());
        assert!(config.discovery().additional_ports.is_empty());
        assert!(config.discovery().blacklisted_ports.is_empty());
        assert!(config.serial.baud.is_none());
        assert!(config.bridge_paths().is_none());
    }

    // ---- Config merge ----

    #[test]
    fn test_config_merge_port_and_baud() {
        let mut base = Config::default();
        base.serial.baud = Some(115200);

        let mut other = Config::default();
        other.serial.discovery.port = Some("/dev/ttyACM0".to_string());
        other.serial.baud = Some(250000);

        base.merge(other);

        assert_eq!(base.discovery().port.as_deref(), Some("/dev/ttyACM0"));
        assert_eq!(base.serial.baud, Some(250000));
    }

    #[test]
    fn test_config_merge_does_not_overwrite_with_none() {
        let mut base = Config::default();
        base.serial.discovery.port = Some("/dev/ttyUSB0".to_string());
        base.serial.baud = Some(115200);
        base.bridge.label = Some("VIRTUAL".to_string());

        base.merge(Config::default());

        assert_eq!(base.discovery().port.as_deref(), Some("/dev/ttyUSB0"));
        assert_eq!(base.serial.baud, Some(115200));
        assert_eq!(base.bridge.label.as_deref(), Some("VIRTUAL"));
    }

    #[test]
    fn test_config_merge_pattern_lists_extend() {
        let mut base = Config::default();
        base.serial
            .discovery
            .blacklisted_ports
            .push("/dev/ttyS*".to_string());

        let mut other = Config::default();
        other
            .serial
            .discovery
            .blacklisted_ports
            .push("/dev/rfcomm*".to_string());
        other
            .serial
            .discovery
            .additional_ports
            .push("/dev/serial/by-id/*".to_string());

        base.merge(other);

        assert_eq!(
            base.discovery().blacklisted_ports,
            vec!["/dev/ttyS*", "/dev/rfcomm*"]
        );
        assert_eq!(base.discovery().additional_ports, vec!["/dev/serial/by-id/*"]);
    }

    // ---- TOML serialization/deserialization ----

    #[test]
    fn test_config_from_toml() {
        let toml_str = r#"
[serial]
port = "/dev/ttyACM0"
baud = 250000
additional_ports = ["/dev/ttyS*"]
blacklisted_ports = ["/dev/ttyUSB*", "/dev/rfcomm*"]

[bridge]
label = "VIRTUAL"
input = "/data/home/input"
output = "/data/home/output"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.discovery().port.as_deref(), Some("/dev/ttyACM0"));
        assert_eq!(config.serial.baud, Some(250000));
        assert_eq!(config.discovery().additional_ports, vec!["/dev/ttyS*"]);
        assert_eq!(config.discovery().blacklisted_ports.len(), 2);

        let (label, paths) = config.bridge_paths().unwrap();
        assert_eq!(label, "VIRTUAL");
        assert_eq!(paths.input, PathBuf::from("/data/home/input"));
        assert_eq!(paths.output, PathBuf::from("/data/home/output"));
    }

    #[test]
    fn test_config_from_empty_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.discovery().port.is_none());
        assert!(config.bridge_paths().is_none());
    }

    #[test]
    fn test_bridge_requires_both_files() {
        let toml_str = r#"
[bridge]
input = "/data/home/input"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert!(config.bridge_paths().is_none());
    }

    #[test]
    fn test_bridge_default_label() {
        let toml_str = r#"
[bridge]
input = "/data/home/input"
output = "/data/home/output"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        let (label, _) = config.bridge_paths().unwrap();
        assert_eq!(label, DEFAULT_BRIDGE_LABEL);
    }

    #[test]
    fn test_config_roundtrip_toml() {
        let mut config = Config::default();
        config.serial.discovery.port = Some("COM3".to_string());
        config.serial.baud = Some(115200);
        config
            .serial
            .discovery
            .blacklisted_ports
            .push("COM1".to_string());

        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();

        assert_eq!(deserialized.discovery().port.as_deref(), Some("COM3"));
        assert_eq!(deserialized.serial.baud, Some(115200));
        assert_eq!(deserialized.discovery().blacklisted_ports, vec!["COM1"]);
    }

    // ---- load_from_path / remember_port with tempfile ----

    #[test]
    fn test_load_from_path_valid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test_config.toml");
        fs::write(
            &path,
            r#"
[serial]
port = "/dev/ttyUSB1"
"#,
        )
        .unwrap();

        let config = Config::load_from_path(&path);
        assert_eq!(config.discovery().port.as_deref(), Some("/dev/ttyUSB1"));
    }

    #[test]
    fn test_load_from_path_nonexistent() {
        let config = Config::load_from_path(Path::new("/nonexistent/path/config.toml"));
        assert!(config.discovery().port.is_none());
    }

    #[test]
    fn test_remember_port_writes_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portscout.toml");
        fs::write(
            &path,
            r#"
[serial]
blacklisted_ports = ["/dev/ttyS*"]
"#,
        )
        .unwrap();

        let mut config = Config::load_from_path(&path);
        let written = config.remember_port("/dev/ttyACM0").unwrap();

        assert_eq!(written, path);
        assert_eq!(config.discovery().port.as_deref(), Some("/dev/ttyACM0"));

        let reloaded = Config::load_from_path(&path);
        assert_eq!(reloaded.discovery().port.as_deref(), Some("/dev/ttyACM0"));
        assert_eq!(reloaded.discovery().blacklisted_ports, vec!["/dev/ttyS*"]);
    }

    #[test]
    fn test_remember_port_keeps_unparsable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portscout.toml");
        let original = r#"
[serial]
blacklisted_ports = ["/dev/ttyS*"]
baud = "fast"
"#;
        fs::write(&path, original).unwrap();

        let mut config = Config::load_from_path(&path);
        let err = config.remember_port("/dev/ttyACM0").unwrap_err();

        assert!(err.to_string().contains("portscout.toml"));
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
        assert!(config.discovery().port.is_none());
    }

    // ---- global_config_path ----

    #[test]
    fn test_global_config_path_is_some() {
        // On most systems this should return Some
        if let Some(p) = Config::global_config_path() {
            assert!(p.to_str().unwrap().contains("portscout"));
            assert!(p.to_str().unwrap().ends_with("config.toml"));
        }
    }
}
