//! Bootstrap settings.
//!
//! Every field has a default matching the fixed prototype constants, so an
//! absent config file, or a file that sets only a few fields, is valid.
//!
//! Lookup order:
//! 1. `DX12GAME_PROTO_CONFIG` environment variable (path to a JSON file)
//! 2. `<config dir>/dx12game-proto/config.json`
//!
//! A file named through the environment variable must exist. Only the
//! implicit location falls back to defaults when absent.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ProtoError, ProtoResult};
use crate::graphics::{AdapterPreference, CommandQueueConfig, DeviceConfig, SwapChainConfig};
use crate::window::types::MAX_CLIENT_DIMENSION;
use crate::window::WindowConfig;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "DX12GAME_PROTO_CONFIG";

/// Directory under the platform config dir
const CONFIG_DIR_NAME: &str = "dx12game-proto";

const CONFIG_FILE_NAME: &str = "config.json";

/// Message loop behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageLoopConfig {
    /// Sleep when the queue is empty; 0 spins
    pub idle_sleep_ms: u64,
    /// Block on a line from stdin after the window closes
    pub wait_for_enter_on_exit: bool,
}

impl Default for MessageLoopConfig {
    fn default() -> Self {
        Self {
            idle_sleep_ms: 1,
            wait_for_enter_on_exit: false,
        }
    }
}

/// Complete bootstrap configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub adapter: AdapterPreference,
    pub device: DeviceConfig,
    pub commands: CommandQueueConfig,
    pub swap_chain: SwapChainConfig,
    pub message_loop: MessageLoopConfig,
}

impl AppConfig {
    /// Load from the environment-selected or default location.
    pub fn load() -> ProtoResult<Self> {
        Self::load_at(config_location())
    }

    /// Load from a resolved location.
    ///
    /// An explicit path is always read, so a missing file is `ConfigIo`.
    /// A missing file at the default location gives the defaults.
    pub fn load_at(location: Option<ConfigLocation>) -> ProtoResult<Self> {
        match location {
            Some(ConfigLocation::Explicit(path)) => Self::load_from(&path),
            Some(ConfigLocation::Default(path)) if path.exists() => Self::load_from(&path),
            Some(ConfigLocation::Default(path)) => {
                log::debug!("[AppConfig::load] No config at {:?}, using defaults", path);
                Ok(Self::default())
            }
            None => {
                log::debug!("[AppConfig::load] No config directory, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load and validate a JSON config file.
    pub fn load_from(path: &Path) -> ProtoResult<Self> {
        let text = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&text)?;
        config.validate()?;
        log::info!("[AppConfig::load] Loaded config from {:?}", path);
        Ok(config)
    }

    /// Reject values the bootstrap cannot work with.
    pub fn validate(&self) -> ProtoResult<()> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ProtoError::InvalidConfig {
                field: "window",
                reason: format!(
                    "client size must be non-zero, got {}x{}",
                    self.window.width, self.window.height
                ),
            });
        }
        if self.window.width > MAX_CLIENT_DIMENSION || self.window.height > MAX_CLIENT_DIMENSION {
            return Err(ProtoError::InvalidConfig {
                field: "window",
                reason: format!(
                    "client size {}x{} exceeds {} per edge",
                    self.window.width, self.window.height, MAX_CLIENT_DIMENSION
                ),
            });
        }
        if self.window.class_name.is_empty() {
            return Err(ProtoError::InvalidConfig {
                field: "window.class_name",
                reason: "must not be empty".to_string(),
            });
        }
        if self.device.feature_levels.is_empty() {
            return Err(ProtoError::InvalidConfig {
                field: "device.feature_levels",
                reason: "at least one feature level is required".to_string(),
            });
        }
        self.swap_chain.validate()
    }
}

/// Where a config file was looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigLocation {
    /// Named by `DX12GAME_PROTO_CONFIG`; must exist
    Explicit(PathBuf),
    /// The per-user config directory; may be absent
    Default(PathBuf),
}

impl ConfigLocation {
    pub fn path(&self) -> &Path {
        match self {
            ConfigLocation::Explicit(path) | ConfigLocation::Default(path) => path,
        }
    }
}

/// Pick the explicit path if one is set, else the file under `config_dir`.
pub fn resolve_location(
    explicit: Option<OsString>,
    config_dir: Option<PathBuf>,
) -> Option<ConfigLocation> {
    match explicit {
        Some(path) if !path.is_empty() => Some(ConfigLocation::Explicit(PathBuf::from(path))),
        _ => config_dir
            .map(|dir| ConfigLocation::Default(dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))),
    }
}

/// Resolve where the config file should live for this process.
pub fn config_location() -> Option<ConfigLocation> {
    resolve_location(std::env::var_os(CONFIG_ENV_VAR), dirs::config_dir())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::FeatureLevel;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "dx12game-proto-{}-{}.json",
            name,
            std::process::id()
        ));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.message_loop.idle_sleep_ms, 1);
        assert!(!config.message_loop.wait_for_enter_on_exit);
    }

    #[test]
    fn empty_object_gives_defaults() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn partial_file_overrides_only_named_fields() {
        let config: AppConfig = serde_json::from_str(
            r#"{
                "window": { "title": "Custom" },
                "adapter": { "description_contains": "AMD" },
                "device": { "feature_levels": ["11_0"] }
            }"#,
        )
        .unwrap();

        assert_eq!(config.window.title, "Custom");
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.adapter.description_contains.as_deref(), Some("AMD"));
        assert!(config.adapter.allow_software);
        assert_eq!(config.device.feature_levels, vec![FeatureLevel::Level11_0]);
    }

    #[test]
    fn null_adapter_substring_means_system_default() {
        let config: AppConfig =
            serde_json::from_str(r#"{ "adapter": { "description_contains": null } }"#).unwrap();
        assert_eq!(config.adapter.description_contains, None);
    }

    #[test]
    fn zero_size_rejected() {
        let mut config = AppConfig::default();
        config.window.height = 0;
        assert!(matches!(
            config.validate(),
            Err(ProtoError::InvalidConfig { field: "window", .. })
        ));
    }

    #[test]
    fn empty_class_name_rejected() {
        let mut config = AppConfig::default();
        config.window.class_name.clear();
        assert!(matches!(
            config.validate(),
            Err(ProtoError::InvalidConfig { field: "window.class_name", .. })
        ));
    }

    #[test]
    fn empty_feature_levels_rejected() {
        let mut config = AppConfig::default();
        config.device.feature_levels.clear();
        assert!(matches!(
            config.validate(),
            Err(ProtoError::InvalidConfig { field: "device.feature_levels", .. })
        ));
    }

    #[test]
    fn swap_chain_validation_is_included() {
        let mut config = AppConfig::default();
        config.swap_chain.buffer_count = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_from_file() {
        let path = write_temp("valid", r#"{ "message_loop": { "idle_sleep_ms": 0 } }"#);
        let config = AppConfig::load_from(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(config.message_loop.idle_sleep_ms, 0);
    }

    #[test]
    fn load_from_malformed_file_is_parse_error() {
        let path = write_temp("malformed", "{ not json");
        let result = AppConfig::load_from(&path);
        fs::remove_file(&path).ok();

        assert!(matches!(result, Err(ProtoError::ConfigParse(_))));
    }

    #[test]
    fn load_from_invalid_values_is_rejected() {
        let path = write_temp("invalid", r#"{ "window": { "width": 0 } }"#);
        let result = AppConfig::load_from(&path);
        fs::remove_file(&path).ok();

        assert!(matches!(result, Err(ProtoError::InvalidConfig { .. })));
    }

    #[test]
    fn load_from_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("dx12game-proto-does-not-exist.json");
        assert!(matches!(AppConfig::load_from(&path), Err(ProtoError::ConfigIo(_))));
    }

    #[test]
    fn oversized_client_rejected() {
        let mut config = AppConfig::default();
        config.window.width = MAX_CLIENT_DIMENSION + 1;
        assert!(matches!(
            config.validate(),
            Err(ProtoError::InvalidConfig { field: "window", .. })
        ));

        config.window.width = MAX_CLIENT_DIMENSION;
        config.window.height = MAX_CLIENT_DIMENSION;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn explicit_path_wins_over_config_dir() {
        let location = resolve_location(
            Some(OsString::from("/tmp/custom.json")),
            Some(PathBuf::from("/home/user/.config")),
        );
        assert_eq!(
            location,
            Some(ConfigLocation::Explicit(PathBuf::from("/tmp/custom.json")))
        );
    }

    #[test]
    fn config_dir_used_without_explicit_path() {
        let dir = PathBuf::from("/home/user/.config");
        let expected = dir.join("dx12game-proto").join("config.json");

        let location = resolve_location(None, Some(dir.clone()));
        assert_eq!(location, Some(ConfigLocation::Default(expected.clone())));

        // An empty variable counts as unset
        let location = resolve_location(Some(OsString::new()), Some(dir));
        assert_eq!(location, Some(ConfigLocation::Default(expected)));

        assert_eq!(resolve_location(None, None), None);
    }

    #[test]
    fn env_var_selects_explicit_location() {
        let path = std::env::temp_dir().join("dx12game-proto-env-selected.json");
        std::env::set_var(CONFIG_ENV_VAR, &path);
        let location = config_location();
        std::env::remove_var(CONFIG_ENV_VAR);

        assert_eq!(location, Some(ConfigLocation::Explicit(path.clone())));
        assert_eq!(location.unwrap().path(), path.as_path());
    }

    #[test]
    fn missing_explicit_file_is_io_error() {
        let location = ConfigLocation::Explicit(PathBuf::from("/nonexistent/typo/config.json"));
        assert!(matches!(
            AppConfig::load_at(Some(location)),
            Err(ProtoError::ConfigIo(_))
        ));
    }

    #[test]
    fn missing_default_file_gives_defaults() {
        let location = ConfigLocation::Default(
            std::env::temp_dir()
                .join("dx12game-proto-no-such-dir")
                .join("config.json"),
        );
        assert_eq!(AppConfig::load_at(Some(location)).unwrap(), AppConfig::default());
        assert_eq!(AppConfig::load_at(None).unwrap(), AppConfig::default());
    }

    #[test]
    fn existing_explicit_file_is_loaded() {
        let path = write_temp("explicit", r#"{ "window": { "title": "Explicit" } }"#);
        let result = AppConfig::load_at(Some(ConfigLocation::Explicit(path.clone())));
        fs::remove_file(&path).ok();

        assert_eq!(result.unwrap().window.title, "Explicit");
    }

    #[test]
    fn round_trips_through_json() {
        let mut config = AppConfig::default();
        config.swap_chain.buffer_count = 3;
        config.device.debug_layer = true;

        let json = serde_json::to_string_pretty(&config).unwrap();
        let back: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
