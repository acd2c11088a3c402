use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::dashboard::{DashboardOptions, Role};
use crate::tui::config::{Action, RuntimeConfig};
use crate::tui::ThemeVariant;

pub const DEFAULT_LOG_FILE: &str = "school-portal.log";

fn default_log_file() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_FILE)
}

fn default_simulated_load_ms() -> u64 {
    400
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub theme: ThemeVariant,

    /// Skip the role picker and sign straight in
    #[serde(default)]
    pub default_role: Option<Role>,

    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,

    /// Delay applied to screens that load on demand
    #[serde(default = "default_simulated_load_ms")]
    pub simulated_load_ms: u64,

    /// Action name -> key, e.g. `search = "Ctrl+F"`
    #[serde(default)]
    pub keybinds: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: ThemeVariant::default(),
            default_role: None,
            log_file: default_log_file(),
            simulated_load_ms: default_simulated_load_ms(),
            keybinds: Action::ALL
                .iter()
                .map(|a| (a.as_str().to_string(), a.default_binding().to_string()))
                .collect(),
        }
    }
}

impl Config {
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "linux") {
            // Use XDG config directory on Linux
            dirs::config_dir()
                .context("Failed to get XDG config directory")?
                .join("school-portal")
        } else {
            dirs::home_dir()
                .context("Failed to get home directory")?
                .join(".school-portal")
        };
        Ok(config_dir.join("config.toml"))
    }

    /// Load from `path`, or from the default location when None. A missing
    /// file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::get_config_path()?,
        };
        debug!("Loading config from: {:?}", config_path);

        if !config_path.exists() {
            info!("Config file doesn't exist, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;
        let config: Config =
            toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", config_path))?;

        debug!("Loaded config with {} keybinds", config.keybinds.len());
        Ok(config)
    }

    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::get_config_path()?,
        };
        if let Some(dir) = config_path.parent().filter(|d| !d.as_os_str().is_empty()) {
            if !dir.exists() {
                fs::create_dir_all(dir).with_context(|| format!("Failed to create config directory: {:?}", dir))?;
                info!("Created config directory: {:?}", dir);
            }
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;
        fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        info!("Config saved to {:?}", config_path);
        Ok(config_path)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config to TOML")
    }

    pub fn runtime_config(&self) -> RuntimeConfig {
        let keybinds: HashMap<String, String> = self.keybinds.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        RuntimeConfig::from_settings(self.theme, &keybinds)
    }

    pub fn dashboard_options(&self) -> DashboardOptions {
        DashboardOptions::with_load_delay(Duration::from_millis(self.simulated_load_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyCode;
    use crate::tui::KeyBinding;

    #[test]
    fn test_missing_fields_take_defaults() {
        let config: Config = toml::from_str("theme = \"latte\"\n").unwrap();
        assert_eq!(config.theme, ThemeVariant::Latte);
        assert_eq!(config.simulated_load_ms, 400);
        assert_eq!(config.log_file, PathBuf::from(DEFAULT_LOG_FILE));
        assert!(config.keybinds.is_empty());
        assert_eq!(config.runtime_config().binding(Action::Quit), Action::Quit.default_binding());
    }

    #[test]
    fn test_keybind_overrides_reach_runtime_config() {
        let config: Config = toml::from_str(
            r#"
            default_role = "parent"
            [keybinds]
            search = "/"
            "#,
        )
        .unwrap();
        assert_eq!(config.default_role, Some(Role::Parent));
        assert_eq!(config.runtime_config().binding(Action::Search), KeyBinding::new(KeyCode::Char('/')));
    }

    #[test]
    fn test_default_serializes_every_action() {
        let text = Config::default().to_toml().unwrap();
        for action in Action::ALL {
            assert!(text.contains(action.as_str()), "missing {}", action);
        }
    }

    #[test]
    fn test_bad_toml_is_reported_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "theme = [").unwrap();
        let err = Config::load(Some(&path)).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse config file"));
    }
}
