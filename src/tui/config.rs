use arc_swap::ArcSwap;
use crossterm::event::{KeyCode, KeyEvent};
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::{KeyBinding, Theme, ThemeVariant};

/// Global chrome actions that can be rebound from the config file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    Back,
    Search,
    Notifications,
    Refresh,
    Logout,
    Quit,
    NextTab,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::Back,
        Action::Search,
        Action::Notifications,
        Action::Refresh,
        Action::Logout,
        Action::Quit,
        Action::NextTab,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Back => "back",
            Action::Search => "search",
            Action::Notifications => "notifications",
            Action::Refresh => "refresh",
            Action::Logout => "logout",
            Action::Quit => "quit",
            Action::NextTab => "next_tab",
        }
    }

    pub fn default_binding(self) -> KeyBinding {
        match self {
            Action::Back => KeyBinding::new(KeyCode::Esc),
            Action::Search => KeyBinding::ctrl(KeyCode::Char('f')),
            Action::Notifications => KeyBinding::ctrl(KeyCode::Char('n')),
            Action::Refresh => KeyBinding::new(KeyCode::F(5)),
            Action::Logout => KeyBinding::ctrl(KeyCode::Char('l')),
            Action::Quit => KeyBinding::ctrl(KeyCode::Char('q')),
            Action::NextTab => KeyBinding::new(KeyCode::Tab),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown action '{}'", s))
    }
}

/// Settings the running UI reads every frame
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub theme: Theme,
    pub keybinds: HashMap<Action, KeyBinding>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            theme: Theme::new(ThemeVariant::default()),
            keybinds: Action::ALL.into_iter().map(|a| (a, a.default_binding())).collect(),
        }
    }
}

impl RuntimeConfig {
    /// Build from the theme and the raw `[keybinds]` table of the config file.
    ///
    /// Unknown actions and unparseable keys are logged and skipped; the
    /// action keeps its default binding.
    pub fn from_settings(theme: ThemeVariant, keybinds: &HashMap<String, String>) -> Self {
        let mut config = Self {
            theme: Theme::new(theme),
            ..Self::default()
        };
        for (name, key) in keybinds {
            let action = match name.parse::<Action>() {
                Ok(action) => action,
                Err(e) => {
                    log::warn!("Ignoring keybind: {}", e);
                    continue;
                }
            };
            match key.parse::<KeyBinding>() {
                Ok(binding) => {
                    config.keybinds.insert(action, binding);
                }
                Err(e) => log::warn!("Ignoring keybind for {}: {}", action, e),
            }
        }
        config
    }

    pub fn binding(&self, action: Action) -> KeyBinding {
        self.keybinds.get(&action).copied().unwrap_or_else(|| action.default_binding())
    }

    pub fn matches(&self, action: Action, key: &KeyEvent) -> bool {
        self.binding(action).matches(key)
    }
}

static RUNTIME_CONFIG: OnceCell<ArcSwap<RuntimeConfig>> = OnceCell::new();

/// Current runtime config; defaults until [`init_runtime_config`] is called
pub fn global_runtime_config() -> Arc<RuntimeConfig> {
    RUNTIME_CONFIG
        .get_or_init(|| ArcSwap::from_pointee(RuntimeConfig::default()))
        .load_full()
}

/// Install the startup config. Later calls replace it, same as a reload.
pub fn init_runtime_config(config: RuntimeConfig) {
    if let Err(rejected) = RUNTIME_CONFIG.set(ArcSwap::from_pointee(config)) {
        if let Some(current) = RUNTIME_CONFIG.get() {
            current.store(rejected.load_full());
        }
    }
}

/// Swap in a new config (called when settings change)
pub fn reload_runtime_config(config: RuntimeConfig) {
    RUNTIME_CONFIG
        .get_or_init(|| ArcSwap::from_pointee(RuntimeConfig::default()))
        .store(Arc::new(config));
}
