pub mod config;
pub mod keybinding;
pub mod modal;
pub mod panels;
pub mod resource;
pub mod runtime;
pub mod theme;

pub use config::{Action, RuntimeConfig, global_runtime_config, init_runtime_config, reload_runtime_config};
pub use keybinding::KeyBinding;
pub use modal::ModalState;
pub use resource::Resource;
pub use runtime::{PortalRuntime, RolePicker};
pub use theme::{Theme, ThemeVariant};
