pub mod config;
pub mod launch;
pub mod screens;

pub use config::config_command;
pub use launch::launch_command;
pub use screens::screens_command;
