pub mod cli;
pub mod config;
pub mod dashboard;
pub mod nav;
pub mod screens;
pub mod store;
pub mod tui;
