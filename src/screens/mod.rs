//! Leaf screens and the contract the navigation core mounts them through.
//!
//! Screens are thin views over the stores. Everything they need
//! arrives in [`ScreenProps`]: merged params, a [`Navigator`] for requesting
//! navigation, and the explicit [`SessionContext`] of the logged in user.

use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;

use crate::nav::{Navigator, Params, SessionContext};
use crate::tui::{KeyBinding, Theme};

pub mod chat;
pub mod messages;
pub mod notifications;
pub mod overview;
pub mod records;
pub mod settings;
pub mod students;
mod widgets;

pub use chat::ChatScreen;
pub use messages::MessagesScreen;
pub use notifications::NotificationsScreen;
pub use overview::OverviewScreen;
pub use records::{RecordKind, RecordScreen};
pub use settings::SettingsScreen;
pub use students::{StudentDetailScreen, StudentListScreen};

/// Inputs handed to a screen when it is mounted
#[derive(Debug, Clone)]
pub struct ScreenProps {
    /// Registry fixed params overlaid by the entry's params
    pub params: Params,
    pub navigator: Navigator,
    pub context: SessionContext,
}

/// A mounted, renderable screen.
///
/// A screen lives exactly as long as one render key; any navigation or forced
/// refresh drops it and mounts a fresh one.
pub trait Screen: Send {
    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme);

    /// Returns Ok(true) if the key was consumed
    fn handle_key(&mut self, _key: KeyEvent) -> Result<bool> {
        Ok(false)
    }

    /// Key hints shown in the footer of the content area
    fn key_hints(&self) -> Vec<(KeyBinding, &'static str)> {
        Vec::new()
    }
}

/// Creates a fresh [`Screen`] for each mount
pub trait ScreenFactory: Send + Sync {
    fn create(&self, props: ScreenProps) -> Result<Box<dyn Screen>>;
}

impl<F> ScreenFactory for F
where
    F: Fn(ScreenProps) -> Result<Box<dyn Screen>> + Send + Sync,
{
    fn create(&self, props: ScreenProps) -> Result<Box<dyn Screen>> {
        self(props)
    }
}
