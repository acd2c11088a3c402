use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::widgets::Clear;
use std::panic::{AssertUnwindSafe, catch_unwind};

use super::loader::{LoadOutcome, Unit, panic_message};
use super::{NavigationSession, RegistryDescriptor, RenderKey, ScreenId, ScreenLoader, ViewRegistry};
use crate::screens::{Screen, ScreenProps};
use crate::tui::{KeyBinding, Resource, Theme, panels};

/// Identity of one mount; every remount gets a new one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MountId(u64);

/// What the host is currently showing for the top entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostStatus {
    Empty,
    Loading(ScreenId),
    Mounted(ScreenId),
    NotFound(ScreenId),
    Failed { screen: ScreenId, message: String },
}

enum Slot {
    Empty,
    Loading(ScreenId),
    Mounted {
        screen: ScreenId,
        mount: MountId,
        unit: Box<dyn Screen>,
    },
    NotFound(ScreenId),
    Failed {
        screen: ScreenId,
        message: String,
    },
}

/// Mounts the top stack entry and isolates the rest of the UI from it.
///
/// The mounted screen is keyed by the stack's [`RenderKey`]; when the key
/// changes the old screen is dropped and a new one is created. Missing
/// registry entries, failed loads, and errors or panics raised by the screen
/// all end in a panel inside the content area; nothing propagates out.
pub struct RenderHost {
    key: Option<RenderKey>,
    slot: Slot,
    next_mount: u64,
}

impl Default for RenderHost {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderHost {
    pub fn new() -> Self {
        Self {
            key: None,
            slot: Slot::Empty,
            next_mount: 0,
        }
    }

    /// Bring the host in line with the session's current top entry
    pub fn sync(&mut self, session: &NavigationSession, registry: &ViewRegistry, loader: &mut ScreenLoader) {
        let key = session.stack().render_key();
        if self.key == Some(key) {
            return;
        }
        self.unmount();
        self.key = Some(key);
        // a new entry or a forced refresh is the user asking again
        loader.retry(session.stack().top().screen);
        self.resolve(session, registry, loader);
    }

    /// Feed finished loads back in. Only a load for the screen the host is
    /// currently waiting on is acted upon; anything else belongs to an entry
    /// that has since been navigated away from and is dropped.
    pub fn on_loaded(
        &mut self,
        outcomes: Vec<LoadOutcome>,
        session: &NavigationSession,
        registry: &ViewRegistry,
        loader: &mut ScreenLoader,
    ) {
        for outcome in outcomes {
            let waiting = matches!(self.slot, Slot::Loading(screen) if screen == outcome.screen);
            if !waiting {
                log::debug!("Discarding stale load result for {}", outcome.screen);
                continue;
            }
            // the loader now holds either the unit or the failure
            self.resolve(session, registry, loader);
        }
    }

    fn resolve(&mut self, session: &NavigationSession, registry: &ViewRegistry, loader: &mut ScreenLoader) {
        let screen = session.stack().top().screen;
        let Some(descriptor) = registry.get(screen) else {
            log::warn!("View not found: {}", screen);
            self.slot = Slot::NotFound(screen);
            return;
        };

        match loader.resolve(descriptor) {
            Resource::Success(unit) => self.mount(unit, descriptor, session),
            Resource::Failure(message) => self.fail(screen, message),
            Resource::Loading => self.slot = Slot::Loading(screen),
        }
    }

    fn mount(&mut self, unit: Unit, descriptor: &RegistryDescriptor, session: &NavigationSession) {
        let entry = session.stack().top();
        let props = ScreenProps {
            params: entry.params.merged_over(&descriptor.fixed_params),
            navigator: session.navigator(),
            context: session.context().clone(),
        };

        match catch_unwind(AssertUnwindSafe(|| unit.create(props))) {
            Ok(Ok(screen_unit)) => {
                let mount = MountId(self.next_mount);
                self.next_mount += 1;
                log::debug!("Mounted {} as {:?} (entry {})", entry.screen, mount, entry.id.get());
                self.slot = Slot::Mounted {
                    screen: entry.screen,
                    mount,
                    unit: screen_unit,
                };
            }
            Ok(Err(e)) => self.fail(entry.screen, format!("{:#}", e)),
            Err(panic) => self.fail(entry.screen, format!("screen panicked: {}", panic_message(&panic))),
        }
    }

    fn fail(&mut self, screen: ScreenId, message: String) {
        log::error!("Screen {} failed: {}", screen, message);
        self.slot = Slot::Failed { screen, message };
    }

    fn unmount(&mut self) {
        if let Slot::Mounted { screen, mount, .. } = &self.slot {
            log::debug!("Unmounting {} ({:?})", screen, mount);
        }
        self.slot = Slot::Empty;
    }

    /// Forward a key to the mounted screen. Panels never consume keys, so
    /// back and chrome bindings keep working on top of them.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let Slot::Mounted { screen, unit, .. } = &mut self.slot else {
            return false;
        };
        let screen = *screen;
        match catch_unwind(AssertUnwindSafe(|| unit.handle_key(key))) {
            Ok(Ok(consumed)) => consumed,
            Ok(Err(e)) => {
                self.fail(screen, format!("{:#}", e));
                true
            }
            Err(panic) => {
                self.fail(screen, format!("screen panicked: {}", panic_message(&panic)));
                true
            }
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        if let Slot::Mounted { screen, unit, .. } = &mut self.slot {
            let screen = *screen;
            let rendered = catch_unwind(AssertUnwindSafe(|| unit.render(frame, area, theme)));
            match rendered {
                Ok(()) => return,
                Err(panic) => {
                    self.fail(screen, format!("screen panicked: {}", panic_message(&panic)));
                    frame.render_widget(Clear, area);
                }
            }
        }

        match &self.slot {
            Slot::Empty | Slot::Mounted { .. } => {}
            Slot::Loading(screen) => panels::render_loading(frame, area, theme, screen.label()),
            Slot::NotFound(screen) => panels::render_not_found(frame, area, theme, screen.as_str()),
            Slot::Failed { screen, message } => panels::render_failed(frame, area, theme, screen.label(), message),
        }
    }

    pub fn status(&self) -> HostStatus {
        match &self.slot {
            Slot::Empty => HostStatus::Empty,
            Slot::Loading(screen) => HostStatus::Loading(*screen),
            Slot::Mounted { screen, .. } => HostStatus::Mounted(*screen),
            Slot::NotFound(screen) => HostStatus::NotFound(*screen),
            Slot::Failed { screen, message } => HostStatus::Failed {
                screen: *screen,
                message: message.clone(),
            },
        }
    }

    pub fn mount_id(&self) -> Option<MountId> {
        match &self.slot {
            Slot::Mounted { mount, .. } => Some(*mount),
            _ => None,
        }
    }

    pub fn key(&self) -> Option<RenderKey> {
        self.key
    }

    pub fn key_hints(&self) -> Vec<(KeyBinding, &'static str)> {
        match &self.slot {
            Slot::Mounted { unit, .. } => unit.key_hints(),
            Slot::NotFound(_) | Slot::Failed { .. } => vec![(KeyBinding::new(KeyCode::Esc), "Go back")],
            Slot::Empty | Slot::Loading(_) => Vec::new(),
        }
    }
}
