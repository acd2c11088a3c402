use serde::{Deserialize, Serialize};

use super::{BottomNav, Destination, NavQueue, NavRequest, NavigationStack, Navigator, Params, ScreenId};
use crate::dashboard::Role;

/// Who is logged in. Threaded to screens through [`ScreenProps`](crate::screens::ScreenProps)
/// instead of living in a global.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    pub role: Role,
    pub user_id: String,
    pub display_name: String,
}

impl SessionContext {
    pub fn new(role: Role, user_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            role,
            user_id: user_id.into(),
            display_name: display_name.into(),
        }
    }
}

/// Result of applying queued screen requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Idle,
    Navigated,
    LogoutRequested,
}

/// Navigation state owned by one mounted dashboard.
///
/// Created when the dashboard mounts and dropped on logout. Screens only ever
/// see the [`Navigator`]; the stack itself is only reachable read-only.
#[derive(Debug)]
pub struct NavigationSession {
    stack: NavigationStack,
    bottom_nav: BottomNav,
    context: SessionContext,
    navigator: Navigator,
    queue: NavQueue,
}

impl NavigationSession {
    pub fn new(context: SessionContext, bottom_nav: BottomNav) -> Self {
        let (navigator, queue) = Navigator::channel();
        let stack = bottom_nav.initial_stack();
        log::info!(
            "Session started for {} ({:?}) at {}",
            context.display_name,
            context.role,
            stack.root().screen
        );
        Self {
            stack,
            bottom_nav,
            context,
            navigator,
            queue,
        }
    }

    pub fn stack(&self) -> &NavigationStack {
        &self.stack
    }

    pub fn bottom_nav(&self) -> &BottomNav {
        &self.bottom_nav
    }

    /// Bumped by every forced refresh; part of the top entry's render key
    pub fn version(&self) -> u64 {
        self.stack.version()
    }

    pub fn active_root(&self) -> &Destination {
        self.bottom_nav.active()
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    /// A new handle for a screen being mounted
    pub fn navigator(&self) -> Navigator {
        self.navigator.clone()
    }

    pub fn push(&mut self, screen: ScreenId, title: impl Into<String>, params: Params) {
        self.stack.push(screen, title, params);
    }

    pub fn back(&mut self) -> bool {
        self.stack.pop().is_some()
    }

    pub fn force_update(&mut self) {
        self.stack.force_update();
    }

    pub fn select_destination(&mut self, index: usize) -> bool {
        self.bottom_nav.select(index, &mut self.stack)
    }

    pub fn select_next_destination(&mut self) -> bool {
        self.bottom_nav.select_next(&mut self.stack)
    }

    /// Apply queued screen requests in the order they were made.
    ///
    /// A logout stops processing; anything queued after it is discarded along
    /// with the session.
    pub fn apply_pending(&mut self) -> SessionEvent {
        let mut event = SessionEvent::Idle;
        for request in self.queue.drain() {
            match request {
                NavRequest::Push { screen, title, params } => {
                    self.stack.push(screen, title, params);
                }
                NavRequest::Back => {
                    self.stack.pop();
                }
                NavRequest::ForceUpdate => {
                    self.stack.force_update();
                }
                NavRequest::Logout => {
                    log::info!("Logout requested by {}", self.context.display_name);
                    return SessionEvent::LogoutRequested;
                }
            }
            event = SessionEvent::Navigated;
        }
        event
    }
}
