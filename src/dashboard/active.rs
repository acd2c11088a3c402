use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::Dashboard;
use crate::nav::chrome::{self, HeaderModel};
use crate::nav::{
    NavigationSession, Params, RenderHost, ScreenId, ScreenLoader, SearchOutcome, SearchOverlay,
    SessionEvent,
};
use crate::tui::config::{Action, RuntimeConfig};
use crate::tui::Theme;

/// What a key did to the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardEvent {
    Ignored,
    Consumed,
    LogoutRequested,
}

/// A mounted dashboard: session, loader, host and chrome state.
///
/// Dropping it is logout; the session and any in-flight loads go with it.
pub struct ActiveDashboard {
    dashboard: Dashboard,
    session: NavigationSession,
    loader: ScreenLoader,
    host: RenderHost,
    search: SearchOverlay,
}

impl ActiveDashboard {
    pub fn new(dashboard: Dashboard) -> Self {
        let session = NavigationSession::new(dashboard.context().clone(), dashboard.bottom_nav().clone());
        let mut active = Self {
            dashboard,
            session,
            loader: ScreenLoader::new(),
            host: RenderHost::new(),
            search: SearchOverlay::new(),
        };
        active.process();
        active
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn session(&self) -> &NavigationSession {
        &self.session
    }

    pub fn host(&self) -> &RenderHost {
        &self.host
    }

    pub fn search(&self) -> &SearchOverlay {
        &self.search
    }

    pub fn loader(&self) -> &ScreenLoader {
        &self.loader
    }

    /// Apply queued navigation, then bring the host and loads up to date.
    /// Called after every key and once per frame.
    pub fn process(&mut self) -> SessionEvent {
        let event = self.session.apply_pending();
        if event == SessionEvent::LogoutRequested {
            return event;
        }
        let registry = self.dashboard.registry();
        self.host.sync(&self.session, registry, &mut self.loader);
        let outcomes = self.loader.poll();
        self.host.on_loaded(outcomes, &self.session, registry, &mut self.loader);
        event
    }

    pub fn header_model(&self) -> HeaderModel {
        let context = self.session.context();
        HeaderModel::new(
            self.session.stack(),
            self.dashboard.stores().unread_count(&context.user_id),
            context.display_name.clone(),
        )
    }

    pub fn back(&mut self) -> bool {
        let popped = self.session.back();
        self.process();
        popped
    }

    pub fn select_destination(&mut self, index: usize) -> bool {
        let selected = self.session.select_destination(index);
        self.process();
        selected
    }

    pub fn open_notifications(&mut self) {
        self.session.push(ScreenId::Notifications, ScreenId::Notifications.label(), Params::new());
        self.process();
    }

    pub fn open_search(&mut self) {
        self.search.open();
    }

    pub fn refresh(&mut self) {
        self.session.force_update();
        self.process();
    }

    /// Key routing, highest priority first: search overlay, mounted screen,
    /// chrome bindings, digit shortcuts for the bottom nav.
    pub fn handle_key(&mut self, key: KeyEvent, config: &RuntimeConfig) -> DashboardEvent {
        let handled = self.route_key(key, config);
        if handled == DashboardEvent::LogoutRequested || self.process() == SessionEvent::LogoutRequested {
            return DashboardEvent::LogoutRequested;
        }
        handled
    }

    fn route_key(&mut self, key: KeyEvent, config: &RuntimeConfig) -> DashboardEvent {
        // Priority 1: search overlay swallows everything while open
        if self.search.is_open() {
            if let SearchOutcome::Chosen(target) = self.search.handle_key(key, self.dashboard.catalog()) {
                log::info!("Search -> {}", target.screen);
                self.session.push(target.screen, target.title, target.params);
            }
            return DashboardEvent::Consumed;
        }

        // Priority 2: the mounted screen
        if self.host.handle_key(key) {
            return DashboardEvent::Consumed;
        }

        // Priority 3: chrome
        if config.matches(Action::Back, &key) || key.code == KeyCode::Backspace {
            self.session.back();
        } else if config.matches(Action::Search, &key) {
            self.search.open();
        } else if config.matches(Action::Notifications, &key) {
            self.session
                .push(ScreenId::Notifications, ScreenId::Notifications.label(), Params::new());
        } else if config.matches(Action::Refresh, &key) {
            self.session.force_update();
        } else if config.matches(Action::Logout, &key) {
            return DashboardEvent::LogoutRequested;
        } else if config.matches(Action::NextTab, &key) {
            self.session.select_next_destination();
        } else if let (KeyCode::Char(c @ '1'..='9'), KeyModifiers::NONE) = (key.code, key.modifiers) {
            let index = c as usize - '1' as usize;
            if !self.session.select_destination(index) {
                return DashboardEvent::Ignored;
            }
        } else {
            return DashboardEvent::Ignored;
        }
        DashboardEvent::Consumed
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme, config: &RuntimeConfig) {
        let [header, content, hints, bottom] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .areas(area);

        chrome::render_header(frame, header, theme, &self.header_model());
        self.host.render(frame, content, theme);
        self.render_hints(frame, hints, theme, config);
        chrome::render_bottom_nav(frame, bottom, theme, self.session.bottom_nav());
        self.search.render(frame, area, theme, self.dashboard.catalog());
    }

    fn render_hints(&self, frame: &mut Frame, area: Rect, theme: &Theme, config: &RuntimeConfig) {
        let mut hints = self.host.key_hints();
        if chrome::can_go_back(self.session.stack()) {
            hints.push((config.binding(Action::Back), "Back"));
        }
        hints.push((config.binding(Action::Search), "Search"));
        hints.push((config.binding(Action::Notifications), "Notifications"));

        let mut spans = Vec::new();
        for (binding, label) in hints {
            spans.push(Span::styled(format!(" {} ", binding), theme.key_style()));
            spans.push(Span::styled(format!("{}  ", label), theme.muted_style()));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::{DashboardOptions, Role};
    use crate::nav::HostStatus;
    use crate::store::Stores;

    fn active(role: Role) -> ActiveDashboard {
        let dashboard = Dashboard::build(role.default_context(), Stores::seeded(), &DashboardOptions::default()).unwrap();
        ActiveDashboard::new(dashboard)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_mounts_overview_at_start() {
        let dashboard = active(Role::Admin);
        assert_eq!(dashboard.host().status(), HostStatus::Mounted(ScreenId::Overview));
        assert!(!dashboard.header_model().can_go_back);
    }

    #[test]
    fn test_digit_selects_destination() {
        let mut dashboard = active(Role::Parent);
        let config = RuntimeConfig::default();
        assert_eq!(dashboard.handle_key(key(KeyCode::Char('2')), &config), DashboardEvent::Consumed);
        assert_eq!(dashboard.session().stack().screens(), vec![ScreenId::Children]);
        assert_eq!(dashboard.host().status(), HostStatus::Mounted(ScreenId::Children));
        assert_eq!(dashboard.handle_key(key(KeyCode::Char('9')), &config), DashboardEvent::Ignored);
    }

    #[test]
    fn test_zero_delay_deferred_screen_mounts_in_one_pass() {
        let mut dashboard = active(Role::Admin);
        dashboard.session.push(ScreenId::Fees, "Fees", Params::new());
        dashboard.process();
        assert_eq!(dashboard.host().status(), HostStatus::Mounted(ScreenId::Fees));
        assert!(dashboard.loader().is_cached(ScreenId::Fees));
    }

    #[test]
    fn test_notifications_clear_badge() {
        let mut dashboard = active(Role::Admin);
        assert!(dashboard.header_model().unread > 0);
        dashboard.open_notifications();
        assert_eq!(dashboard.host().status(), HostStatus::Mounted(ScreenId::Notifications));
        assert_eq!(dashboard.header_model().unread, 0);
        assert!(dashboard.back());
        assert_eq!(dashboard.session().stack().len(), 1);
    }

    #[test]
    fn test_logout_binding_and_settings_key() {
        let config = RuntimeConfig::default();
        let mut dashboard = active(Role::Student);
        let logout = KeyEvent::new(KeyCode::Char('l'), KeyModifiers::CONTROL);
        assert_eq!(dashboard.handle_key(logout, &config), DashboardEvent::LogoutRequested);

        let mut dashboard = active(Role::Student);
        dashboard.select_destination(3);
        assert_eq!(dashboard.host().status(), HostStatus::Mounted(ScreenId::Settings));
        assert_eq!(dashboard.handle_key(key(KeyCode::Char('l')), &config), DashboardEvent::LogoutRequested);
    }

    #[test]
    fn test_refresh_remounts_settings() {
        let config = RuntimeConfig::default();
        let mut dashboard = active(Role::Admin);
        dashboard.select_destination(3);
        let before = dashboard.host().mount_id();
        dashboard.handle_key(key(KeyCode::Char('r')), &config);
        assert_ne!(dashboard.host().mount_id(), before);
        assert_eq!(dashboard.session().stack().len(), 1);
    }
}
