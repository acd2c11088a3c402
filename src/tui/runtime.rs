use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph};

use super::config::{Action, global_runtime_config};
use super::{ModalState, Theme, panels};
use crate::dashboard::{ActiveDashboard, Dashboard, DashboardEvent, DashboardOptions, Role};
use crate::nav::SessionEvent;
use crate::store::Stores;

/// Role chooser shown before any dashboard is mounted
#[derive(Debug, Clone, Default)]
pub struct RolePicker {
    selected: usize,
}

impl RolePicker {
    pub fn selected(&self) -> Role {
        Role::ALL[self.selected.min(Role::ALL.len() - 1)]
    }

    /// Returns the chosen role on Enter or a digit shortcut
    fn handle_key(&mut self, key: KeyEvent) -> Option<Role> {
        match key.code {
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => self.selected = (self.selected + 1).min(Role::ALL.len() - 1),
            KeyCode::Enter => return Some(self.selected()),
            KeyCode::Char(c @ '1'..='3') => {
                self.selected = c as usize - '1' as usize;
                return Some(self.selected());
            }
            _ => {}
        }
        None
    }

    fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let area = panels::centered_rect(48, 11, area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.mauve))
            .title(Span::styled(" School portal · sign in ", theme.title_style()));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [intro, list] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Fill(1),
        ])
        .areas(inner);
        frame.render_widget(
            Paragraph::new(Span::styled("Choose a role to sign in as", theme.muted_style())),
            intro,
        );

        let items: Vec<ListItem> = Role::ALL
            .iter()
            .enumerate()
            .map(|(i, role)| {
                let context = role.default_context();
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{} ", i + 1), theme.key_style()),
                    Span::styled(format!("{:<10}", role.label()), Style::default().fg(theme.text).add_modifier(Modifier::BOLD)),
                    Span::styled(context.display_name, theme.muted_style()),
                ]))
            })
            .collect();
        let mut state = ListState::default().with_selected(Some(self.selected));
        frame.render_stateful_widget(
            List::new(items).highlight_style(theme.selection_style()).highlight_symbol("▶ "),
            list,
            &mut state,
        );
    }
}

enum Phase {
    Login(RolePicker),
    Dashboard(Box<ActiveDashboard>),
}

/// Top-level UI state: the login picker or one mounted dashboard, plus the
/// quit confirmation that sits above both.
pub struct PortalRuntime {
    phase: Phase,
    stores: Stores,
    options: DashboardOptions,
    quit_modal: ModalState<()>,
}

impl PortalRuntime {
    pub fn new(stores: Stores, options: DashboardOptions) -> Self {
        Self {
            phase: Phase::Login(RolePicker::default()),
            stores,
            options,
            quit_modal: ModalState::default(),
        }
    }

    /// Mount a fresh dashboard for `role`, replacing whatever was mounted
    pub fn login(&mut self, role: Role) -> Result<()> {
        let context = role.default_context();
        log::info!("Login as {} ({})", context.display_name, role);
        let dashboard = Dashboard::build(context, self.stores.clone(), &self.options)
            .with_context(|| format!("Failed to build the {} dashboard", role))?;
        self.phase = Phase::Dashboard(Box::new(ActiveDashboard::new(dashboard)));
        Ok(())
    }

    /// Drop the session and return to the role picker
    pub fn logout(&mut self) {
        if let Phase::Dashboard(active) = &self.phase {
            log::info!("Logout {}", active.session().context().display_name);
        }
        self.phase = Phase::Login(RolePicker::default());
    }

    pub fn request_quit(&mut self) {
        self.quit_modal.open_empty();
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_modal.is_open()
    }

    pub fn active(&self) -> Option<&ActiveDashboard> {
        match &self.phase {
            Phase::Dashboard(active) => Some(active),
            Phase::Login(_) => None,
        }
    }

    pub fn stores(&self) -> &Stores {
        &self.stores
    }

    /// Returns Ok(false) when the portal should exit
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        let config = global_runtime_config();

        // Priority 1: quit confirmation
        if self.quit_modal.is_open() {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => return Ok(false),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => self.quit_modal.close(),
                _ => {}
            }
            return Ok(true);
        }

        // Priority 2: global quit binding
        if config.matches(Action::Quit, &key) {
            self.request_quit();
            return Ok(true);
        }

        // Priority 3: the active phase
        let chosen = match &mut self.phase {
            Phase::Login(picker) => {
                if key.code == KeyCode::Esc {
                    self.quit_modal.open_empty();
                    return Ok(true);
                }
                picker.handle_key(key)
            }
            Phase::Dashboard(active) => {
                if active.handle_key(key, &config) == DashboardEvent::LogoutRequested {
                    self.logout();
                }
                None
            }
        };
        if let Some(role) = chosen {
            self.login(role)?;
        }
        Ok(true)
    }

    /// Once per frame: drive deferred loads and apply navigation queued
    /// outside of key handling
    pub fn poll_async(&mut self) {
        let logout = match &mut self.phase {
            Phase::Dashboard(active) => active.process() == SessionEvent::LogoutRequested,
            Phase::Login(_) => false,
        };
        if logout {
            self.logout();
        }
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let config = global_runtime_config();
        let theme = &config.theme;
        let area = frame.area();
        frame.render_widget(Block::default().style(Style::default().bg(theme.base)), area);

        match &mut self.phase {
            Phase::Login(picker) => picker.render(frame, area, theme),
            Phase::Dashboard(active) => active.render(frame, area, theme, &config),
        }

        if self.quit_modal.is_open() {
            panels::render_confirm(frame, area, theme, "Quit", "Quit the school portal?");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::{HostStatus, ScreenId};
    use crossterm::event::KeyModifiers;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn runtime() -> PortalRuntime {
        PortalRuntime::new(Stores::seeded(), DashboardOptions::default())
    }

    fn screen_text(runtime: &mut PortalRuntime) -> String {
        let mut terminal = Terminal::new(TestBackend::new(90, 30)).unwrap();
        terminal.draw(|frame| runtime.render(frame)).unwrap();
        terminal.backend().buffer().content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_picker_logs_in() {
        let mut runtime = runtime();
        assert!(runtime.active().is_none());
        runtime.handle_key(key(KeyCode::Down)).unwrap();
        runtime.handle_key(key(KeyCode::Enter)).unwrap();

        let active = runtime.active().unwrap();
        assert_eq!(active.dashboard().role(), Role::Parent);
        assert_eq!(active.host().status(), HostStatus::Mounted(ScreenId::Overview));
    }

    #[test]
    fn test_logout_returns_to_picker_with_fresh_session() {
        let mut runtime = runtime();
        runtime.login(Role::Admin).unwrap();
        runtime.handle_key(key(KeyCode::Char('2'))).unwrap();
        assert_eq!(runtime.active().unwrap().session().stack().screens(), vec![ScreenId::StudentList]);

        runtime
            .handle_key(KeyEvent::new(KeyCode::Char('l'), KeyModifiers::CONTROL))
            .unwrap();
        assert!(runtime.active().is_none());

        runtime.login(Role::Admin).unwrap();
        assert_eq!(runtime.active().unwrap().session().stack().screens(), vec![ScreenId::Overview]);
    }

    #[test]
    fn test_quit_needs_confirmation() {
        let mut runtime = runtime();
        runtime.login(Role::Student).unwrap();
        let quit = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL);

        assert!(runtime.handle_key(quit).unwrap());
        assert!(runtime.quit_requested());
        // keys other than y/n are swallowed while the modal is open
        assert!(runtime.handle_key(key(KeyCode::Char('2'))).unwrap());
        assert_eq!(runtime.active().unwrap().session().stack().screens(), vec![ScreenId::Overview]);

        assert!(runtime.handle_key(key(KeyCode::Char('n'))).unwrap());
        assert!(!runtime.quit_requested());

        runtime.handle_key(quit).unwrap();
        assert!(!runtime.handle_key(key(KeyCode::Char('y'))).unwrap());
    }

    #[test]
    fn test_renders_chrome_around_screen() {
        let mut runtime = runtime();
        let login = screen_text(&mut runtime);
        assert!(login.contains("Choose a role"));

        runtime.login(Role::Admin).unwrap();
        let text = screen_text(&mut runtime);
        assert!(text.contains("Overview"));
        assert!(text.contains("Principal Hale"));
        assert!(text.contains("Settings"));
    }
}
