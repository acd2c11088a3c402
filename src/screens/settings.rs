use anyhow::Result;
use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::widgets::panel;
use super::{Screen, ScreenProps};
use crate::nav::{Navigator, SessionContext};
use crate::tui::config::{Action, RuntimeConfig, global_runtime_config, reload_runtime_config};
use crate::tui::{KeyBinding, Theme, ThemeVariant};

/// Account details, key bindings, and the refresh/theme/logout actions
pub struct SettingsScreen {
    navigator: Navigator,
    context: SessionContext,
    mounted_at: DateTime<Local>,
}

impl SettingsScreen {
    pub fn new(props: ScreenProps) -> Result<Self> {
        Ok(Self {
            navigator: props.navigator,
            context: props.context,
            mounted_at: Local::now(),
        })
    }
}

fn toggled_theme(config: &RuntimeConfig) -> RuntimeConfig {
    let variant = match config.theme.variant {
        ThemeVariant::Mocha => ThemeVariant::Latte,
        ThemeVariant::Latte => ThemeVariant::Mocha,
    };
    RuntimeConfig {
        theme: Theme::new(variant),
        keybinds: config.keybinds.clone(),
    }
}

impl Screen for SettingsScreen {
    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let config = global_runtime_config();
        let [account, keys] = Layout::vertical([Constraint::Length(7), Constraint::Fill(1)]).areas(area);

        let row = |label: &str, value: String| {
            Line::from(vec![
                Span::styled(format!("{:<14}", label), theme.muted_style()),
                Span::styled(value, Style::default().fg(theme.text)),
            ])
        };
        let lines = vec![
            row("Name", self.context.display_name.clone()),
            row("User id", self.context.user_id.clone()),
            row("Role", self.context.role.label().to_string()),
            row("Theme", format!("{:?}", config.theme.variant)),
            row("Mounted at", self.mounted_at.format("%H:%M:%S").to_string()),
        ];
        frame.render_widget(Paragraph::new(lines).block(panel("Account", theme)), account);

        let bindings: Vec<Line> = Action::ALL
            .iter()
            .map(|action| {
                Line::from(vec![
                    Span::styled(format!("{:<14}", action.as_str()), theme.muted_style()),
                    Span::styled(config.binding(*action).to_string(), theme.key_style()),
                ])
            })
            .collect();
        frame.render_widget(Paragraph::new(bindings).block(panel("Key bindings", theme)), keys);
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        match key.code {
            KeyCode::Char('r') => self.navigator.force_update(),
            KeyCode::Char('t') => {
                let next = toggled_theme(&global_runtime_config());
                log::info!("Switching theme to {:?}", next.theme.variant);
                reload_runtime_config(next);
            }
            KeyCode::Char('l') => self.navigator.logout(),
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn key_hints(&self) -> Vec<(KeyBinding, &'static str)> {
        vec![
            (KeyBinding::new(KeyCode::Char('r')), "Refresh"),
            (KeyBinding::new(KeyCode::Char('t')), "Theme"),
            (KeyBinding::new(KeyCode::Char('l')), "Log out"),
        ]
    }
}
