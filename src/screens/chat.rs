use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use super::widgets::panel;
use super::{Screen, ScreenProps};
use crate::store::{ChatMessage, Stores};
use crate::tui::{KeyBinding, Theme};

/// One chat thread.
///
/// Registered once per role with a fixed `sender_id`, so the same screen
/// posts as whoever the dashboard belongs to.
pub struct ChatScreen {
    stores: Stores,
    sender_id: String,
    thread: String,
    messages: Vec<ChatMessage>,
    draft: String,
}

impl ChatScreen {
    pub fn new(props: ScreenProps, stores: &Stores) -> Result<Self> {
        let sender_id = props
            .params
            .get_str("sender_id")
            .context("Chat needs a sender_id param")?
            .to_string();
        let thread = props.params.get_str("thread").unwrap_or("general").to_string();
        let messages = stores.thread(&thread);
        Ok(Self {
            stores: stores.clone(),
            sender_id,
            thread,
            messages,
            draft: String::new(),
        })
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    fn send(&mut self) {
        let body = self.draft.trim();
        if body.is_empty() {
            return;
        }
        log::debug!("{} posts to #{}", self.sender_id, self.thread);
        self.stores
            .messages
            .upsert(ChatMessage::new(&self.thread, &self.sender_id, body));
        self.draft.clear();
        self.messages = self.stores.thread(&self.thread);
    }
}

impl Screen for ChatScreen {
    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let [history, input] = Layout::vertical([Constraint::Fill(1), Constraint::Length(3)]).areas(area);

        let lines: Vec<Line> = self
            .messages
            .iter()
            .map(|m| {
                let sender_style = if m.sender_id == self.sender_id {
                    Style::default().fg(theme.green).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(theme.blue)
                };
                Line::from(vec![
                    Span::styled(m.sent_at.format("%H:%M ").to_string(), theme.muted_style()),
                    Span::styled(format!("{}: ", m.sender_id), sender_style),
                    Span::styled(m.body.clone(), Style::default().fg(theme.text)),
                ])
            })
            .collect();
        // keep the newest messages in view
        let visible = history.height.saturating_sub(2) as usize;
        let scroll = lines.len().saturating_sub(visible) as u16;
        frame.render_widget(
            Paragraph::new(lines)
                .block(panel(format!("#{}", self.thread), theme))
                .wrap(Wrap { trim: false })
                .scroll((scroll, 0)),
            history,
        );

        let prompt = Line::from(vec![
            Span::styled(self.draft.clone(), Style::default().fg(theme.text)),
            Span::styled("_", theme.muted_style()),
        ]);
        frame.render_widget(
            Paragraph::new(prompt).block(panel(format!("Message as {}", self.sender_id), theme)),
            input,
        );
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return Ok(false);
        }
        match key.code {
            KeyCode::Char(c) => self.draft.push(c),
            KeyCode::Backspace if !self.draft.is_empty() => {
                self.draft.pop();
            }
            KeyCode::Enter => self.send(),
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn key_hints(&self) -> Vec<(KeyBinding, &'static str)> {
        vec![(KeyBinding::new(KeyCode::Enter), "Send")]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::Role;
    use crate::nav::{Navigator, Params, SessionContext};
    use serde_json::json;

    fn chat(stores: &Stores, params: serde_json::Value) -> Result<ChatScreen> {
        let (navigator, _queue) = Navigator::channel();
        let props = ScreenProps {
            params: Params::from(params),
            navigator,
            context: SessionContext::new(Role::Student, "stu-1001", "Ada Lovelace"),
        };
        ChatScreen::new(props, stores)
    }

    fn typed(screen: &mut ChatScreen, text: &str) {
        for c in text.chars() {
            screen.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)).unwrap();
        }
    }

    #[test]
    fn test_posts_as_fixed_sender() {
        let stores = Stores::empty();
        let mut screen = chat(&stores, json!({"sender_id": "stu-1001", "thread": "science"})).unwrap();
        typed(&mut screen, "hello");
        assert!(screen.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)).unwrap());

        let thread = stores.thread("science");
        assert_eq!(thread.len(), 1);
        assert_eq!(thread[0].sender_id, "stu-1001");
        assert_eq!(thread[0].body, "hello");
        assert_eq!(screen.messages().len(), 1);
    }

    #[test]
    fn test_blank_draft_is_not_sent() {
        let stores = Stores::empty();
        let mut screen = chat(&stores, json!({"sender_id": "admin-1"})).unwrap();
        typed(&mut screen, "   ");
        screen.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)).unwrap();
        assert!(stores.thread("general").is_empty());
    }

    #[test]
    fn test_leaves_chrome_keys_alone() {
        let stores = Stores::empty();
        let mut screen = chat(&stores, json!({"sender_id": "admin-1"})).unwrap();
        assert!(!screen.handle_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)).unwrap());
        assert!(!screen.handle_key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL)).unwrap());
        // backspace on an empty draft falls through to back navigation
        assert!(!screen.handle_key(KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE)).unwrap());
    }

    #[test]
    fn test_requires_sender() {
        assert!(chat(&Stores::empty(), json!({})).is_err());
    }
}
