use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::ListItem;
use serde_json::json;
use std::collections::BTreeMap;

use super::widgets::{Cursor, panel, render_list};
use super::{Screen, ScreenProps};
use crate::nav::{Navigator, ScreenId};
use crate::store::Stores;
use crate::tui::{KeyBinding, Theme};

#[derive(Debug, Clone, PartialEq)]
struct ThreadSummary {
    name: String,
    count: usize,
    last: String,
}

/// Thread list. Opens threads in the role's chat screen, which arrives as
/// the fixed `chat_screen` param.
pub struct MessagesScreen {
    navigator: Navigator,
    chat_screen: ScreenId,
    threads: Vec<ThreadSummary>,
    cursor: Cursor,
}

impl MessagesScreen {
    pub fn new(props: ScreenProps, stores: &Stores) -> Result<Self> {
        let chat_screen = props
            .params
            .get_str("chat_screen")
            .context("Messages needs a chat_screen param")?
            .parse::<ScreenId>()?;

        let mut by_thread: BTreeMap<String, Vec<_>> = BTreeMap::new();
        by_thread.entry("general".to_string()).or_default();
        for message in stores.messages.list() {
            by_thread.entry(message.thread.clone()).or_default().push(message);
        }
        let threads: Vec<ThreadSummary> = by_thread
            .into_iter()
            .map(|(name, mut messages)| {
                messages.sort_by_key(|m| m.sent_at);
                ThreadSummary {
                    count: messages.len(),
                    last: messages.last().map(|m| m.body.clone()).unwrap_or_default(),
                    name,
                }
            })
            .collect();

        Ok(Self {
            navigator: props.navigator,
            chat_screen,
            cursor: Cursor::new(threads.len()),
            threads,
        })
    }
}

impl Screen for MessagesScreen {
    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let items = self
            .threads
            .iter()
            .map(|t| {
                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(format!("#{}", t.name), Style::default().fg(theme.text)),
                        Span::styled(format!("  {} messages", t.count), theme.muted_style()),
                    ]),
                    Line::from(Span::styled(format!("  {}", t.last), theme.muted_style())),
                ])
            })
            .collect();
        render_list(frame, area, theme, panel("Threads", theme), items, self.cursor);
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        if self.cursor.handle(key.code) {
            return Ok(true);
        }
        if key.code == KeyCode::Enter {
            if let Some(thread) = self.cursor.index().and_then(|i| self.threads.get(i)) {
                self.navigator
                    .navigate_to(self.chat_screen, format!("#{}", thread.name), json!({ "thread": thread.name }));
            }
            return Ok(true);
        }
        Ok(false)
    }

    fn key_hints(&self) -> Vec<(KeyBinding, &'static str)> {
        vec![(KeyBinding::new(KeyCode::Enter), "Open thread")]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::Role;
    use crate::nav::{NavRequest, Params, SessionContext};
    use crate::store::ChatMessage;
    use crossterm::event::KeyModifiers;

    fn props(params: serde_json::Value) -> (ScreenProps, crate::nav::NavQueue) {
        let (navigator, queue) = Navigator::channel();
        let props = ScreenProps {
            params: Params::from(params),
            navigator,
            context: SessionContext::new(Role::Parent, "parent-1", "Mrs Lovelace"),
        };
        (props, queue)
    }

    #[test]
    fn test_opens_thread_in_role_chat() {
        let stores = Stores::seeded();
        stores.messages.upsert(ChatMessage::new("fees", "admin-1", "Invoices are out"));
        let (props, mut queue) = props(json!({"chat_screen": "parent_chat"}));
        let mut screen = MessagesScreen::new(props, &stores).unwrap();
        assert_eq!(screen.threads.len(), 2);

        screen.handle_key(KeyEvent::new(KeyCode::Down, KeyModifiers::NONE)).unwrap();
        screen.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)).unwrap();
        match queue.drain().as_slice() {
            [NavRequest::Push { screen, params, .. }] => {
                assert_eq!(*screen, ScreenId::ParentChat);
                assert_eq!(params.get_str("thread"), Some("general"));
            }
            other => panic!("unexpected requests {:?}", other),
        }
    }

    #[test]
    fn test_missing_chat_screen_is_an_error() {
        let (props, _queue) = props(json!({}));
        assert!(MessagesScreen::new(props, &Stores::empty()).is_err());
        let (props, _queue) = self::props(json!({"chat_screen": "nowhere"}));
        assert!(MessagesScreen::new(props, &Stores::empty()).is_err());
    }

    #[test]
    fn test_general_thread_always_listed() {
        let (props, _queue) = props(json!({"chat_screen": "admin_chat"}));
        let screen = MessagesScreen::new(props, &Stores::empty()).unwrap();
        assert_eq!(screen.threads[0].name, "general");
        assert_eq!(screen.threads[0].count, 0);
    }
}
