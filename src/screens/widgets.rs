use crossterm::event::KeyCode;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Borders, List, ListItem, ListState};

use crate::tui::Theme;

pub(crate) fn panel<'a>(title: impl Into<String>, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.border_style())
        .title(Span::styled(format!(" {} ", title.into()), theme.title_style()))
}

/// Selection within a list of `len` rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Cursor {
    index: usize,
    len: usize,
}

impl Cursor {
    pub(crate) fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    pub(crate) fn index(&self) -> Option<usize> {
        (self.len > 0).then_some(self.index)
    }

    pub(crate) fn set_len(&mut self, len: usize) {
        self.len = len;
        self.index = self.index.min(len.saturating_sub(1));
    }

    /// Up/Down/Home/End; returns false for any other key
    pub(crate) fn handle(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Up | KeyCode::Char('k') => self.index = self.index.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                if self.index + 1 < self.len {
                    self.index += 1;
                }
            }
            KeyCode::Home => self.index = 0,
            KeyCode::End => self.index = self.len.saturating_sub(1),
            _ => return false,
        }
        true
    }
}

pub(crate) fn render_list(frame: &mut Frame, area: Rect, theme: &Theme, block: Block<'_>, items: Vec<ListItem<'_>>, cursor: Cursor) {
    let mut state = ListState::default().with_selected(cursor.index());
    let list = List::new(items)
        .block(block)
        .highlight_style(theme.selection_style())
        .highlight_symbol("▶ ");
    frame.render_stateful_widget(list, area, &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_bounds() {
        let mut cursor = Cursor::new(3);
        assert!(cursor.handle(KeyCode::Down));
        assert!(cursor.handle(KeyCode::Down));
        cursor.handle(KeyCode::Down);
        assert_eq!(cursor.index(), Some(2));
        cursor.handle(KeyCode::Home);
        assert_eq!(cursor.index(), Some(0));
        assert!(!cursor.handle(KeyCode::Enter));

        cursor.set_len(0);
        assert_eq!(cursor.index(), None);
    }
}
