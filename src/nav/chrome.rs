//! Header, bottom bar and search overlay.
//!
//! Chrome only reads the stack and issues push/pop through the session; it
//! owns no stack state of its own. The search overlay in particular has its
//! own open flag, so opening and closing it never changes depth.

use crossterm::event::{KeyCode, KeyEvent};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph};

use super::{BottomNav, NavigationStack, Params, ScreenId};
use crate::tui::{ModalState, Theme, panels};

pub const BREADCRUMB_SEPARATOR: &str = " › ";

/// Maximum rows shown in the search results
const MAX_RESULTS: usize = 12;

/// Back is only offered when there is something to go back to
pub fn can_go_back(stack: &NavigationStack) -> bool {
    !stack.is_at_root()
}

pub fn breadcrumb(stack: &NavigationStack) -> String {
    stack.titles().join(BREADCRUMB_SEPARATOR)
}

/// What the header shows on a given frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderModel {
    pub breadcrumb: String,
    pub can_go_back: bool,
    pub unread: usize,
    pub user: String,
}

impl HeaderModel {
    pub fn new(stack: &NavigationStack, unread: usize, user: impl Into<String>) -> Self {
        Self {
            breadcrumb: breadcrumb(stack),
            can_go_back: can_go_back(stack),
            unread,
            user: user.into(),
        }
    }

    pub fn badge(&self) -> Option<String> {
        match self.unread {
            0 => None,
            n if n > 99 => Some("99+".to_string()),
            n => Some(n.to_string()),
        }
    }
}

pub fn render_header(frame: &mut Frame, area: Rect, theme: &Theme, model: &HeaderModel) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.border_style());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [left, right] = Layout::horizontal([Constraint::Fill(1), Constraint::Length(32)]).areas(inner);

    let mut title = Vec::new();
    if model.can_go_back {
        title.push(Span::styled("← ", theme.key_style()));
    }
    title.push(Span::styled(model.breadcrumb.clone(), theme.title_style()));
    frame.render_widget(Paragraph::new(Line::from(title)), left);

    let mut status = vec![Span::styled(model.user.clone(), theme.muted_style()), Span::raw("  ")];
    match model.badge() {
        Some(count) => status.push(Span::styled(
            format!("🔔 {}", count),
            Style::default().fg(theme.peach).add_modifier(Modifier::BOLD),
        )),
        None => status.push(Span::styled("🔔", theme.muted_style())),
    }
    frame.render_widget(Paragraph::new(Line::from(status)).right_aligned(), right);
}

pub fn render_bottom_nav(frame: &mut Frame, area: Rect, theme: &Theme, nav: &BottomNav) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.border_style());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let count = nav.destinations().len() as u32;
    let cells = Layout::horizontal((0..count).map(|_| Constraint::Ratio(1, count))).split(inner);
    for (index, (destination, cell)) in nav.destinations().iter().zip(cells.iter()).enumerate() {
        let style = if index == nav.active_index() {
            theme.selection_style()
        } else {
            Style::default().fg(theme.subtext0)
        };
        let text = Line::from(vec![
            Span::styled(format!("{} ", index + 1), theme.key_style()),
            Span::styled(destination.label, style),
        ]);
        frame.render_widget(Paragraph::new(text).centered(), *cell);
    }
}

/// Where a search result leads
#[derive(Debug, Clone, PartialEq)]
pub struct SearchTarget {
    pub screen: ScreenId,
    pub title: String,
    pub params: Params,
}

/// One searchable row of a dashboard's catalogue
#[derive(Debug, Clone, PartialEq)]
pub struct SearchItem {
    pub label: String,
    pub hint: &'static str,
    pub target: SearchTarget,
}

impl SearchItem {
    /// A plain screen, searchable by its label
    pub fn screen(screen: ScreenId) -> Self {
        Self {
            label: screen.label().to_string(),
            hint: "screen",
            target: SearchTarget {
                screen,
                title: screen.label().to_string(),
                params: Params::new(),
            },
        }
    }

    pub fn new(label: impl Into<String>, hint: &'static str, target: SearchTarget) -> Self {
        Self {
            label: label.into(),
            hint,
            target,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    pub query: String,
    pub selected: usize,
}

/// Result of feeding a key to the open overlay
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Key handled, overlay still open
    Consumed,
    Closed,
    Chosen(SearchTarget),
}

#[derive(Debug, Clone, Default)]
pub struct SearchOverlay {
    state: ModalState<SearchState>,
}

impl SearchOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self) {
        self.state.open_with(SearchState::default());
    }

    pub fn close(&mut self) {
        self.state.close();
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    pub fn query(&self) -> &str {
        self.state.data().map(|s| s.query.as_str()).unwrap_or("")
    }

    pub fn selected(&self) -> usize {
        self.state.data().map(|s| s.selected).unwrap_or(0)
    }

    /// Catalogue entries matching the current query, best first. An empty
    /// query lists everything in catalogue order.
    pub fn matches<'a>(&self, catalog: &'a [SearchItem]) -> Vec<&'a SearchItem> {
        let query = self.query().trim();
        if query.is_empty() {
            return catalog.iter().take(MAX_RESULTS).collect();
        }

        let matcher = SkimMatcherV2::default();
        let mut scored: Vec<(&SearchItem, i64)> = catalog
            .iter()
            .filter_map(|item| matcher.fuzzy_match(&item.label, query).map(|score| (item, score)))
            .collect();
        scored.sort_by(|a, b| b.1.cmp(&a.1));
        scored.into_iter().take(MAX_RESULTS).map(|(item, _)| item).collect()
    }

    /// Handle a key while open. Does nothing when closed.
    pub fn handle_key(&mut self, key: KeyEvent, catalog: &[SearchItem]) -> SearchOutcome {
        let match_count = self.matches(catalog).len();
        let Some(state) = self.state.data_mut() else {
            return SearchOutcome::Closed;
        };

        match key.code {
            KeyCode::Esc => {
                self.close();
                return SearchOutcome::Closed;
            }
            KeyCode::Enter => {
                let selected = state.selected;
                let target = self.matches(catalog).get(selected).map(|item| item.target.clone());
                return match target {
                    Some(target) => {
                        self.close();
                        SearchOutcome::Chosen(target)
                    }
                    None => SearchOutcome::Consumed,
                };
            }
            KeyCode::Up => state.selected = state.selected.saturating_sub(1),
            KeyCode::Down => {
                if state.selected + 1 < match_count {
                    state.selected += 1;
                }
            }
            KeyCode::Backspace => {
                state.query.pop();
                state.selected = 0;
            }
            KeyCode::Char(c) => {
                state.query.push(c);
                state.selected = 0;
            }
            _ => {}
        }
        SearchOutcome::Consumed
    }

    pub fn render(&self, frame: &mut Frame, container: Rect, theme: &Theme, catalog: &[SearchItem]) {
        if !self.is_open() {
            return;
        }
        let area = panels::centered_rect(56, 18, container);
        panels::render_dim_overlay(frame, theme, area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.mauve))
            .title(Span::styled(" Search ", theme.title_style()));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [input, results] = Layout::vertical([Constraint::Length(2), Constraint::Fill(1)]).areas(inner);
        let prompt = Line::from(vec![
            Span::styled("> ", theme.key_style()),
            Span::styled(self.query().to_string(), Style::default().fg(theme.text)),
            Span::styled("_", theme.muted_style()),
        ]);
        frame.render_widget(Paragraph::new(prompt), input);

        let matches = self.matches(catalog);
        if matches.is_empty() {
            frame.render_widget(Paragraph::new(Span::styled("No matches", theme.muted_style())), results);
            return;
        }
        let items: Vec<ListItem> = matches
            .iter()
            .map(|item| {
                ListItem::new(Line::from(vec![
                    Span::styled(item.label.clone(), Style::default().fg(theme.text)),
                    Span::styled(format!("  {}", item.hint), theme.muted_style()),
                ]))
            })
            .collect();
        let mut state = ListState::default().with_selected(Some(self.selected()));
        frame.render_stateful_widget(List::new(items).highlight_style(theme.selection_style()), results, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use serde_json::json;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn catalog() -> Vec<SearchItem> {
        vec![
            SearchItem::screen(ScreenId::Overview),
            SearchItem::screen(ScreenId::Attendance),
            SearchItem::screen(ScreenId::Fees),
            SearchItem::new(
                "Ada Lovelace",
                "student",
                SearchTarget {
                    screen: ScreenId::StudentDetail,
                    title: "Ada Lovelace".to_string(),
                    params: Params::from(json!({"student_id": "s1"})),
                },
            ),
        ]
    }

    fn type_query(overlay: &mut SearchOverlay, text: &str, catalog: &[SearchItem]) {
        for c in text.chars() {
            overlay.handle_key(key(KeyCode::Char(c)), catalog);
        }
    }

    #[test]
    fn test_header_flags_follow_depth() {
        let mut stack = NavigationStack::new(ScreenId::Overview, "Overview", Params::new());
        assert!(!can_go_back(&stack));
        stack.push(ScreenId::StudentList, "Students", Params::new());
        assert!(can_go_back(&stack));
        assert_eq!(breadcrumb(&stack), "Overview › Students");

        let model = HeaderModel::new(&stack, 120, "Hale");
        assert_eq!(model.badge().as_deref(), Some("99+"));
        assert_eq!(HeaderModel::new(&stack, 0, "Hale").badge(), None);
    }

    #[test]
    fn test_empty_query_lists_catalog() {
        let catalog = catalog();
        let mut overlay = SearchOverlay::new();
        overlay.open();
        assert_eq!(overlay.matches(&catalog).len(), catalog.len());
    }

    #[test]
    fn test_fuzzy_match_finds_student() {
        let catalog = catalog();
        let mut overlay = SearchOverlay::new();
        overlay.open();
        type_query(&mut overlay, "ada", &catalog);

        let matches = overlay.matches(&catalog);
        assert_eq!(matches[0].label, "Ada Lovelace");
        assert!(matches.iter().all(|item| item.label != "Fees"));

        let outcome = overlay.handle_key(key(KeyCode::Enter), &catalog);
        match outcome {
            SearchOutcome::Chosen(target) => {
                assert_eq!(target.screen, ScreenId::StudentDetail);
                assert_eq!(target.params.get_str("student_id"), Some("s1"));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert!(!overlay.is_open());
    }

    #[test]
    fn test_enter_without_match_keeps_overlay_open() {
        let catalog = catalog();
        let mut overlay = SearchOverlay::new();
        overlay.open();
        type_query(&mut overlay, "zzzz", &catalog);
        assert_eq!(overlay.handle_key(key(KeyCode::Enter), &catalog), SearchOutcome::Consumed);
        assert!(overlay.is_open());
    }

    #[test]
    fn test_selection_is_clamped_and_reset_by_typing() {
        let catalog = catalog();
        let mut overlay = SearchOverlay::new();
        overlay.open();
        for _ in 0..10 {
            overlay.handle_key(key(KeyCode::Down), &catalog);
        }
        assert_eq!(overlay.selected(), catalog.len() - 1);
        overlay.handle_key(key(KeyCode::Char('f')), &catalog);
        assert_eq!(overlay.selected(), 0);
        overlay.handle_key(key(KeyCode::Backspace), &catalog);
        assert_eq!(overlay.query(), "");
    }

    #[test]
    fn test_escape_closes_without_touching_stack() {
        let catalog = catalog();
        let mut stack = NavigationStack::new(ScreenId::Overview, "Overview", Params::new());
        stack.push(ScreenId::StudentList, "Students", Params::new());
        let key_before = stack.render_key();

        let mut overlay = SearchOverlay::new();
        overlay.open();
        type_query(&mut overlay, "fe", &catalog);
        assert_eq!(overlay.handle_key(key(KeyCode::Esc), &catalog), SearchOutcome::Closed);

        assert!(!overlay.is_open());
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.render_key(), key_before);
    }

    #[test]
    fn test_reopen_starts_with_empty_query() {
        let catalog = catalog();
        let mut overlay = SearchOverlay::new();
        overlay.open();
        type_query(&mut overlay, "fees", &catalog);
        overlay.close();
        overlay.open();
        assert_eq!(overlay.query(), "");
    }
}
