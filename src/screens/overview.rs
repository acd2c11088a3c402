use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{ListItem, Paragraph};
use serde::Deserialize;

use super::widgets::{Cursor, panel, render_list};
use super::{Screen, ScreenProps};
use crate::dashboard::Role;
use crate::nav::{Navigator, Params, ScreenId, SessionContext};
use crate::store::Stores;
use crate::tui::{KeyBinding, Theme};

/// A quick link as it appears in the `links` param
#[derive(Debug, Clone, Deserialize)]
struct RawLink {
    label: String,
    screen: String,
    #[serde(default)]
    params: serde_json::Value,
}

#[derive(Debug, Clone)]
struct QuickLink {
    label: String,
    screen: ScreenId,
    params: Params,
}

/// Landing screen of every dashboard: greeting, a few numbers, quick links
pub struct OverviewScreen {
    navigator: Navigator,
    context: SessionContext,
    summary: Vec<(&'static str, String)>,
    links: Vec<QuickLink>,
    cursor: Cursor,
}

impl OverviewScreen {
    pub fn new(props: ScreenProps, stores: &Stores) -> Result<Self> {
        let links = parse_links(&props.params);
        let summary = summarize(&props.context, stores);
        Ok(Self {
            navigator: props.navigator,
            context: props.context,
            summary,
            cursor: Cursor::new(links.len()),
            links,
        })
    }
}

fn parse_links(params: &Params) -> Vec<QuickLink> {
    let Some(raw) = params.get("links") else {
        return Vec::new();
    };
    let links: Vec<RawLink> = match serde_json::from_value(raw.clone()) {
        Ok(links) => links,
        Err(e) => {
            log::warn!("Ignoring malformed overview links: {}", e);
            return Vec::new();
        }
    };
    links
        .into_iter()
        .filter_map(|link| match link.screen.parse::<ScreenId>() {
            Ok(screen) => Some(QuickLink {
                label: link.label,
                screen,
                params: Params::from(link.params),
            }),
            Err(e) => {
                log::warn!("Skipping overview link '{}': {}", link.label, e);
                None
            }
        })
        .collect()
}

fn summarize(context: &SessionContext, stores: &Stores) -> Vec<(&'static str, String)> {
    let unread = stores.unread_count(&context.user_id).to_string();
    match context.role {
        Role::Admin => {
            let students = stores.students.list();
            let owing = students.iter().filter(|s| s.fee_balance > 0).count();
            vec![
                ("Students enrolled", students.len().to_string()),
                ("Families with balances", owing.to_string()),
                ("Unread notifications", unread),
            ]
        }
        Role::Parent => {
            let children = stores.children_of(&context.user_id);
            let due: u32 = children.iter().map(|s| s.fee_balance).sum();
            vec![
                ("Children", children.len().to_string()),
                ("Fees outstanding", due.to_string()),
                ("Unread notifications", unread),
            ]
        }
        Role::Student => {
            let me = stores.students.get(&context.user_id);
            vec![
                ("Grade", me.as_ref().map(|s| s.grade.to_string()).unwrap_or_else(|| "-".into())),
                (
                    "Attendance",
                    me.as_ref()
                        .map(|s| format!("{:.1}%", s.attendance_rate))
                        .unwrap_or_else(|| "-".into()),
                ),
                ("Unread notifications", unread),
            ]
        }
    }
}

impl Screen for OverviewScreen {
    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let [top, bottom] =
            Layout::vertical([Constraint::Length(self.summary.len() as u16 + 4), Constraint::Fill(1)]).areas(area);

        let mut lines = vec![
            Line::from(Span::styled(
                format!("Welcome, {}", self.context.display_name),
                Style::default().fg(theme.text),
            )),
            Line::from(""),
        ];
        for (label, value) in &self.summary {
            lines.push(Line::from(vec![
                Span::styled(format!("{:<24}", label), theme.muted_style()),
                Span::styled(value.clone(), Style::default().fg(theme.teal)),
            ]));
        }
        frame.render_widget(
            Paragraph::new(lines).block(panel(format!("{} overview", self.context.role.label()), theme)),
            top,
        );

        let items = self
            .links
            .iter()
            .map(|link| ListItem::new(Span::styled(link.label.clone(), Style::default().fg(theme.text))))
            .collect();
        render_list(frame, bottom, theme, panel("Quick links", theme), items, self.cursor);
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        if self.cursor.handle(key.code) {
            return Ok(true);
        }
        if key.code == KeyCode::Enter {
            if let Some(link) = self.cursor.index().and_then(|i| self.links.get(i)) {
                self.navigator.navigate_to(link.screen, link.label.clone(), link.params.clone());
            }
            return Ok(true);
        }
        Ok(false)
    }

    fn key_hints(&self) -> Vec<(KeyBinding, &'static str)> {
        vec![(KeyBinding::new(KeyCode::Enter), "Open link")]
    }
}
