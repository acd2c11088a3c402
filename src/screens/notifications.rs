use anyhow::Result;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::ListItem;

use super::widgets::{Cursor, panel, render_list};
use super::{Screen, ScreenProps};
use crate::store::{Notification, Stores};
use crate::tui::Theme;

/// The user's notifications, newest first. Mounting marks them read; the
/// ones that were unread stay highlighted for the life of the mount.
pub struct NotificationsScreen {
    items: Vec<(Notification, bool)>,
    cursor: Cursor,
}

impl NotificationsScreen {
    pub fn new(props: ScreenProps, stores: &Stores) -> Result<Self> {
        let mut mine: Vec<Notification> = stores
            .notifications
            .list()
            .into_iter()
            .filter(|n| n.user_id == props.context.user_id)
            .collect();
        mine.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let items: Vec<(Notification, bool)> = mine
            .into_iter()
            .map(|n| {
                let was_unread = !n.read;
                if was_unread {
                    stores.notifications.upsert(Notification { read: true, ..n.clone() });
                }
                (n, was_unread)
            })
            .collect();
        log::debug!(
            "Marked {} notifications read for {}",
            items.iter().filter(|(_, new)| *new).count(),
            props.context.user_id
        );

        Ok(Self {
            cursor: Cursor::new(items.len()),
            items,
        })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Screen for NotificationsScreen {
    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let items = self
            .items
            .iter()
            .map(|(n, new)| {
                let title_style = if *new {
                    Style::default().fg(theme.peach).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(theme.text)
                };
                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(if *new { "● " } else { "  " }, Style::default().fg(theme.peach)),
                        Span::styled(n.title.clone(), title_style),
                        Span::styled(n.created_at.format("  %d %b %H:%M").to_string(), theme.muted_style()),
                    ]),
                    Line::from(Span::styled(format!("  {}", n.body), theme.muted_style())),
                ])
            })
            .collect();
        render_list(frame, area, theme, panel("Notifications", theme), items, self.cursor);
    }

    fn handle_key(&mut self, key: crossterm::event::KeyEvent) -> Result<bool> {
        Ok(self.cursor.handle(key.code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::Role;
    use crate::nav::{Navigator, Params, SessionContext};

    #[test]
    fn test_mount_marks_only_own_notifications_read() {
        let stores = Stores::seeded();
        let before_admin = stores.unread_count("admin-1");
        assert!(stores.unread_count("parent-1") > 0);

        let (navigator, _queue) = Navigator::channel();
        let props = ScreenProps {
            params: Params::new(),
            navigator,
            context: SessionContext::new(Role::Parent, "parent-1", "Mrs Lovelace"),
        };
        let screen = NotificationsScreen::new(props, &stores).unwrap();

        assert_eq!(screen.len(), 2);
        assert!(screen.items.iter().all(|(_, new)| *new));
        assert_eq!(stores.unread_count("parent-1"), 0);
        assert_eq!(stores.unread_count("admin-1"), before_admin);
    }
}
