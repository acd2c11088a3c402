//! Stock panels drawn in place of a screen, plus overlay helpers.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};

use super::Theme;

/// Rect of at most `width` x `height` centered in `container`
pub fn centered_rect(width: u16, height: u16, container: Rect) -> Rect {
    let width = width.min(container.width);
    let height = height.min(container.height);
    Rect {
        x: container.x + container.width.saturating_sub(width) / 2,
        y: container.y + container.height.saturating_sub(height) / 2,
        width,
        height,
    }
}

/// Blank out `area` behind a modal
pub fn render_dim_overlay(frame: &mut Frame, theme: &Theme, area: Rect) {
    frame.render_widget(Clear, area);
    frame.render_widget(Block::default().style(Style::default().bg(theme.mantle)), area);
}

fn render_panel(frame: &mut Frame, area: Rect, theme: &Theme, title: &str, border: Style, lines: Vec<Line<'_>>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border)
        .title(Span::styled(format!(" {} ", title), theme.title_style()));
    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

/// Placeholder while a deferred screen is loading
pub fn render_loading(frame: &mut Frame, area: Rect, theme: &Theme, label: &str) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(format!("Loading {}...", label), theme.warning_style())),
    ];
    render_panel(frame, area, theme, label, theme.border_style(), lines);
}

/// Fallback for a screen id with no registry entry
pub fn render_not_found(frame: &mut Frame, area: Rect, theme: &Theme, screen: &str) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("View not found: {}", screen),
            theme.error_style().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("Press Esc to go back", theme.muted_style())),
    ];
    render_panel(frame, area, theme, "Not found", theme.error_style(), lines);
}

/// Shown when a screen failed to load, mount, or handle input
pub fn render_failed(frame: &mut Frame, area: Rect, theme: &Theme, label: &str, message: &str) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("{} could not be shown", label),
            theme.error_style().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(message.to_string(), Style::default().fg(theme.text))),
        Line::from(""),
        Line::from(Span::styled("Press Esc to go back", theme.muted_style())),
    ];
    render_panel(frame, area, theme, "Error", theme.error_style(), lines);
}

/// Yes/no confirmation box centered over `container`
pub fn render_confirm(frame: &mut Frame, container: Rect, theme: &Theme, title: &str, question: &str) {
    let area = centered_rect(44, 7, container);
    render_dim_overlay(frame, theme, area);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(question.to_string(), Style::default().fg(theme.text))),
        Line::from(""),
        Line::from(vec![
            Span::styled("[Y/Enter]", theme.key_style()),
            Span::styled(" Yes   ", theme.muted_style()),
            Span::styled("[N/Esc]", theme.key_style()),
            Span::styled(" No", theme.muted_style()),
        ]),
    ];
    render_panel(frame, area, theme, title, Style::default().fg(theme.mauve), lines);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(f: impl FnOnce(&mut Frame)) -> String {
        let mut terminal = Terminal::new(TestBackend::new(50, 10)).unwrap();
        terminal.draw(f).unwrap();
        terminal.backend().buffer().content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_centered_rect_is_clamped() {
        let container = Rect::new(0, 0, 20, 5);
        assert_eq!(centered_rect(10, 3, container), Rect::new(5, 1, 10, 3));
        assert_eq!(centered_rect(40, 9, container), container);
    }

    #[test]
    fn test_panels_render_their_text() {
        let theme = Theme::default();
        assert!(draw(|f| render_loading(f, f.area(), &theme, "Fees")).contains("Loading Fees..."));
        assert!(draw(|f| render_not_found(f, f.area(), &theme, "timetable")).contains("View not found: timetable"));
        assert!(draw(|f| render_failed(f, f.area(), &theme, "Fees", "disk on fire")).contains("disk on fire"));
        assert!(draw(|f| render_confirm(f, f.area(), &theme, "Quit", "Quit the portal?")).contains("Quit the portal?"));
    }
}
