use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{ListItem, Paragraph};
use serde_json::json;

use super::widgets::{Cursor, panel, render_list};
use super::{Screen, ScreenProps};
use crate::nav::{Navigator, ScreenId};
use crate::store::{Student, Stores};
use crate::tui::{KeyBinding, Theme};

/// Students, optionally narrowed by `filter.grade` and `scope = "children"`
pub struct StudentListScreen {
    navigator: Navigator,
    heading: String,
    students: Vec<Student>,
    cursor: Cursor,
}

impl StudentListScreen {
    pub fn new(props: ScreenProps, stores: &Stores) -> Result<Self> {
        let grade = props.params.pointer("filter/grade").and_then(|v| v.as_u64());
        let children_only = props.params.get_str("scope") == Some("children");

        let mut students = if children_only {
            stores.children_of(&props.context.user_id)
        } else {
            stores.students.list()
        };
        if let Some(grade) = grade {
            students.retain(|s| u64::from(s.grade) == grade);
        }
        students.sort_by(|a, b| a.name.cmp(&b.name));

        let heading = match (children_only, grade) {
            (true, _) => "My children".to_string(),
            (false, Some(grade)) => format!("Grade {}", grade),
            (false, None) => "All students".to_string(),
        };

        Ok(Self {
            navigator: props.navigator,
            heading,
            cursor: Cursor::new(students.len()),
            students,
        })
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }
}

impl Screen for StudentListScreen {
    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let items = self
            .students
            .iter()
            .map(|s| {
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{:<20}", s.name), Style::default().fg(theme.text)),
                    Span::styled(format!("grade {:>2}  ", s.grade), theme.muted_style()),
                    Span::styled(s.id.clone(), theme.muted_style()),
                ]))
            })
            .collect();
        let title = format!("{} ({})", self.heading, self.students.len());
        render_list(frame, area, theme, panel(title, theme), items, self.cursor);
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        if self.cursor.handle(key.code) {
            return Ok(true);
        }
        if key.code == KeyCode::Enter {
            if let Some(student) = self.cursor.index().and_then(|i| self.students.get(i)) {
                self.navigator
                    .navigate_to(ScreenId::StudentDetail, student.name.clone(), json!({ "student_id": student.id }));
            }
            return Ok(true);
        }
        Ok(false)
    }

    fn key_hints(&self) -> Vec<(KeyBinding, &'static str)> {
        vec![(KeyBinding::new(KeyCode::Enter), "Open student")]
    }
}

const RECORD_LINKS: [ScreenId; 3] = [ScreenId::Attendance, ScreenId::Fees, ScreenId::ReportCard];

/// One student's profile with links into their records.
///
/// Students viewing their own profile need no `student_id`; everyone else
/// must pass one.
pub struct StudentDetailScreen {
    navigator: Navigator,
    student: Student,
    cursor: Cursor,
}

impl StudentDetailScreen {
    pub fn new(props: ScreenProps, stores: &Stores) -> Result<Self> {
        let id = props
            .params
            .get_str("student_id")
            .unwrap_or(&props.context.user_id)
            .to_string();
        let student = stores
            .students
            .get(&id)
            .with_context(|| format!("Student '{}' does not exist", id))?;
        Ok(Self {
            navigator: props.navigator,
            student,
            cursor: Cursor::new(RECORD_LINKS.len()),
        })
    }
}

impl Screen for StudentDetailScreen {
    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let [profile, links] = Layout::vertical([Constraint::Length(8), Constraint::Fill(1)]).areas(area);
        let s = &self.student;
        let row = |label: &str, value: String| {
            Line::from(vec![
                Span::styled(format!("{:<14}", label), theme.muted_style()),
                Span::styled(value, Style::default().fg(theme.text)),
            ])
        };
        let lines = vec![
            row("Student id", s.id.clone()),
            row("Grade", s.grade.to_string()),
            row("Attendance", format!("{:.1}%", s.attendance_rate)),
            row("Fee balance", s.fee_balance.to_string()),
            row(
                "Average",
                s.average_score().map(|a| format!("{:.1}", a)).unwrap_or_else(|| "-".into()),
            ),
        ];
        frame.render_widget(Paragraph::new(lines).block(panel(&s.name, theme)), profile);

        let items = RECORD_LINKS
            .iter()
            .map(|screen| ListItem::new(Span::styled(screen.label(), Style::default().fg(theme.text))))
            .collect();
        render_list(frame, links, theme, panel("Records", theme), items, self.cursor);
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        if self.cursor.handle(key.code) {
            return Ok(true);
        }
        if key.code == KeyCode::Enter {
            if let Some(screen) = self.cursor.index().and_then(|i| RECORD_LINKS.get(i)) {
                let title = format!("{} · {}", screen.label(), self.student.name);
                self.navigator
                    .navigate_to(*screen, title, json!({ "student_id": self.student.id }));
            }
            return Ok(true);
        }
        Ok(false)
    }

    fn key_hints(&self) -> Vec<(KeyBinding, &'static str)> {
        vec![(KeyBinding::new(KeyCode::Enter), "Open record")]
    }
}
