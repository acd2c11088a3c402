use anyhow::{Context, Result};
use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Cell, Row, Table};

use super::widgets::panel;
use super::{Screen, ScreenProps};
use crate::dashboard::Role;
use crate::store::{Student, Stores};
use crate::tui::Theme;

/// Which read-only table a [`RecordScreen`] shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Attendance,
    Fees,
    ReportCard,
    Timetable,
}

impl RecordKind {
    pub fn title(self) -> &'static str {
        match self {
            RecordKind::Attendance => "Attendance",
            RecordKind::Fees => "Fees",
            RecordKind::ReportCard => "Report card",
            RecordKind::Timetable => "Timetable",
        }
    }
}

const DAYS: [&str; 5] = ["Mon", "Tue", "Wed", "Thu", "Fri"];

fn subjects_for(grade: u8) -> [&'static str; 4] {
    if grade >= 11 {
        ["Mathematics", "Chemistry", "Biology", "English"]
    } else {
        ["Mathematics", "Physics", "English", "History"]
    }
}

/// Attendance, fees, report card or timetable for the students in scope.
///
/// Scope is the `student_id` param when given, otherwise derived from the
/// session: a student sees their own record, a parent their children, an
/// admin the whole school.
pub struct RecordScreen {
    kind: RecordKind,
    students: Vec<Student>,
}

impl RecordScreen {
    pub fn new(kind: RecordKind, props: ScreenProps, stores: &Stores) -> Result<Self> {
        let students = match props.params.get_str("student_id") {
            Some(id) => vec![
                stores
                    .students
                    .get(id)
                    .with_context(|| format!("Student '{}' does not exist", id))?,
            ],
            None => match props.context.role {
                Role::Student => stores.students.get(&props.context.user_id).into_iter().collect(),
                Role::Parent => stores.children_of(&props.context.user_id),
                Role::Admin => stores.students.list(),
            },
        };
        Ok(Self { kind, students })
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    fn header(&self) -> Vec<String> {
        match self.kind {
            RecordKind::Attendance => vec!["Student".into(), "Grade".into(), "Attendance".into(), "Status".into()],
            RecordKind::Fees => vec!["Student".into(), "Balance".into(), "Status".into()],
            RecordKind::ReportCard => vec!["Student".into(), "Subject".into(), "Score".into(), "Band".into()],
            RecordKind::Timetable => std::iter::once("Period".to_string())
                .chain(DAYS.iter().map(|d| d.to_string()))
                .collect(),
        }
    }

    pub fn rows(&self) -> Vec<Vec<String>> {
        match self.kind {
            RecordKind::Attendance => self
                .students
                .iter()
                .map(|s| {
                    let status = if s.attendance_rate < 90.0 { "At risk" } else { "Good" };
                    vec![
                        s.name.clone(),
                        s.grade.to_string(),
                        format!("{:.1}%", s.attendance_rate),
                        status.into(),
                    ]
                })
                .collect(),
            RecordKind::Fees => self
                .students
                .iter()
                .map(|s| {
                    let status = if s.fee_balance == 0 { "Paid" } else { "Outstanding" };
                    vec![s.name.clone(), s.fee_balance.to_string(), status.into()]
                })
                .collect(),
            RecordKind::ReportCard => self
                .students
                .iter()
                .flat_map(|s| {
                    s.scores.iter().map(move |score| {
                        vec![
                            s.name.clone(),
                            score.subject.clone(),
                            score.score.to_string(),
                            band(score.score).into(),
                        ]
                    })
                })
                .collect(),
            RecordKind::Timetable => {
                let grade = self.students.first().map(|s| s.grade).unwrap_or(10);
                let subjects = subjects_for(grade);
                (0..4)
                    .map(|period| {
                        std::iter::once(format!("P{}", period + 1))
                            .chain((0..DAYS.len()).map(|day| subjects[(period + day) % subjects.len()].to_string()))
                            .collect()
                    })
                    .collect()
            }
        }
    }
}

fn band(score: u8) -> &'static str {
    match score {
        90..=100 => "A",
        80..=89 => "B",
        70..=79 => "C",
        60..=69 => "D",
        _ => "E",
    }
}

impl Screen for RecordScreen {
    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let header = self.header();
        let widths: Vec<Constraint> = header.iter().map(|_| Constraint::Fill(1)).collect();
        let header = Row::new(header.into_iter().map(Cell::from))
            .style(Style::default().fg(theme.lavender).add_modifier(Modifier::BOLD));
        let rows = self
            .rows()
            .into_iter()
            .map(|cells| Row::new(cells.into_iter().map(Cell::from)).style(Style::default().fg(theme.text)));
        let table = Table::new(rows, widths)
            .header(header)
            .block(panel(self.kind.title(), theme));
        frame.render_widget(table, area);
    }
}
