use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every screen any dashboard can show.
///
/// This is a closed set: a dashboard registers the subset it supports in its
/// [`ViewRegistry`](crate::nav::ViewRegistry), and anything reachable from its
/// chrome must be registered or the dashboard refuses to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenId {
    Overview,
    StudentList,
    Children,
    StudentDetail,
    Attendance,
    Fees,
    ReportCard,
    Timetable,
    Messages,
    AdminChat,
    ParentChat,
    StudentChat,
    Notifications,
    Settings,
}

impl ScreenId {
    pub const ALL: &'static [ScreenId] = &[
        ScreenId::Overview,
        ScreenId::StudentList,
        ScreenId::Children,
        ScreenId::StudentDetail,
        ScreenId::Attendance,
        ScreenId::Fees,
        ScreenId::ReportCard,
        ScreenId::Timetable,
        ScreenId::Messages,
        ScreenId::AdminChat,
        ScreenId::ParentChat,
        ScreenId::StudentChat,
        ScreenId::Notifications,
        ScreenId::Settings,
    ];

    /// Stable identifier used in params, config and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            ScreenId::Overview => "overview",
            ScreenId::StudentList => "student_list",
            ScreenId::Children => "children",
            ScreenId::StudentDetail => "student_detail",
            ScreenId::Attendance => "attendance",
            ScreenId::Fees => "fees",
            ScreenId::ReportCard => "report_card",
            ScreenId::Timetable => "timetable",
            ScreenId::Messages => "messages",
            ScreenId::AdminChat => "admin_chat",
            ScreenId::ParentChat => "parent_chat",
            ScreenId::StudentChat => "student_chat",
            ScreenId::Notifications => "notifications",
            ScreenId::Settings => "settings",
        }
    }

    /// Human readable name, used for default titles and the search overlay
    pub fn label(&self) -> &'static str {
        match self {
            ScreenId::Overview => "Overview",
            ScreenId::StudentList => "Students",
            ScreenId::Children => "My Children",
            ScreenId::StudentDetail => "Student",
            ScreenId::Attendance => "Attendance",
            ScreenId::Fees => "Fees",
            ScreenId::ReportCard => "Report Card",
            ScreenId::Timetable => "Timetable",
            ScreenId::Messages => "Messages",
            ScreenId::AdminChat => "Chat",
            ScreenId::ParentChat => "Chat",
            ScreenId::StudentChat => "Chat",
            ScreenId::Notifications => "Notifications",
            ScreenId::Settings => "Settings",
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown screen identifier '{0}'")]
pub struct UnknownScreen(pub String);

impl FromStr for ScreenId {
    type Err = UnknownScreen;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScreenId::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownScreen(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_matches_as_str() {
        for id in ScreenId::ALL {
            assert_eq!(id.as_str().parse::<ScreenId>(), Ok(*id));
        }
    }

    #[test]
    fn test_parse_unknown() {
        let err = "nonexistent".parse::<ScreenId>().unwrap_err();
        assert_eq!(err, UnknownScreen("nonexistent".to_string()));
        assert_eq!(err.to_string(), "unknown screen identifier 'nonexistent'");
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&ScreenId::ReportCard).unwrap();
        assert_eq!(json, "\"report_card\"");
    }
}
