use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Record;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectScore {
    pub subject: String,
    pub score: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub name: String,
    pub grade: u8,
    pub guardian_id: String,
    /// Percentage of school days attended this term
    pub attendance_rate: f32,
    /// Outstanding fees in whole currency units
    pub fee_balance: u32,
    pub scores: Vec<SubjectScore>,
}

impl Student {
    pub fn new(id: impl Into<String>, name: impl Into<String>, grade: u8, guardian_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            grade,
            guardian_id: guardian_id.into(),
            attendance_rate: 100.0,
            fee_balance: 0,
            scores: Vec::new(),
        }
    }

    pub fn with_attendance(mut self, rate: f32) -> Self {
        self.attendance_rate = rate;
        self
    }

    pub fn with_fee_balance(mut self, balance: u32) -> Self {
        self.fee_balance = balance;
        self
    }

    pub fn with_score(mut self, subject: impl Into<String>, score: u8) -> Self {
        self.scores.push(SubjectScore {
            subject: subject.into(),
            score,
        });
        self
    }

    pub fn average_score(&self) -> Option<f32> {
        if self.scores.is_empty() {
            return None;
        }
        let total: u32 = self.scores.iter().map(|s| s.score as u32).sum();
        Some(total as f32 / self.scores.len() as f32)
    }
}

impl Record for Student {
    const KIND: &'static str = "student";

    fn key(&self) -> String {
        self.id.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub read: bool,
}

impl Notification {
    pub fn new(user_id: impl Into<String>, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            title: title.into(),
            body: body.into(),
            created_at: Utc::now(),
            read: false,
        }
    }
}

impl Record for Notification {
    const KIND: &'static str = "notification";

    fn key(&self) -> String {
        self.id.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub thread: String,
    pub sender_id: String,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(thread: impl Into<String>, sender_id: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            thread: thread.into(),
            sender_id: sender_id.into(),
            body: body.into(),
            sent_at: Utc::now(),
        }
    }

    pub fn sent_at(mut self, at: DateTime<Utc>) -> Self {
        self.sent_at = at;
        self
    }
}

impl Record for ChatMessage {
    const KIND: &'static str = "message";

    fn key(&self) -> String {
        self.id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_score() {
        let student = Student::new("s1", "Ada", 10, "p1").with_score("Maths", 90).with_score("Art", 70);
        assert_eq!(student.average_score(), Some(80.0));
        assert_eq!(Student::new("s2", "Ben", 9, "p1").average_score(), None);
    }

    #[test]
    fn test_generated_keys_are_unique() {
        let a = Notification::new("u1", "Fees due", "Term 2 invoice");
        let b = Notification::new("u1", "Fees due", "Term 2 invoice");
        assert_ne!(a.key(), b.key());
        assert!(!a.read);
    }
}
