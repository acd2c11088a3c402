use chrono::{Duration, Utc};

use super::{ChatMessage, Notification, Student, Stores};

/// Demo school: one admin, one parent with two children, one student login
pub(super) fn populate(stores: &Stores) {
    let students = [
        Student::new("stu-1001", "Ada Lovelace", 10, "parent-1")
            .with_attendance(97.5)
            .with_fee_balance(0)
            .with_score("Mathematics", 94)
            .with_score("Physics", 88)
            .with_score("English", 81),
        Student::new("stu-1002", "Ben Okafor", 10, "parent-2")
            .with_attendance(91.0)
            .with_fee_balance(320)
            .with_score("Mathematics", 72)
            .with_score("Physics", 65)
            .with_score("English", 79),
        Student::new("stu-1003", "Chloe Martin", 11, "parent-3")
            .with_attendance(99.0)
            .with_score("Mathematics", 85)
            .with_score("Chemistry", 90),
        Student::new("stu-1004", "Dev Lovelace", 8, "parent-1")
            .with_attendance(88.5)
            .with_fee_balance(150)
            .with_score("Mathematics", 68)
            .with_score("Geography", 77),
        Student::new("stu-1005", "Eun-ji Park", 12, "parent-4")
            .with_attendance(95.0)
            .with_score("Biology", 92)
            .with_score("English", 89),
        Student::new("stu-1006", "Farid Haddad", 9, "parent-5")
            .with_attendance(82.0)
            .with_fee_balance(540)
            .with_score("History", 74),
    ];
    for student in students {
        stores.students.upsert(student);
    }

    let notifications = [
        Notification::new("admin-1", "Fee reminders sent", "3 families have outstanding balances."),
        Notification::new("admin-1", "Staff meeting", "Thursday 15:30 in the library."),
        Notification::new("parent-1", "Report cards published", "Term 1 report cards are available."),
        Notification::new("parent-1", "Fees due", "Dev Lovelace has 150 outstanding."),
        Notification::new("stu-1001", "Timetable change", "Physics moves to period 2 on Friday."),
    ];
    for notification in notifications {
        stores.notifications.upsert(notification);
    }

    let start = Utc::now() - Duration::hours(2);
    let messages = [
        ("general", "admin-1", "Welcome back everyone, term starts Monday."),
        ("general", "parent-1", "Thanks! Is the bus schedule unchanged?"),
        ("general", "admin-1", "Yes, same routes as last term."),
        ("general", "stu-1001", "Will the science fair still be in March?"),
    ];
    for (offset, (thread, sender, body)) in messages.into_iter().enumerate() {
        let at = start + Duration::minutes(offset as i64 * 7);
        stores.messages.upsert(ChatMessage::new(thread, sender, body).sent_at(at));
    }
}
