//! Record storage behind a small trait so screens never share mutable
//! globals. Everything in the portal is in memory; a persistent backend only
//! has to implement [`Store`].

mod memory;
mod models;
mod seed;

pub use memory::MemoryStore;
pub use models::{ChatMessage, Notification, Student};

use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("no {kind} with key '{key}'")]
    NotFound { kind: &'static str, key: String },
}

/// Something a [`Store`] can hold
pub trait Record: Clone + Send + Sync + 'static {
    /// Used in error messages
    const KIND: &'static str;

    fn key(&self) -> String;
}

pub trait Store<T: Record>: Send + Sync {
    fn get(&self, key: &str) -> Option<T>;

    /// All records ordered by key
    fn list(&self) -> Vec<T>;

    /// Insert or replace by key, returning the replaced record
    fn upsert(&self, record: T) -> Option<T>;

    fn delete(&self, key: &str) -> Result<T, StoreError>;
}

pub type SharedStore<T> = Arc<dyn Store<T>>;

/// The stores a dashboard's screens read from
#[derive(Clone)]
pub struct Stores {
    pub students: SharedStore<Student>,
    pub notifications: SharedStore<Notification>,
    pub messages: SharedStore<ChatMessage>,
}

impl std::fmt::Debug for Stores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stores")
            .field("students", &self.students.list().len())
            .field("notifications", &self.notifications.list().len())
            .field("messages", &self.messages.list().len())
            .finish()
    }
}

impl Stores {
    /// Fresh, empty in-memory stores
    pub fn empty() -> Self {
        Self {
            students: Arc::new(MemoryStore::<Student>::new()),
            notifications: Arc::new(MemoryStore::<Notification>::new()),
            messages: Arc::new(MemoryStore::<ChatMessage>::new()),
        }
    }

    /// In-memory stores holding the demo school
    pub fn seeded() -> Self {
        let stores = Self::empty();
        seed::populate(&stores);
        stores
    }

    pub fn unread_count(&self, user_id: &str) -> usize {
        self.notifications
            .list()
            .iter()
            .filter(|n| n.user_id == user_id && !n.read)
            .count()
    }

    /// Students whose guardian is `guardian_id`
    pub fn children_of(&self, guardian_id: &str) -> Vec<Student> {
        self.students
            .list()
            .into_iter()
            .filter(|s| s.guardian_id == guardian_id)
            .collect()
    }

    /// Messages of one thread, oldest first
    pub fn thread(&self, thread: &str) -> Vec<ChatMessage> {
        let mut messages: Vec<ChatMessage> = self.messages.list().into_iter().filter(|m| m.thread == thread).collect();
        messages.sort_by_key(|m| m.sent_at);
        messages
    }
}
