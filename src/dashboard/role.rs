use serde::{Deserialize, Serialize};
use std::fmt;

use crate::nav::{ScreenId, SessionContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Parent,
    Student,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Parent, Role::Student];

    pub fn label(self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Parent => "Parent",
            Role::Student => "Student",
        }
    }

    /// The chat screen id this role posts through
    pub fn chat_screen(self) -> ScreenId {
        match self {
            Role::Admin => ScreenId::AdminChat,
            Role::Parent => ScreenId::ParentChat,
            Role::Student => ScreenId::StudentChat,
        }
    }

    /// Demo account used when logging in as this role
    pub fn default_context(self) -> SessionContext {
        match self {
            Role::Admin => SessionContext::new(self, "admin-1", "Principal Hale"),
            Role::Parent => SessionContext::new(self, "parent-1", "Mrs Lovelace"),
            Role::Student => SessionContext::new(self, "stu-1001", "Ada Lovelace"),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_screens_are_distinct() {
        let screens: std::collections::HashSet<ScreenId> = Role::ALL.iter().map(|r| r.chat_screen()).collect();
        assert_eq!(screens.len(), 3);
    }

    #[test]
    fn test_default_context_matches_role() {
        for role in Role::ALL {
            assert_eq!(role.default_context().role, role);
        }
        assert_eq!(serde_json::to_string(&Role::Parent).unwrap(), "\"parent\"");
    }
}
