//! Login session model.
//!
//! Demo authentication only: a session is whatever the login form last wrote
//! to storage. It is not a security boundary.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Student,
    Teacher,
}

impl UserType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Teacher => "teacher",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "student" => Some(Self::Student),
            "teacher" => Some(Self::Teacher),
            _ => None,
        }
    }
}

/// Logged-in user as read back from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_type: UserType,
    pub user_name: Option<String>,
    /// `studentId` for students, `teacherId` for teachers.
    pub user_id: Option<String>,
}

impl Session {
    /// First word of the display name, used in dashboard greetings.
    pub fn first_name(&self) -> Option<&str> {
        self.user_name
            .as_deref()
            .and_then(|name| name.split_whitespace().next())
    }
}
