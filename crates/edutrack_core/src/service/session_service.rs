//! Demo login session service.
//!
//! # Responsibility
//! - Write the demo profile for a student or teacher login.
//! - Read the current session back and clear it on logout.
//!
//! # Invariants
//! - Any non-blank email and password are accepted. This is not authentication.
//! - Logout removes every session key, whichever role was logged in.

use crate::model::session::{Session, UserType};
use crate::storage::{KeyValueStorage, StorageError, StorageResult};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const USER_TYPE_KEY: &str = "userType";
pub const USER_NAME_KEY: &str = "userName";
pub const STUDENT_ID_KEY: &str = "studentId";
pub const TEACHER_ID_KEY: &str = "teacherId";

const SESSION_KEYS: &[&str] = &[USER_TYPE_KEY, USER_NAME_KEY, STUDENT_ID_KEY, TEACHER_ID_KEY];

const DEMO_STUDENT_NAME: &str = "Alex Johnson";
const DEMO_STUDENT_ID: &str = "ST2024001";
const DEMO_TEACHER_NAME: &str = "Dr. Sarah Wilson";
const DEMO_TEACHER_ID: &str = "TCH2024001";

#[derive(Debug)]
pub enum SessionError {
    EmptyEmail,
    EmptyPassword,
    Storage(StorageError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email cannot be empty"),
            Self::EmptyPassword => write!(f, "password cannot be empty"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::EmptyEmail | Self::EmptyPassword => None,
        }
    }
}

impl From<StorageError> for SessionError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Login form input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    fn check(&self) -> Result<(), SessionError> {
        if self.email.trim().is_empty() {
            return Err(SessionError::EmptyEmail);
        }
        if self.password.trim().is_empty() {
            return Err(SessionError::EmptyPassword);
        }
        Ok(())
    }
}

pub struct SessionService<S: KeyValueStorage> {
    storage: S,
}

impl<S: KeyValueStorage> SessionService<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Logs in as `user_type` with the matching demo profile.
    pub fn login(
        &self,
        user_type: UserType,
        credentials: &Credentials,
    ) -> Result<Session, SessionError> {
        credentials.check()?;

        let (name, id_key, id) = match user_type {
            UserType::Student => (DEMO_STUDENT_NAME, STUDENT_ID_KEY, DEMO_STUDENT_ID),
            UserType::Teacher => (DEMO_TEACHER_NAME, TEACHER_ID_KEY, DEMO_TEACHER_ID),
        };
        self.storage.set_item(USER_TYPE_KEY, user_type.as_str())?;
        self.storage.set_item(USER_NAME_KEY, name)?;
        self.storage.set_item(id_key, id)?;

        info!(
            "event=login module=service status=ok user_type={}",
            user_type.as_str()
        );
        Ok(Session {
            user_type,
            user_name: Some(name.to_string()),
            user_id: Some(id.to_string()),
        })
    }

    pub fn login_student(&self, credentials: &Credentials) -> Result<Session, SessionError> {
        self.login(UserType::Student, credentials)
    }

    pub fn login_teacher(&self, credentials: &Credentials) -> Result<Session, SessionError> {
        self.login(UserType::Teacher, credentials)
    }

    /// Reads the session back; `None` when `userType` is missing or unknown.
    pub fn current(&self) -> StorageResult<Option<Session>> {
        let Some(user_type) = self
            .storage
            .get_item(USER_TYPE_KEY)?
            .as_deref()
            .and_then(UserType::parse)
        else {
            return Ok(None);
        };

        let id_key = match user_type {
            UserType::Student => STUDENT_ID_KEY,
            UserType::Teacher => TEACHER_ID_KEY,
        };
        Ok(Some(Session {
            user_type,
            user_name: self.storage.get_item(USER_NAME_KEY)?,
            user_id: self.storage.get_item(id_key)?,
        }))
    }

    pub fn logout(&self) -> StorageResult<()> {
        for key in SESSION_KEYS {
            self.storage.remove_item(key)?;
        }
        info!("event=logout module=service status=ok");
        Ok(())
    }
}
