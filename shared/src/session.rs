//! Session state and the local checks that run before any identity request.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::RequestTicket;
use crate::{AppError, ErrorKind, MIN_PASSWORD_LENGTH};

typed_id!(UserId);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionState {
    Authenticated,
    Unauthenticated,
    #[default]
    Loading,
    Error {
        message: String,
    },
}

impl SessionState {
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated)
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub uid: UserId,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

impl UserProfile {
    #[must_use]
    pub fn name_or_default(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or("User")
    }

    /// Avatar initials: first letters of the first two words, or the first
    /// two letters of a single word, uppercased.
    #[must_use]
    pub fn initials(&self) -> String {
        initials_for(self.name_or_default())
    }
}

#[must_use]
pub fn initials_for(name: &str) -> String {
    let mut words = name.split_whitespace();
    let first = words.next();
    let second = words.next();

    let initials: String = match (first, second) {
        (Some(a), Some(b)) => a.chars().take(1).chain(b.chars().take(1)).collect(),
        (Some(a), None) => a.chars().take(2).collect(),
        _ => String::new(),
    };

    if initials.is_empty() {
        "U".to_string()
    } else {
        initials.to_uppercase()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CredentialsError {
    #[error("Email or password can't be empty")]
    EmptyCredentials,
    #[error("Must fill all fields")]
    MissingFields,
    #[error("Password length is too short!")]
    PasswordTooShort,
    #[error("Passwords don't match")]
    PasswordMismatch,
}

impl From<CredentialsError> for AppError {
    fn from(e: CredentialsError) -> Self {
        AppError::new(ErrorKind::Validation, e.to_string())
    }
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

pub fn validate_sign_in(email: &str, password: &str) -> Result<(), CredentialsError> {
    if is_blank(email) || is_blank(password) {
        return Err(CredentialsError::EmptyCredentials);
    }
    Ok(())
}

/// Checks run in order; the first failure wins.
pub fn validate_sign_up(
    name: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> Result<(), CredentialsError> {
    if is_blank(name) || is_blank(email) || is_blank(password) || is_blank(confirm_password) {
        return Err(CredentialsError::MissingFields);
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(CredentialsError::PasswordTooShort);
    }
    if password != confirm_password {
        return Err(CredentialsError::PasswordMismatch);
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AccountDeletion {
    #[default]
    Idle,
    InProgress,
    Failed {
        message: String,
    },
}

/// Outstanding current-user lookup. A sign-in, sign-up or sign-out started
/// after the lookup makes its answer stale.
#[derive(Debug, Default)]
pub struct SessionCheck {
    issued: u64,
    pending: Option<RequestTicket>,
}

impl SessionCheck {
    pub fn begin(&mut self) -> RequestTicket {
        self.issued += 1;
        let ticket = RequestTicket(self.issued);
        self.pending = Some(ticket);
        ticket
    }

    pub fn supersede(&mut self) {
        if let Some(ticket) = self.pending.take() {
            tracing::debug!(ticket = ticket.0, "session check superseded");
        }
    }

    /// Consumes the pending ticket. Returns `false` for a stale answer.
    pub fn finish(&mut self, ticket: RequestTicket) -> bool {
        if self.pending == Some(ticket) {
            self.pending = None;
            true
        } else {
            tracing::debug!(ticket = ticket.0, "dropping stale session check");
            false
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
