//! Authentication and the session value handed to every service call

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{CadastreError, Result};
use crate::schemas::{Config, User, UserRole};

/// An authenticated user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user: User,
    pub started_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user: User, started_at: DateTime<Utc>) -> Self {
        Session { user, started_at }
    }

    pub fn role(&self) -> UserRole {
        self.user.role
    }

    pub fn user_id(&self) -> &str {
        &self.user.id
    }

    /// The same session with its user re-read from `users`.
    ///
    /// Role and entity changes take effect on the next command; a user that
    /// no longer exists ends the session.
    pub fn refresh(&self, users: &[User]) -> Result<Session> {
        let user = users
            .iter()
            .find(|u| u.id == self.user.id)
            .ok_or(CadastreError::Unauthenticated)?;
        Ok(Session::new(user.clone(), self.started_at))
    }
}

/// Authenticate `email` against the known users.
///
/// Every account shares the configured demo password. An unknown email and a
/// wrong password fail with the same error.
pub fn authenticate(
    users: &[User],
    email: &str,
    password: &str,
    config: &Config,
    now: DateTime<Utc>,
) -> Result<Session> {
    let email = email.trim();
    let user = users
        .iter()
        .find(|u| u.email.eq_ignore_ascii_case(email))
        .filter(|_| password == config.demo_password)
        .ok_or(CadastreError::AuthenticationFailed)?;
    Ok(Session::new(user.clone(), now))
}
