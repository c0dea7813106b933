//! Explicit session context for a signed-in board user.
//!
//! A session is started when a user signs in and cleared at logout. Board
//! services hold a [`SessionContext`] and refuse to operate once it has been
//! cleared.

use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};

/// Identity of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    id: String,
    email: String,
}

impl SessionUser {
    /// Creates a user identity.
    #[must_use]
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the user's email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }
}

/// An active sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    user: SessionUser,
    started_at: DateTime<Utc>,
}

impl Session {
    /// Starts a session for a user at the current clock time.
    #[must_use]
    pub fn start(user: SessionUser, clock: &impl Clock) -> Self {
        Self {
            user,
            started_at: clock.utc(),
        }
    }

    /// Returns the signed-in user.
    #[must_use]
    pub const fn user(&self) -> &SessionUser {
        &self.user
    }

    /// Returns when the session started.
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

/// Shared holder of the current session, if any.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    current: Arc<RwLock<Option<Session>>>,
}

impl SessionContext {
    /// Creates a context holding an active session.
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self {
            current: Arc::new(RwLock::new(Some(session))),
        }
    }

    /// Installs a session, replacing any previous one.
    pub fn begin(&self, session: Session) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(session);
    }

    /// Clears the session, returning the one that ended.
    pub fn end(&self) -> Option<Session> {
        self.current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    /// Returns a copy of the active session.
    #[must_use]
    pub fn current(&self) -> Option<Session> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns `true` while a session is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}
