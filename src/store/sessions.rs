//! Session store: opaque token to (username, user id).
//!
//! Sessions live until destroyed. A user may hold any number of them.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use thiserror::Error;
use tracing::debug;

use super::models::Session;
use crate::ids::{self, IdError};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("session not found")]
    NotFound,
}

#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session for the given user under a fresh random token.
    ///
    /// # Errors
    ///
    /// Returns [`IdError`] if no token could be generated.
    pub fn create(&self, username: &str, user_id: &str) -> Result<Session, IdError> {
        let session = Session {
            id: ids::session_id()?,
            username: username.to_string(),
            user_id: user_id.to_string(),
        };

        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(session.id.clone(), session.clone());

        debug!(%username, %user_id, "Session created");
        Ok(session)
    }

    /// # Errors
    ///
    /// Returns [`SessionError::NotFound`] for an unknown token.
    pub fn lookup(&self, token: &str) -> Result<Session, SessionError> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(token)
            .cloned()
            .ok_or(SessionError::NotFound)
    }

    /// Remove a session. Unknown tokens are ignored.
    pub fn destroy(&self, token: &str) {
        let removed = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(token);

        if let Some(session) = removed {
            debug!(username = %session.username, "Session destroyed");
        }
    }
}
