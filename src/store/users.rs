//! User store: username to credentials.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use argon2::password_hash;
use thiserror::Error;
use tracing::debug;

use super::models::User;
use crate::auth::{hash_password, verify_password};
use crate::ids::{self, IdError};

#[derive(Debug, Error)]
pub enum UserError {
    #[error("user not found")]
    UserNotFound,
    #[error("invalid password")]
    InvalidPassword,
    #[error("already exists")]
    AlreadyExists,
    #[error("password hashing failed: {0}")]
    PasswordHash(#[from] password_hash::Error),
    #[error(transparent)]
    Id(#[from] IdError),
}

impl User {
    /// Build a new account with a fresh id and a hashed password.
    ///
    /// # Errors
    ///
    /// Returns an error if id generation or hashing fails.
    pub fn new(username: &str, password: &str) -> Result<Self, UserError> {
        Ok(Self {
            id: ids::record_id()?,
            username: username.to_string(),
            password_hash: hash_password(password)?,
        })
    }
}

#[derive(Debug, Default)]
pub struct UserStore {
    users: RwLock<HashMap<String, User>>,
}

impl UserStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lookup(&self, username: &str) -> Option<User> {
        self.users
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(username)
            .cloned()
    }

    /// Verify a username/password pair and return the account.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::UserNotFound`] for an unregistered username and
    /// [`UserError::InvalidPassword`] on a mismatch.
    pub fn check_credentials(&self, username: &str, password: &str) -> Result<User, UserError> {
        let user = self.lookup(username).ok_or(UserError::UserNotFound)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(UserError::InvalidPassword);
        }

        Ok(user)
    }

    /// Register an account.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::AlreadyExists`] if the username is registered,
    /// whatever password it was registered with.
    pub fn add_user(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);

        if users.contains_key(&user.username) {
            return Err(UserError::AlreadyExists);
        }

        users.insert(user.username.clone(), user.clone());
        debug!(username = %user.username, user_id = %user.id, "User added");
        Ok(user)
    }

    /// # Errors
    ///
    /// Returns [`UserError::UserNotFound`] if the username is unregistered.
    pub fn get_user(&self, username: &str) -> Result<User, UserError> {
        self.lookup(username).ok_or(UserError::UserNotFound)
    }
}
