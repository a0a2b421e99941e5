use crate::error::{DomainError, DomainResult};
use crate::model::{mint_token, username_from_token, User};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Store shared by every user actor in every engine.
pub type SharedUsers = Arc<RwLock<UserStore>>;

#[derive(Debug, Default)]
pub struct UserStore {
    users: HashMap<String, User>,
}

impl UserStore {
    pub fn shared() -> SharedUsers {
        Arc::new(RwLock::new(Self::default()))
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn contains(&self, username: &str) -> bool {
        self.users.contains_key(username)
    }

    pub fn register(&mut self, username: &str, password: &str) -> DomainResult<()> {
        if username.is_empty() || password.is_empty() {
            return Err(DomainError::invalid("Username and password are required"));
        }
        if self.users.contains_key(username) {
            return Err(DomainError::conflict("Username already exists"));
        }
        self.users
            .insert(username.to_string(), User::new(username, password));
        Ok(())
    }

    pub fn login(&self, username: &str, password: &str) -> DomainResult<String> {
        match self.users.get(username) {
            Some(user) if user.password == password => Ok(mint_token(username)),
            _ => Err(DomainError::unauthorized("Invalid credentials")),
        }
    }

    /// Returns the username the token belongs to.
    pub fn validate_token(&self, token: &str) -> DomainResult<String> {
        username_from_token(token)
            .filter(|username| self.users.contains_key(*username))
            .map(str::to_string)
            .ok_or_else(|| DomainError::unauthorized("Invalid token"))
    }

    /// Applies a karma delta; `None` if the user is unknown.
    pub fn adjust_karma(&mut self, username: &str, delta: i64) -> Option<i64> {
        let user = self.users.get_mut(username)?;
        user.karma += delta;
        Some(user.karma)
    }

    pub fn karma(&self, username: &str) -> DomainResult<i64> {
        self.users
            .get(username)
            .map(|user| user.karma)
            .ok_or_else(|| DomainError::not_found("User not found"))
    }
}
