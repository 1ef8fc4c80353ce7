//! In-memory user store.
//!
//! Handed to controllers as the shared resource. Validation mirrors the user
//! schema: username of 3 to 20 word characters, password of 8 to 20
//! characters, unique username and email, email stored lowercase.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A stored user. The password never leaves the store.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub email: String,
}

/// User fields as submitted by a client; any may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewUser {
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserError {
    #[error("Required data missing")]
    MissingFields,

    #[error("username must be 3 to 20 letters, digits or underscores")]
    InvalidUsername,

    #[error("password must be 8 to 20 characters")]
    InvalidPassword,

    #[error("{0} is already taken")]
    Duplicate(&'static str),
}

#[derive(Default)]
pub struct UserStore {
    users: DashMap<u64, User>,
    next_id: AtomicU64,
    /// Serializes inserts so uniqueness checks and writes are atomic.
    insert_lock: Mutex<()>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All users ordered by id.
    pub fn list(&self) -> Vec<User> {
        let mut users: Vec<User> = self.users.iter().map(|entry| entry.value().clone()).collect();
        users.sort_by_key(|u| u.id);
        users
    }

    pub fn get(&self, id: u64) -> Option<User> {
        self.users.get(&id).map(|entry| entry.value().clone())
    }

    /// Validate and store a new user.
    pub fn insert(&self, new_user: NewUser) -> Result<User, UserError> {
        let (Some(username), Some(password), Some(email)) =
            (new_user.username, new_user.password, new_user.email)
        else {
            return Err(UserError::MissingFields);
        };
        let email = email.trim().to_lowercase();
        if username.is_empty() || password.is_empty() || email.is_empty() {
            return Err(UserError::MissingFields);
        }

        let username_len = username.chars().count();
        if !(3..=20).contains(&username_len)
            || !username.chars().all(|c| c.is_alphanumeric() || c == '_')
        {
            return Err(UserError::InvalidUsername);
        }
        if !(8..=20).contains(&password.chars().count()) {
            return Err(UserError::InvalidPassword);
        }

        let _guard = self.insert_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        for entry in self.users.iter() {
            if entry.username == username {
                return Err(UserError::Duplicate("username"));
            }
            if entry.email == email {
                return Err(UserError::Duplicate("email"));
            }
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let user = User { id, username, password, email };
        self.users.insert(id, user.clone());
        Ok(user)
    }

    pub fn remove(&self, id: u64) -> Option<User> {
        self.users.remove(&id).map(|(_, user)| user)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str, password: &str, email: &str) -> NewUser {
        NewUser {
            username: Some(username.into()),
            password: Some(password.into()),
            email: Some(email.into()),
        }
    }

    #[test]
    fn test_insert_and_list() {
        let store = UserStore::new();
        let alice = store.insert(new_user("alice", "password1", "Alice@Example.com")).unwrap();
        let bob = store.insert(new_user("bob_2", "password2", "bob@example.com")).unwrap();

        assert_eq!(alice.id, 1);
        assert_eq!(alice.email, "alice@example.com");
        assert_eq!(store.list(), vec![alice.clone(), bob]);
        assert_eq!(store.get(1), Some(alice));
    }

    #[test]
    fn test_missing_fields() {
        let store = UserStore::new();
        let partial = NewUser { username: Some("alice".into()), ..NewUser::default() };
        assert_eq!(store.insert(partial), Err(UserError::MissingFields));
        assert_eq!(store.insert(new_user("alice", "password1", "")), Err(UserError::MissingFields));
        assert!(store.is_empty());
    }

    #[test]
    fn test_field_rules() {
        let store = UserStore::new();
        assert_eq!(store.insert(new_user("al", "password1", "a@x.io")), Err(UserError::InvalidUsername));
        assert_eq!(store.insert(new_user("al ice", "password1", "a@x.io")), Err(UserError::InvalidUsername));
        assert_eq!(store.insert(new_user("alice", "short", "a@x.io")), Err(UserError::InvalidPassword));
    }

    #[test]
    fn test_duplicates() {
        let store = UserStore::new();
        store.insert(new_user("alice", "password1", "alice@example.com")).unwrap();
        assert_eq!(
            store.insert(new_user("alice", "password1", "other@example.com")),
            Err(UserError::Duplicate("username"))
        );
        assert_eq!(
            store.insert(new_user("alice2", "password1", "ALICE@example.com")),
            Err(UserError::Duplicate("email"))
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove() {
        let store = UserStore::new();
        let user = store.insert(new_user("alice", "password1", "alice@example.com")).unwrap();
        assert_eq!(store.remove(user.id), Some(user));
        assert_eq!(store.remove(1), None);
    }

    #[test]
    fn test_password_not_serialized() {
        let user = User { id: 1, username: "a".into(), password: "secret".into(), email: "e".into() };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
    }
}
