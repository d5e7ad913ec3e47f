// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Server-side user collection.
//!
//! Stored as one JSON array under [`keys::SERVER_USERS`]. Read-modify-write
//! cycles are serialized by a mutex so two concurrent registrations in this
//! process cannot claim the same email.

use std::sync::{Arc, Mutex, PoisonError};

use super::{codec, keys, KeyValueStore};
use crate::error::AppError;
use crate::models::user::{normalize_email, User};

/// User records backing the credential service.
pub struct UserDirectory {
    store: Arc<dyn KeyValueStore>,
    write_lock: Mutex<()>,
}

impl UserDirectory {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    fn load(&self) -> Vec<User> {
        codec::read_json_or_default(self.store.as_ref(), keys::SERVER_USERS)
    }

    /// Create a user. Fails with `DuplicateEmail` if the email is taken.
    pub fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: String,
        credits: u32,
    ) -> Result<User, AppError> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let mut users = self.load();
        let email = normalize_email(email);
        if users.iter().any(|u| u.email == email) {
            return Err(AppError::DuplicateEmail);
        }

        let user = User::new(name.trim(), &email, password_hash, credits);
        users.push(user.clone());
        codec::write_json(self.store.as_ref(), keys::SERVER_USERS, &users)?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Look up a user by email (normalized before comparison).
    pub fn find_by_email(&self, email: &str) -> Option<User> {
        let email = normalize_email(email);
        self.load().into_iter().find(|u| u.email == email)
    }

    /// Look up a user by id.
    pub fn get(&self, user_id: &str) -> Option<User> {
        self.load().into_iter().find(|u| u.id == user_id)
    }
}
