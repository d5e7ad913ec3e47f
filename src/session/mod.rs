// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client session state: who is logged in, their credits, and their
//! generation history.
//!
//! [`SessionManager`] is the single owner of this state. Every mutation is
//! mirrored to the [`KeyValueStore`] immediately; the store is only read
//! back at [`SessionManager::initialize`] and for history, which is always
//! read fresh. Corrupt persisted values degrade to empty defaults with a
//! logged warning, and failed writes are logged but never surface to the
//! caller.

pub mod workflow;

pub use workflow::{GenerationOutcome, GenerationWorkflow};

use std::sync::Arc;

use serde::Serialize;

use crate::crypto;
use crate::db::{codec, keys, KeyValueStore};
use crate::error::AppError;
use crate::models::user::normalize_email;
use crate::models::{Generation, Plan, User, HISTORY_LIMIT};

/// Credits granted to a newly registered local user.
pub const STARTING_CREDITS: u32 = 10;

/// Top-level views the session can redirect to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Landing,
    Pricing,
}

/// Signals for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    ShowLogin,
    HideLogin,
    Navigate(View),
}

/// Which generations to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryFilter {
    #[default]
    All,
    Favorites,
}

/// Session & credit manager.
pub struct SessionManager {
    store: Arc<dyn KeyValueStore>,
    user: Option<User>,
    credits: u32,
    show_login: bool,
    bcrypt_cost: u32,
    events: Vec<UiEvent>,
}

impl SessionManager {
    /// Rehydrate the session from the store.
    ///
    /// A missing current-user blob is the normal logged-out state; a
    /// malformed one is logged and treated the same way.
    pub fn initialize(store: Arc<dyn KeyValueStore>) -> Self {
        let user: Option<User> = codec::read_json(store.as_ref(), keys::CURRENT_USER);
        let credits = user.as_ref().map_or(0, |u| u.credits);

        match &user {
            Some(u) => tracing::info!(user_id = %u.id, credits, "Session restored"),
            None => tracing::debug!("No persisted session"),
        }

        Self {
            store,
            user,
            credits,
            show_login: false,
            bcrypt_cost: crypto::DEFAULT_BCRYPT_COST,
            events: Vec::new(),
        }
    }

    /// Override the bcrypt cost used for new registrations.
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    /// End the session lifecycle. State is already persisted.
    pub fn teardown(self) {
        tracing::debug!(
            logged_in = self.user.is_some(),
            pending_events = self.events.len(),
            "Session torn down"
        );
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn credits(&self) -> u32 {
        self.credits
    }

    /// Whether the login dialog should be visible.
    pub fn show_login(&self) -> bool {
        self.show_login
    }

    /// Drain UI events emitted since the last call.
    pub fn take_events(&mut self) -> Vec<UiEvent> {
        std::mem::take(&mut self.events)
    }

    /// Ask the UI to open the login dialog.
    pub fn request_login(&mut self) {
        self.show_login = true;
        self.events.push(UiEvent::ShowLogin);
    }

    pub fn dismiss_login(&mut self) {
        self.show_login = false;
        self.events.push(UiEvent::HideLogin);
    }

    pub fn navigate(&mut self, view: View) {
        self.events.push(UiEvent::Navigate(view));
    }

    // ─── Authentication ──────────────────────────────────────────

    /// Register a local user and log them in.
    pub fn register(&mut self, name: &str, email: &str, password: &str) -> Result<(), AppError> {
        if name.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
            return Err(AppError::BadRequest("Missing Details".to_string()));
        }

        let mut users: Vec<User> =
            codec::read_json_or_default(self.store.as_ref(), keys::USERS);
        let email = normalize_email(email);
        if users.iter().any(|u| u.email == email) {
            tracing::debug!("Registration rejected, email already in use");
            return Err(AppError::DuplicateEmail);
        }

        let password_hash = crypto::hash_password(password, self.bcrypt_cost)?;
        let user = User::new(name.trim(), &email, password_hash, STARTING_CREDITS);
        users.push(user.clone());
        self.persist(keys::USERS, &users);

        tracing::info!(user_id = %user.id, "Local user registered");
        self.start_session(user);
        Ok(())
    }

    /// Log in with email and password.
    ///
    /// Unknown email and wrong password return the same error after the
    /// same amount of bcrypt work.
    pub fn login(&mut self, email: &str, password: &str) -> Result<(), AppError> {
        let users: Vec<User> = codec::read_json_or_default(self.store.as_ref(), keys::USERS);
        let email = normalize_email(email);

        let Some(user) = users.into_iter().find(|u| u.email == email) else {
            crypto::verify_unknown_user(password, self.bcrypt_cost);
            return Err(AppError::InvalidCredentials);
        };
        if !crypto::verify_password(password, &user.password_hash) {
            return Err(AppError::InvalidCredentials);
        }

        tracing::info!(user_id = %user.id, "Local user logged in");
        self.start_session(user);
        Ok(())
    }

    pub fn logout(&mut self) {
        if let Some(user) = self.user.take() {
            tracing::info!(user_id = %user.id, "Logged out");
        }
        self.credits = 0;
        if let Err(e) = self.store.remove(keys::CURRENT_USER) {
            tracing::warn!(error = %e, "Failed to clear persisted session");
        }
        self.navigate(View::Landing);
    }

    fn start_session(&mut self, user: User) {
        self.credits = user.credits;
        self.persist(keys::CURRENT_USER, &user);
        self.user = Some(user);
        self.show_login = false;
        self.events.push(UiEvent::HideLogin);
    }

    // ─── Credits ─────────────────────────────────────────────────

    pub fn add_credits(&mut self, amount: u32) {
        if amount == 0 {
            return;
        }
        self.credits = self.credits.saturating_add(amount);
        self.sync_credits();
    }

    /// Spend `amount` credits. Returns false, changing nothing, if the
    /// balance is too low.
    pub fn spend_credit(&mut self, amount: u32) -> bool {
        if self.credits < amount {
            return false;
        }
        self.credits -= amount;
        self.sync_credits();
        true
    }

    /// Mirror the balance into the current-user blob and the users list.
    fn sync_credits(&mut self) {
        let Some(user) = self.user.as_mut() else {
            return;
        };
        user.credits = self.credits;
        let user = user.clone();
        self.persist(keys::CURRENT_USER, &user);

        let mut users: Vec<User> =
            codec::read_json_or_default(self.store.as_ref(), keys::USERS);
        if let Some(stored) = users.iter_mut().find(|u| u.id == user.id) {
            stored.credits = user.credits;
            self.persist(keys::USERS, &users);
        }
    }

    // ─── Plans ───────────────────────────────────────────────────

    /// Buy a plan: grant its credits and make it the active plan.
    pub fn purchase_plan(&mut self, plan_id: &str) -> Result<&'static Plan, AppError> {
        if !self.is_logged_in() {
            self.request_login();
            return Err(AppError::Unauthorized);
        }
        let plan =
            Plan::find(plan_id).ok_or_else(|| AppError::NotFound(format!("plan {}", plan_id)))?;

        self.add_credits(plan.credits);
        if let Err(e) = self.store.set(keys::ACTIVE_PLAN, plan.id) {
            tracing::warn!(error = %e, "Failed to persist active plan");
        }

        tracing::info!(plan = plan.id, credits = self.credits, "Plan purchased");
        Ok(plan)
    }

    /// The currently active plan id, if any.
    pub fn active_plan(&self) -> Option<String> {
        match self.store.get(keys::ACTIVE_PLAN) {
            Ok(plan) => plan.filter(|p| !p.is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read active plan");
                None
            }
        }
    }

    // ─── History ─────────────────────────────────────────────────

    /// Record a generation at the front of history, evicting the oldest
    /// entries beyond [`HISTORY_LIMIT`].
    pub fn append_generation(&mut self, prompt: &str, image_url: &str) -> Generation {
        let generation = Generation::new(prompt, image_url);

        let mut history = self.history();
        history.insert(0, generation.clone());
        history.truncate(HISTORY_LIMIT);
        self.persist(keys::HISTORY, &history);

        generation
    }

    /// Full history, most recent first, read fresh from the store.
    pub fn history(&self) -> Vec<Generation> {
        codec::read_json_or_default(self.store.as_ref(), keys::HISTORY)
    }

    /// History narrowed by favorite status and a case-insensitive prompt search.
    pub fn filter_history(&self, filter: HistoryFilter, search: &str) -> Vec<Generation> {
        let search = search.to_lowercase();
        self.history()
            .into_iter()
            .filter(|g| filter == HistoryFilter::All || g.favorite)
            .filter(|g| g.prompt.to_lowercase().contains(&search))
            .collect()
    }

    /// Flip the favorite flag. Returns false if no generation has this id.
    pub fn toggle_favorite(&mut self, generation_id: &str) -> bool {
        let mut history = self.history();
        let Some(generation) = history.iter_mut().find(|g| g.id == generation_id) else {
            return false;
        };
        generation.favorite = !generation.favorite;
        self.persist(keys::HISTORY, &history);
        true
    }

    /// Remove a generation. Returns false if no generation has this id.
    pub fn delete_generation(&mut self, generation_id: &str) -> bool {
        let mut history = self.history();
        let before = history.len();
        history.retain(|g| g.id != generation_id);
        if history.len() == before {
            return false;
        }
        self.persist(keys::HISTORY, &history);
        true
    }

    fn persist<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        if let Err(e) = codec::write_json(self.store.as_ref(), key, value) {
            tracing::warn!(key, error = %e, "Failed to persist session state");
        }
    }
}
