// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Imagify: prompt-to-image generation with per-user credits.
//!
//! The crate has two halves:
//! - [`session`]: the client core. Session and credit management over a
//!   key/value store, and the image generation workflow with its local
//!   placeholder fallback.
//! - [`routes`] and [`middleware`]: the credential API server (register,
//!   login, credit lookup) with JWT-protected routes.

pub mod config;
pub mod crypto;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod session;
pub mod time_utils;

use config::Config;
use db::UserDirectory;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub users: UserDirectory,
}
