// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod generation;
pub mod plan;
pub mod user;

pub use generation::{Generation, HISTORY_LIMIT};
pub use plan::{Plan, PLANS};
pub use user::User;
