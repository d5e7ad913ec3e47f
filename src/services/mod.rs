// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - image acquisition backends.

pub mod inference;
pub mod placeholder;

pub use inference::{InferenceClient, InferenceError};
pub use placeholder::Theme;
