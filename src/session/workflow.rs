// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Image acquisition workflow.
//!
//! One entry point, [`GenerationWorkflow::request_generation`]:
//!
//! 1. Reject blank prompts.
//! 2. Auth gate: no user → ask for login.
//! 3. Credit gate: no credits → send the user to pricing.
//! 4. Mark a generation in flight (cleared on every exit by a guard).
//! 5. Acquire an image: inference API if a key is configured, otherwise a
//!    demo placeholder after a simulated delay. Any inference error falls
//!    back to a themed placeholder, so this step never fails.
//! 6. Commit: spend one credit, then record the generation. If the spend
//!    fails the image is discarded and nothing is recorded.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::{SessionManager, View};
use crate::config::Config;
use crate::services::{placeholder, InferenceClient, InferenceError};

/// Credits charged per generated image.
pub const GENERATION_COST: u32 = 1;

/// Result of one generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// An image was produced, paid for, and recorded.
    Generated(String),
    /// Prompt was blank; nothing happened.
    EmptyPrompt,
    /// No session user; login was requested.
    LoginRequired,
    /// Not enough credits; pricing was requested.
    PricingRequired,
    /// An image was produced but the credit spend failed, so it was dropped.
    Discarded,
}

impl GenerationOutcome {
    pub fn image_url(&self) -> Option<&str> {
        match self {
            GenerationOutcome::Generated(url) => Some(url),
            _ => None,
        }
    }
}

/// Clears the in-flight flag when dropped.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Generation workflow with its image backend.
pub struct GenerationWorkflow {
    inference: Option<InferenceClient>,
    demo_delay: Duration,
    generating: Arc<AtomicBool>,
}

impl GenerationWorkflow {
    /// `None` for `inference` selects demo mode.
    pub fn new(inference: Option<InferenceClient>, demo_delay: Duration) -> Self {
        Self {
            inference,
            demo_delay,
            generating: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, InferenceError> {
        let inference = InferenceClient::from_config(config)?;
        if inference.is_none() {
            tracing::info!("No inference key configured, generating demo placeholders");
        }
        Ok(Self::new(inference, config.demo_delay))
    }

    /// Whether a generation is currently running.
    pub fn is_generating(&self) -> bool {
        self.generating.load(Ordering::SeqCst)
    }

    /// Shared handle to the in-flight flag, for UIs polling from elsewhere.
    pub fn generating_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.generating)
    }

    /// Run one generation request against `session`.
    pub async fn request_generation(
        &self,
        session: &mut SessionManager,
        prompt: &str,
    ) -> GenerationOutcome {
        if prompt.trim().is_empty() {
            return GenerationOutcome::EmptyPrompt;
        }
        if !session.is_logged_in() {
            session.request_login();
            return GenerationOutcome::LoginRequired;
        }
        if session.credits() < GENERATION_COST {
            session.navigate(View::Pricing);
            return GenerationOutcome::PricingRequired;
        }

        let _in_flight = InFlight::acquire(&self.generating);

        let image_url = self.acquire_image(prompt).await;

        if !session.spend_credit(GENERATION_COST) {
            tracing::warn!("Credit spend failed after generation, discarding image");
            return GenerationOutcome::Discarded;
        }
        let generation = session.append_generation(prompt, &image_url);
        tracing::info!(
            generation_id = %generation.id,
            credits = session.credits(),
            "Generation recorded"
        );

        GenerationOutcome::Generated(image_url)
    }

    async fn acquire_image(&self, prompt: &str) -> String {
        let Some(client) = &self.inference else {
            tokio::time::sleep(self.demo_delay).await;
            return placeholder::demo_image();
        };

        match client.generate(prompt).await {
            Ok(image_url) => image_url,
            Err(e) => {
                tracing::warn!(error = %e, "Image generation failed, using themed placeholder");
                placeholder::themed_image(prompt)
            }
        }
    }
}
