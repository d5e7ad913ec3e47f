// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Text-to-image inference client.
//!
//! One POST per generation with a bearer key and fixed generation
//! parameters. The response body is the raw image, which is returned as a
//! base64 `data:` URI. A body without a content type, or typed
//! `application/octet-stream`, is treated as PNG. Timeouts, transport
//! failures, non-2xx statuses, empty bodies and other non-image content
//! types (such as a JSON "model loading" reply) are all errors; callers fall
//! back to a local placeholder.

use std::time::Duration;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;

use crate::config::Config;

/// Stable Diffusion XL on the Hugging Face inference API.
pub const DEFAULT_INFERENCE_URL: &str =
    "https://api-inference.huggingface.co/models/stabilityai/stable-diffusion-xl-base-1.0";

/// Sample key shipped in example env files; never sent upstream.
pub const PLACEHOLDER_API_KEY: &str = "your_huggingface_api_key_here";

const INFERENCE_STEPS: u32 = 20;
const GUIDANCE_SCALE: f32 = 7.5;
const IMAGE_SIZE: u32 = 512;
const DEFAULT_IMAGE_TYPE: &str = "image/png";
/// Untyped bodies are taken as images of the default type.
const BINARY_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: InferenceParameters,
}

#[derive(Serialize)]
struct InferenceParameters {
    num_inference_steps: u32,
    guidance_scale: f32,
    width: u32,
    height: u32,
}

/// Inference API client.
#[derive(Clone)]
pub struct InferenceClient {
    http: reqwest::Client,
    url: String,
    api_key: String,
}

impl InferenceClient {
    /// Create a client whose requests give up after `timeout`.
    pub fn new(url: String, api_key: String, timeout: Duration) -> Result<Self, InferenceError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| InferenceError::Client(e.to_string()))?;

        Ok(Self { http, url, api_key })
    }

    /// Build a client from config, or `None` when no usable key is set.
    pub fn from_config(config: &Config) -> Result<Option<Self>, InferenceError> {
        config
            .inference_credential()
            .map(|key| {
                Self::new(
                    config.inference_url.clone(),
                    key.to_string(),
                    config.inference_timeout,
                )
            })
            .transpose()
    }

    /// Generate an image for `prompt`, returned as a data URI.
    pub async fn generate(&self, prompt: &str) -> Result<String, InferenceError> {
        let body = InferenceRequest {
            inputs: prompt,
            parameters: InferenceParameters {
                num_inference_steps: INFERENCE_STEPS,
                guidance_scale: GUIDANCE_SCALE,
                width: IMAGE_SIZE,
                height: IMAGE_SIZE,
            },
        };

        let response = self
            .http
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    InferenceError::Timeout
                } else {
                    InferenceError::Request(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if status.as_u16() == 429 {
                tracing::warn!("Inference rate limit hit (429)");
            }
            return Err(InferenceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
            .filter(|v| v != BINARY_CONTENT_TYPE)
            .unwrap_or_else(|| DEFAULT_IMAGE_TYPE.to_string());
        if !content_type.starts_with("image/") {
            return Err(InferenceError::Decode(format!(
                "unexpected content type {}",
                content_type
            )));
        }

        let bytes = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                InferenceError::Timeout
            } else {
                InferenceError::Decode(e.to_string())
            }
        })?;
        if bytes.is_empty() {
            return Err(InferenceError::Decode("empty image body".to_string()));
        }

        tracing::debug!(bytes = bytes.len(), content_type = %content_type, "Inference image received");
        Ok(format!("data:{};base64,{}", content_type, BASE64.encode(&bytes)))
    }
}

/// Errors from the inference service.
#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error("Inference request failed: {0}")]
    Request(String),

    #[error("Inference request timed out")]
    Timeout,

    #[error("Inference API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode inference response: {0}")]
    Decode(String),
}
