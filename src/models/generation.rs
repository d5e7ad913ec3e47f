//! Generation history records.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::time_utils::now_rfc3339;

/// Maximum number of generations kept in history.
pub const HISTORY_LIMIT: usize = 50;

/// One past generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Generation {
    /// Time-ordered id (`gen_<uuid v7>`)
    pub id: String,
    pub prompt: String,
    /// Displayable image (data URI or remote URL)
    pub image_url: String,
    /// Creation time (ISO 8601)
    pub timestamp: String,
    #[serde(default)]
    pub favorite: bool,
}

impl Generation {
    pub fn new(prompt: &str, image_url: &str) -> Self {
        Self {
            id: format!("gen_{}", Uuid::now_v7().simple()),
            prompt: prompt.to_string(),
            image_url: image_url.to_string(),
            timestamp: now_rfc3339(),
            favorite: false,
        }
    }
}
