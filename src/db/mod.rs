//! Persistence layer: opaque key/value stores and the server user directory.
//!
//! Values are strings; the typed helpers in [`codec`] serialize records as
//! JSON and degrade to defaults when a stored value is missing or corrupt.

pub mod codec;
pub mod file;
pub mod memory;
pub mod users;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use users::UserDirectory;

/// Store keys as constants.
pub mod keys {
    /// Current session user blob
    pub const CURRENT_USER: &str = "imagify_user";
    /// Locally registered users
    pub const USERS: &str = "imagify_users";
    /// Generation history, most recent first
    pub const HISTORY: &str = "imagify_history";
    /// Active pricing plan id (raw scalar, not JSON)
    pub const ACTIVE_PLAN: &str = "imagify_active_plan";
    /// User records owned by the API server
    pub const SERVER_USERS: &str = "imagify_server_users";
}

/// Durable key to string store.
pub trait KeyValueStore: Send + Sync {
    /// Read a value; `Ok(None)` when the key was never written or was removed.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove a value. Removing a missing key succeeds.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Errors from store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid store key: '{0}'")]
    InvalidKey(String),

    #[error("Failed to serialize value for key '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}
