//! Persisted user preferences.
//!
//! A small string key-value store (in memory or one JSON file) and a typed
//! profile on top of it that remembers the submission form between runs.

pub mod profile;
pub mod store;

pub use profile::{PROFILE_KEY, ProfileStore};
pub use store::{
    JsonFileStore, MemoryStore, PreferenceStore, config_dir, default_preferences_path,
};

/// Errors from preference storage.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
