//! Submission form defaults remembered between runs.

use killcam_protocol::VideoMetadata;
use tracing::warn;

use crate::SettingsError;
use crate::store::PreferenceStore;

/// Key under which the profile is stored, as a camelCase JSON object.
pub const PROFILE_KEY: &str = "userState";

/// Typed view over the stored [`VideoMetadata`].
pub struct ProfileStore<S> {
    store: S,
}

impl<S: PreferenceStore> ProfileStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reads the stored profile.
    ///
    /// A missing value yields empty defaults; an unreadable one is logged
    /// and also yields defaults.
    pub fn load(&self) -> VideoMetadata {
        let Some(raw) = self.store.get(PROFILE_KEY) else {
            return VideoMetadata::default();
        };
        match serde_json::from_str(&raw) {
            Ok(meta) => meta,
            Err(e) => {
                warn!(key = PROFILE_KEY, error = %e, "stored profile unreadable, using defaults");
                VideoMetadata::default()
            }
        }
    }

    /// Writes `meta` if it differs from what is stored.
    ///
    /// Returns `true` when a write happened.
    pub fn save(&self, meta: &VideoMetadata) -> Result<bool, SettingsError> {
        let json = serde_json::to_string(meta)?;
        if self.store.get(PROFILE_KEY).as_deref() == Some(json.as_str()) {
            return Ok(false);
        }
        self.store.set(PROFILE_KEY, &json)?;
        Ok(true)
    }

    /// Forgets the stored profile.
    pub fn clear(&self) -> Result<(), SettingsError> {
        self.store.remove(PROFILE_KEY)
    }

    /// Keeps the account name and blanks the per-clip fields, as after a
    /// successful submission.
    pub fn reset_keeping_account(&self) -> Result<VideoMetadata, SettingsError> {
        let reset = VideoMetadata {
            account_name: self.load().account_name,
            ..VideoMetadata::default()
        };
        self.save(&reset)?;
        Ok(reset)
    }
}
