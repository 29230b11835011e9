//! Key-value preference stores.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use tracing::debug;

use crate::SettingsError;

/// String-valued preference storage.
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> Result<(), SettingsError>;

    /// Removes `key`; removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), SettingsError>;
}

/// In-memory store; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        let map = self.values.read().unwrap_or_else(PoisonError::into_inner);
        map.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SettingsError> {
        let mut map = self.values.write().unwrap_or_else(PoisonError::into_inner);
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SettingsError> {
        let mut map = self.values.write().unwrap_or_else(PoisonError::into_inner);
        map.remove(key);
        Ok(())
    }
}

/// Preferences cached in memory and persisted to one JSON object file.
///
/// Every mutation rewrites the file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: RwLock<BTreeMap<String, String>>,
}

impl JsonFileStore {
    /// Opens the store at `path`, loading existing values from disk.
    pub fn open(path: PathBuf) -> Result<Self, SettingsError> {
        let values = load_values(&path)?;
        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns all stored keys.
    pub fn keys(&self) -> Vec<String> {
        let map = self.values.read().unwrap_or_else(PoisonError::into_inner);
        map.keys().cloned().collect()
    }

    fn persist(&self) -> Result<(), SettingsError> {
        let map = self.values.read().unwrap_or_else(PoisonError::into_inner);
        let json = serde_json::to_string_pretty(&*map)?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, json)?;
        debug!(path = %self.path.display(), keys = map.len(), "preferences saved");
        Ok(())
    }
}

impl PreferenceStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        let map = self.values.read().unwrap_or_else(PoisonError::into_inner);
        map.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SettingsError> {
        {
            let mut map = self.values.write().unwrap_or_else(PoisonError::into_inner);
            map.insert(key.to_string(), value.to_string());
        }
        self.persist()
    }

    fn remove(&self, key: &str) -> Result<(), SettingsError> {
        {
            let mut map = self.values.write().unwrap_or_else(PoisonError::into_inner);
            if map.remove(key).is_none() {
                return Ok(());
            }
        }
        self.persist()
    }
}

fn load_values(path: &Path) -> Result<BTreeMap<String, String>, SettingsError> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let data = std::fs::read_to_string(path)?;
    let values: BTreeMap<String, String> = serde_json::from_str(&data)?;
    debug!(path = %path.display(), keys = values.len(), "preferences loaded");
    Ok(values)
}

/// Returns the default preferences file path.
pub fn default_preferences_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("killcam").join("preferences.json"))
}

/// Returns the platform-specific config directory.
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        std::env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var("HOME")
                    .ok()
                    .map(|h| PathBuf::from(h).join(".config"))
            })
    }

    #[cfg(target_os = "windows")]
    {
        std::env::var("APPDATA").ok().map(PathBuf::from)
    }

    #[cfg(not(any(target_os = "linux", target_os = "windows")))]
    {
        std::env::var("HOME")
            .ok()
            .map(|h| PathBuf::from(h).join(".config"))
    }
}
