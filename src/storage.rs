//! Best-effort JSON key-value store, one file per key under a data directory.
//! Unreadable or unparsable entries are treated as absent.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

pub const CALCULATOR_KEY: &str = "ria_calculator_data";
pub const GOALS_KEY: &str = "goal_designer_goals";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to write '{key}': {source}")]
    Write {
        key: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to remove '{key}': {source}")]
    Remove {
        key: String,
        #[source]
        source: io::Error,
    },
}

/// Which side of a vendor card an image attachment belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentSlot {
    Front,
    Back,
}

impl AttachmentSlot {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "front" => Some(Self::Front),
            "back" => Some(Self::Back),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Back => "back",
        }
    }
}

pub fn vendor_images_key(vendor_name: &str, slot: AttachmentSlot) -> String {
    format!("vendor_images_{}_{}", vendor_name, slot.as_str())
}

/// Map a key to a safe file stem; anything outside [A-Za-z0-9_-] becomes '_'.
fn sanitize_key(key: &str) -> String {
    let s: String = key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if s.is_empty() {
        "unknown".to_string()
    } else {
        s
    }
}

#[derive(Debug, Clone)]
pub struct JsonStore {
    root: PathBuf,
}

impl JsonStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", sanitize_key(key)))
    }

    /// Decoded value for `key`, or None when absent or not valid JSON for `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.path_for(key);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
            Err(err) => {
                tracing::warn!(key, %err, "storage read failed, treating as empty");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(key, %err, "stored value is not valid JSON, treating as empty");
                None
            }
        }
    }

    pub fn get_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        self.get(key).unwrap_or_default()
    }

    pub fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string_pretty(value).map_err(|source| StorageError::Encode {
            key: key.to_string(),
            source,
        })?;
        fs::create_dir_all(&self.root).map_err(|source| StorageError::Write {
            key: key.to_string(),
            source,
        })?;
        fs::write(self.path_for(key), raw).map_err(|source| StorageError::Write {
            key: key.to_string(),
            source,
        })
    }

    /// Delete `key`. Removing an absent key is not an error.
    pub fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Remove {
                key: key.to_string(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_store(name: &str) -> JsonStore {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        JsonStore::new(std::env::temp_dir().join(format!("riadesk-store-{name}-{stamp}")))
    }

    #[test]
    fn put_then_get_returns_value() {
        let store = temp_store("roundtrip");
        store
            .put("numbers", &vec![1, 2, 3])
            .expect("write should succeed");
        assert_eq!(store.get::<Vec<i32>>("numbers"), Some(vec![1, 2, 3]));
        let _ = fs::remove_dir_all(store.root());
    }

    #[test]
    fn corrupt_entry_reads_as_default() {
        let store = temp_store("corrupt");
        fs::create_dir_all(store.root()).expect("dir");
        fs::write(store.root().join("broken.json"), "{not json").expect("fixture");
        assert_eq!(store.get::<Vec<String>>("broken"), None);
        assert!(store.get_or_default::<Vec<String>>("broken").is_empty());
        let _ = fs::remove_dir_all(store.root());
    }

    #[test]
    fn keys_are_namespaced_and_sanitized() {
        let key = vendor_images_key("RIA in a Box", AttachmentSlot::Back);
        assert_eq!(key, "vendor_images_RIA in a Box_back");
        assert_eq!(sanitize_key(&key), "vendor_images_RIA_in_a_Box_back");
        assert_eq!(sanitize_key("../etc/passwd"), "___etc_passwd");
    }

    #[test]
    fn remove_missing_key_is_ok() {
        let store = temp_store("remove");
        assert!(store.remove("never-written").is_ok());
    }
}
