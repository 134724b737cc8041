use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};

use super::CredentialStore;

/// Store file name in the application data directory
const STORE_FILE: &str = "cookies.json";

/// Application name used for the default store path
const APP_NAME: &str = "feedguard";

/// Credential store backed by a single JSON file.
///
/// Every mutation rewrites the whole map through a temp-file rename,
/// so the file on disk always holds one complete snapshot; a partially
/// applied `clear()` or a crash mid-write cannot tear it.
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStore {
    /// Open a store at `path`, loading any existing entries.
    ///
    /// A missing file is an empty store, not an error.
    pub fn open(path: PathBuf) -> Result<Self> {
        let entries = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read credential store: {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse credential store: {}", path.display()))?
        } else {
            HashMap::new()
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Open a store at the platform default location
    /// (`<cache_dir>/feedguard/cookies.json`).
    pub fn open_default() -> Result<Self> {
        Self::open(Self::default_path()?)
    }

    fn default_path() -> Result<PathBuf> {
        let cache_dir =
            dirs::cache_dir().ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME).join(STORE_FILE))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned lock only means another thread panicked mid-access;
        // the map itself is still consistent, so recover it.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn persist(&self, entries: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(entries)?;
        // Write to a sibling temp file and rename over the target, so
        // a crash mid-write cannot leave a torn file: the rename is
        // atomic and the previous snapshot stays intact until then.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, contents)
            .with_context(|| format!("Failed to write credential store: {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path).with_context(|| {
            format!("Failed to replace credential store: {}", self.path.display())
        })
    }
}

impl CredentialStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.lock();
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.lock();
        if entries.remove(key).is_none() {
            // Absent key: nothing to do, nothing to rewrite.
            return Ok(());
        }
        self.persist(&entries)
    }
}
