use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::{Result, StoreAuthError};

/// Fixed key the upload request bundle is stored under
pub const UPLOAD_REQUEST_KEY: &str = "package_upload_request";

/// The persisted credential bundle for package uploads.
///
/// Created with only the root when the user signs in to the store,
/// completed when the SSO discharge is acquired, read (never mutated) by
/// every store-authorized call, and cleared on sign-out or when the
/// store rejects it with a 401.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadRequestBundle {
    /// Serialized root macaroon
    pub root: String,

    /// Serialized discharge macaroon, once acquired
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub discharge: Option<String>,
}

impl UploadRequestBundle {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            discharge: None,
        }
    }

    pub fn with_discharge(mut self, discharge: impl Into<String>) -> Self {
        self.discharge = Some(discharge.into());
        self
    }
}

/// Durable key-value storage for credentials.
///
/// Implementations are shared mutable state: readers must tolerate a
/// concurrent writer clearing or replacing an entry mid-flight.
pub trait CredentialStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Reads the stored upload request bundle, if any
pub fn read_bundle<S: CredentialStore + ?Sized>(store: &S) -> Result<Option<UploadRequestBundle>> {
    match store.get(UPLOAD_REQUEST_KEY)? {
        Some(raw) => {
            let bundle =
                serde_json::from_str(&raw).map_err(|e| StoreAuthError::Storage(e.to_string()))?;
            Ok(Some(bundle))
        }
        None => Ok(None),
    }
}

/// Writes the upload request bundle under the fixed key.
///
/// Callers must merge into a freshly-read bundle rather than overwrite
/// blindly; between that read and this write another flow can still slip
/// in, a window this crate does not close.
pub fn write_bundle<S: CredentialStore + ?Sized>(
    store: &S,
    bundle: &UploadRequestBundle,
) -> Result<()> {
    let raw = serde_json::to_string(bundle).map_err(|e| StoreAuthError::Storage(e.to_string()))?;
    store.set(UPLOAD_REQUEST_KEY, &raw)
}

/// Removes the bundle; the sign-out and 401-invalidation path
pub fn clear_bundle<S: CredentialStore + ?Sized>(store: &S) -> Result<()> {
    store.remove(UPLOAD_REQUEST_KEY)
}

/// In-memory store for tests and short-lived processes
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().expect("credential store lock poisoned");
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().expect("credential store lock poisoned");
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().expect("credential store lock poisoned");
        entries.remove(key);
        Ok(())
    }
}

/// File-backed store: a single JSON object on disk.
///
/// The durable analogue of per-origin browser storage; entries survive
/// process restarts. The file is created on first write with owner-only
/// permissions.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> Result<HashMap<String, String>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let raw =
            fs::read_to_string(&self.path).map_err(|e| StoreAuthError::Storage(e.to_string()))?;
        serde_json::from_str(&raw).map_err(|e| StoreAuthError::Storage(e.to_string()))
    }

    fn persist(&self, entries: &HashMap<String, String>) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir).map_err(|e| StoreAuthError::Storage(e.to_string()))?;
            }
        }
        let raw =
            serde_json::to_string(entries).map_err(|e| StoreAuthError::Storage(e.to_string()))?;
        fs::write(&self.path, raw).map_err(|e| StoreAuthError::Storage(e.to_string()))?;
        restrict_permissions(&self.path)
    }
}

impl CredentialStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.load()?;
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }
}

// Credentials on disk are readable by the owner only
fn restrict_permissions(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let metadata = fs::metadata(path).map_err(|e| StoreAuthError::Storage(e.to_string()))?;
        let mut permissions = metadata.permissions();
        permissions.set_mode(0o600);
        fs::set_permissions(path, permissions)
            .map_err(|e| StoreAuthError::Storage(e.to_string()))?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}
