//! Durable key/value storage for the session tokens and the cached user
//! snapshot. Storage is scoped to one API origin so tokens issued by one
//! server are never presented to another. Reads never fail: an unreadable
//! entry is reported as absent and the I/O error is logged.

use std::{
    collections::HashMap,
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    sync::Mutex,
};
use tempfile::NamedTempFile;
use tracing::{debug, warn};
use url::Url;

/// Fixed storage keys, one per piece of client-held state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StorageKey {
    Access,
    Refresh,
    UserData,
}

impl StorageKey {
    pub const ALL: [Self; 3] = [Self::Access, Self::Refresh, Self::UserData];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Refresh => "refresh",
            Self::UserData => "USER_DATA",
        }
    }
}

/// Storage abstraction shared by the refresher, the authorizer and the session.
pub trait TokenStore: Send + Sync {
    fn get(&self, key: StorageKey) -> Option<String>;
    fn set(&self, key: StorageKey, value: &str);
    fn clear(&self, key: StorageKey);
}

/// In-process store; contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    entries: Mutex<HashMap<StorageKey, String>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: StorageKey) -> Option<String> {
        self.entries.lock().ok()?.get(&key).cloned()
    }

    fn set(&self, key: StorageKey, value: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key, value.to_string());
        }
    }

    fn clear(&self, key: StorageKey) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(&key);
        }
    }
}

/// File-backed store: one file per key under a directory derived from the
/// API origin. Each write goes through its own owner-only temp file and a
/// rename; the last rename wins.
#[derive(Clone, Debug)]
pub struct FileTokenStore {
    dir: PathBuf,
}

impl FileTokenStore {
    /// Store rooted at `dir` as-is.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store for the origin of `api_base` under `root`.
    #[must_use]
    pub fn for_origin(root: &Path, api_base: &Url) -> Self {
        Self::new(root.join(origin_dir_name(api_base)))
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: StorageKey) -> PathBuf {
        self.dir.join(key.as_str())
    }

    fn write(&self, key: StorageKey, value: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        restrict_dir(&self.dir)?;

        let mut file = NamedTempFile::new_in(&self.dir)?;
        file.write_all(value.as_bytes())?;
        file.as_file().sync_all()?;
        file.persist(self.path(key)).map_err(|err| err.error)?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, key: StorageKey) -> Option<String> {
        match fs::read_to_string(self.path(key)) {
            Ok(value) => Some(value),
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => {
                warn!(key = key.as_str(), error = %err, "failed to read stored value");
                None
            }
        }
    }

    fn set(&self, key: StorageKey, value: &str) {
        if let Err(err) = self.write(key, value) {
            warn!(key = key.as_str(), error = %err, "failed to persist value");
        } else {
            debug!(key = key.as_str(), "stored value");
        }
    }

    fn clear(&self, key: StorageKey) {
        match fs::remove_file(self.path(key)) {
            Ok(()) => debug!(key = key.as_str(), "cleared value"),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => warn!(key = key.as_str(), error = %err, "failed to clear value"),
        }
    }
}

/// `scheme_host_port`, with the port filled in from the scheme default.
fn origin_dir_name(url: &Url) -> String {
    let host = url.host_str().unwrap_or("localhost");
    let port = url.port_or_known_default().unwrap_or(0);
    let raw = format!("{}_{host}_{port}", url.scheme());
    raw.chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '.' || ch == '-' || ch == '_' {
                ch
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(unix)]
fn restrict_dir(dir: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(dir, fs::Permissions::from_mode(0o700))
}

#[cfg(not(unix))]
fn restrict_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn memory_store_round_trips_and_clears() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.get(StorageKey::Access), None);

        store.set(StorageKey::Access, "a1");
        store.set(StorageKey::Access, "a2");
        assert_eq!(store.get(StorageKey::Access), Some("a2".to_string()));
        assert_eq!(store.get(StorageKey::Refresh), None);

        store.clear(StorageKey::Access);
        assert_eq!(store.get(StorageKey::Access), None);
    }

    #[test]
    fn file_store_survives_new_instances() -> Result<()> {
        let root = tempfile::tempdir()?;
        let base = Url::parse("http://127.0.0.1:8000/api/")?;

        FileTokenStore::for_origin(root.path(), &base).set(StorageKey::Refresh, "r1");

        let reopened = FileTokenStore::for_origin(root.path(), &base);
        assert_eq!(reopened.get(StorageKey::Refresh), Some("r1".to_string()));
        Ok(())
    }

    #[test]
    fn file_store_is_scoped_per_origin() -> Result<()> {
        let root = tempfile::tempdir()?;
        let local = Url::parse("http://127.0.0.1:8000/api/")?;
        let remote = Url::parse("https://tasks.example.com/api/")?;
        let first = FileTokenStore::for_origin(root.path(), &local);
        let second = FileTokenStore::for_origin(root.path(), &remote);

        first.set(StorageKey::Access, "token");
        assert_eq!(second.get(StorageKey::Access), None);
        assert_ne!(first.dir(), second.dir());
        Ok(())
    }

    #[test]
    fn file_store_clear_is_idempotent() -> Result<()> {
        let root = tempfile::tempdir()?;
        let store = FileTokenStore::new(root.path().join("session"));

        store.clear(StorageKey::UserData);
        store.set(StorageKey::UserData, "{}");
        store.clear(StorageKey::UserData);
        store.clear(StorageKey::UserData);
        assert_eq!(store.get(StorageKey::UserData), None);
        Ok(())
    }

    #[test]
    fn origin_dir_name_fills_default_port() -> Result<()> {
        assert_eq!(
            origin_dir_name(&Url::parse("https://tasks.example.com/api/")?),
            "https_tasks.example.com_443"
        );
        assert_eq!(
            origin_dir_name(&Url::parse("http://127.0.0.1:8000/api/")?),
            "http_127.0.0.1_8000"
        );
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn file_store_writes_owner_only_files() -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let root = tempfile::tempdir()?;
        let store = FileTokenStore::new(root.path().join("session"));
        store.set(StorageKey::Access, "secret");

        let mode = fs::metadata(store.dir().join("access"))?.permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        Ok(())
    }

    #[test]
    fn file_store_concurrent_writers_leave_one_whole_value() -> Result<()> {
        let root = tempfile::tempdir()?;
        let store = FileTokenStore::new(root.path().join("session"));

        for round in 0..20 {
            let values: Vec<String> = (0..8)
                .map(|writer| format!("{round}-{}", "x".repeat(writer * 37 + 1)))
                .collect();
            std::thread::scope(|scope| {
                for value in &values {
                    let store = &store;
                    scope.spawn(move || store.set(StorageKey::Access, value));
                }
            });

            let stored = store.get(StorageKey::Access);
            assert!(
                stored.as_ref().is_some_and(|stored| values.contains(stored)),
                "round {round}: stored value is not one of the written values"
            );
        }

        let leftovers = fs::read_dir(store.dir())?
            .filter_map(Result::ok)
            .filter(|entry| entry.file_name() != "access")
            .count();
        assert_eq!(leftovers, 0);
        Ok(())
    }
}
