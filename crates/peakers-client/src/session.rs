//! # Session Store
//!
//! Remembers which database (tenant) the device is connected to, across
//! restarts. One small file, one line.
//!
//! ```text
//! connect <db> ──► test-db OK ──► save(db) ──► <data_dir>/db_name
//! login        ──► load() ─────────────────► X-Database-Name header
//! ```

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{ClientError, ClientResult};

/// Environment variable that relocates the session file's directory.
pub const DATA_DIR_ENV: &str = "PEAKERS_DATA_DIR";

const SESSION_FILE: &str = "db_name";

#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store rooted at `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        SessionStore {
            path: dir.as_ref().join(SESSION_FILE),
        }
    }

    /// Store in `PEAKERS_DATA_DIR`, or the platform data directory.
    pub fn open_default() -> ClientResult<Self> {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            debug!(dir = %dir, "Using session directory from environment");
            return Ok(Self::in_dir(dir));
        }
        directories::ProjectDirs::from("com", "peakers", "pos")
            .map(|dirs| Self::in_dir(dirs.data_dir()))
            .ok_or_else(|| ClientError::SessionIo("No data directory available".into()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored database name; `None` when nothing usable is stored.
    pub fn load(&self) -> Option<String> {
        let contents = std::fs::read_to_string(&self.path).ok()?;
        let name = contents.trim();
        (!name.is_empty()).then(|| name.to_string())
    }

    pub fn save(&self, db_name: &str) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ClientError::SessionIo(e.to_string()))?;
        }
        std::fs::write(&self.path, db_name.trim())
            .map_err(|e| ClientError::SessionIo(e.to_string()))?;
        info!(db_name = %db_name.trim(), "Database selection saved");
        Ok(())
    }

    /// Forgets the stored name. Missing file is not an error.
    pub fn clear(&self) -> ClientResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ClientError::SessionIo(e.to_string())),
        }
    }

    /// Stored name, else `fallback`.
    pub fn db_name_or(&self, fallback: &str) -> String {
        self.load().unwrap_or_else(|| fallback.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_load_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::in_dir(dir.path().join("state"));

        assert_eq!(store.load(), None);
        assert_eq!(store.db_name_or("peakers_pos_test"), "peakers_pos_test");

        store.save("  shop_a \n").unwrap();
        assert_eq!(store.load().as_deref(), Some("shop_a"));
        assert_eq!(store.db_name_or("peakers_pos_test"), "shop_a");

        store.clear().unwrap();
        assert_eq!(store.load(), None);
        store.clear().unwrap();
    }

    #[test]
    fn test_blank_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::in_dir(dir.path());
        std::fs::write(store.path(), "   ").unwrap();
        assert_eq!(store.load(), None);
    }
}
