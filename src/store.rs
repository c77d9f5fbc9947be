//! Ranuras de sesión en disco
//!
//! Un archivo por clave dentro del directorio de sesión
//! (`vi.auth.json`, `vi.currentOI.json`). Sin cifrado ni expiración.

use crate::config::Config;
use std::path::{Path, PathBuf};
use vi_common::{Error, KeyValueStore, Session};

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.path(key)).ok()
    }

    fn set(&self, key: &str, value: &str) -> vi_common::Result<()> {
        std::fs::create_dir_all(&self.dir)
            .and_then(|_| std::fs::write(self.path(key), value))
            .map_err(|e| Error::Storage(format!("{}: {}", self.path(key).display(), e)))
    }

    fn remove(&self, key: &str) {
        if let Err(e) = std::fs::remove_file(self.path(key)) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("No se pudo borrar {}: {}", key, e);
            }
        }
    }
}

/// Sesión persistida bajo `<config>/session`
pub fn open_session(config_dir: &Path) -> Session<FileStore> {
    let dir = Config::session_dir(config_dir);
    Session::new(FileStore::new(&dir), FileStore::new(&dir))
}
