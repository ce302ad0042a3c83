/*
[INPUT]:  Token pairs to persist, one storage origin per backend
[OUTPUT]: Durable access/refresh storage with atomic both-or-neither writes
[POS]:    Auth layer - persistence backends behind TokenStore
[UPDATE]: When the on-disk format or storage keys change
*/

use std::fs;
use std::io;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::tokens::TokenPair;

/// Well-known storage keys for the two persisted values.
pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

const TOKEN_FILE_NAME: &str = "tokens.json";

/// Storage backend failure. Never fatal to callers: `TokenStore` logs and
/// degrades to unauthenticated instead of propagating these.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Persistence backend for the token pair.
///
/// Both tokens are written and removed together; a backend must never expose
/// a state where only one of them survives.
pub trait TokenStorage: Send + Sync + std::fmt::Debug {
    fn load(&self) -> Result<Option<TokenPair>, StorageError>;
    fn store(&self, pair: &TokenPair) -> Result<(), StorageError>;
    fn clear(&self) -> Result<(), StorageError>;
}

/// In-process backend. Cloning shares the slot, so two `TokenStore`s built
/// over clones of one `MemoryTokenStorage` model two tabs on one origin.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStorage {
    slot: Arc<RwLock<Option<TokenPair>>>,
}

impl MemoryTokenStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStorage for MemoryTokenStorage {
    fn load(&self) -> Result<Option<TokenPair>, StorageError> {
        Ok(self.slot.read().unwrap().clone())
    }

    fn store(&self, pair: &TokenPair) -> Result<(), StorageError> {
        *self.slot.write().unwrap() = Some(pair.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self.slot.write().unwrap() = None;
        Ok(())
    }
}

/// Serialized form of the token file.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedTokens {
    access_token: String,
    refresh_token: String,
    stored_at: DateTime<Utc>,
}

/// File-backed storage: one JSON document under the given directory.
///
/// Writes go through a temp file + rename so a crash mid-write never leaves
/// one token without the other. The file is chmod 0600.
#[derive(Debug, Clone)]
pub struct FileTokenStorage {
    dir: PathBuf,
}

impl FileTokenStorage {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Path of the token file.
    pub fn token_file_path(&self) -> PathBuf {
        self.dir.join(TOKEN_FILE_NAME)
    }
}

impl TokenStorage for FileTokenStorage {
    fn load(&self) -> Result<Option<TokenPair>, StorageError> {
        let path = self.token_file_path();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let persisted: PersistedTokens = serde_json::from_str(&content)?;
        Ok(Some(TokenPair {
            access: persisted.access_token,
            refresh: persisted.refresh_token,
        }))
    }

    fn store(&self, pair: &TokenPair) -> Result<(), StorageError> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }

        let persisted = PersistedTokens {
            access_token: pair.access.clone(),
            refresh_token: pair.refresh.clone(),
            stored_at: Utc::now(),
        };
        let encoded = serde_json::to_string(&persisted)?;

        let path = self.token_file_path();
        let tmp = self.dir.join(format!("{TOKEN_FILE_NAME}.tmp"));
        fs::write(&tmp, encoded)?;

        let mut perms = fs::metadata(&tmp)?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(&tmp, perms)?;

        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        match fs::remove_file(self.token_file_path()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use uuid::Uuid;

    fn temp_dir() -> PathBuf {
        let mut path = env::temp_dir();
        path.push(format!("signal-trace-test-{}", Uuid::new_v4()));
        path
    }

    fn pair() -> TokenPair {
        TokenPair {
            access: "access-jwt".to_string(),
            refresh: "refresh-jwt".to_string(),
        }
    }

    #[test]
    fn memory_storage_clone_shares_slot() {
        let a = MemoryTokenStorage::new();
        let b = a.clone();

        a.store(&pair()).unwrap();
        assert_eq!(b.load().unwrap(), Some(pair()));

        b.clear().unwrap();
        assert_eq!(a.load().unwrap(), None);
    }

    #[test]
    fn file_storage_roundtrip_and_permissions() {
        let dir = temp_dir();
        let storage = FileTokenStorage::new(&dir);

        assert_eq!(storage.load().unwrap(), None);

        storage.store(&pair()).unwrap();
        assert_eq!(storage.load().unwrap(), Some(pair()));

        let metadata = fs::metadata(storage.token_file_path()).unwrap();
        assert_eq!(metadata.permissions().mode() & 0o777, 0o600);

        storage.clear().unwrap();
        assert_eq!(storage.load().unwrap(), None);
        // Clearing an already-empty store is fine.
        storage.clear().unwrap();

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn file_storage_persists_under_the_well_known_keys() {
        let dir = temp_dir();
        let storage = FileTokenStorage::new(&dir);
        storage.store(&pair()).unwrap();

        let content = fs::read_to_string(storage.token_file_path()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(
            json.get(ACCESS_TOKEN_KEY).and_then(|v| v.as_str()),
            Some("access-jwt")
        );
        assert_eq!(
            json.get(REFRESH_TOKEN_KEY).and_then(|v| v.as_str()),
            Some("refresh-jwt")
        );

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn file_storage_corrupt_file_is_an_error_not_a_panic() {
        let dir = temp_dir();
        fs::create_dir_all(&dir).unwrap();
        let storage = FileTokenStorage::new(&dir);
        fs::write(storage.token_file_path(), "not json").unwrap();

        assert!(storage.load().is_err());

        fs::remove_dir_all(dir).unwrap();
    }
}
