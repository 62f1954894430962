//! File-backed identity store
//!
//! One file per identity, named after the SHA-256 of its id so arbitrary
//! device and module ids map to safe file names. Each file holds a small
//! JSON record carrying the original key and the base64 value.

use super::IdentityStore;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use edgescope_core::{Error, Result};
use edgescope_utils::write_atomic_async;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::warn;

const ENTRY_EXTENSION: &str = "entry";

#[derive(Serialize, Deserialize)]
struct FileRecord {
    key: String,
    value: String,
}

#[derive(Debug, Clone)]
pub struct FileIdentityStore {
    dir: PathBuf,
}

impl FileIdentityStore {
    /// Open (and create if needed) a store rooted at `dir`
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| Error::file_system(dir.clone(), "create identity store directory", e))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, id: &str) -> PathBuf {
        let digest = Sha256::digest(id.as_bytes());
        self.dir
            .join(format!("{}.{ENTRY_EXTENSION}", hex::encode(digest)))
    }
}

#[async_trait]
impl IdentityStore for FileIdentityStore {
    async fn put(&self, id: &str, value: Vec<u8>) -> Result<()> {
        let record = FileRecord {
            key: id.to_string(),
            value: STANDARD.encode(value),
        };
        let bytes = serde_json::to_vec(&record)?;
        write_atomic_async(&self.entry_path(id), bytes).await
    }

    async fn remove(&self, id: &str) -> Result<()> {
        let path = self.entry_path(id);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::file_system(path, "remove identity entry", e)),
        }
    }

    async fn get_all(&self) -> Result<Vec<(String, Vec<u8>)>> {
        let mut read_dir = fs::read_dir(&self.dir)
            .await
            .map_err(|e| Error::file_system(self.dir.clone(), "read identity store", e))?;

        let mut entries = Vec::new();
        while let Some(entry) = read_dir
            .next_entry()
            .await
            .map_err(|e| Error::file_system(self.dir.clone(), "read identity store", e))?
        {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(ENTRY_EXTENSION) {
                continue;
            }
            match read_record(&path).await {
                Ok(pair) => entries.push(pair),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping unreadable identity entry");
                }
            }
        }
        Ok(entries)
    }
}

async fn read_record(path: &Path) -> Result<(String, Vec<u8>)> {
    let bytes = fs::read(path)
        .await
        .map_err(|e| Error::file_system(path.to_path_buf(), "read identity entry", e))?;
    let record: FileRecord = serde_json::from_slice(&bytes)?;
    let value = STANDARD
        .decode(record.value.as_bytes())
        .map_err(|e| Error::store_with_source("decode", format!("bad value for '{}'", record.key), e))?;
    Ok((record.key, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_put_get_all_remove() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileIdentityStore::open(temp_dir.path().join("identities"))
            .await
            .unwrap();

        store.put("d1", b"one".to_vec()).await.unwrap();
        store.put("e1/$edgeHub", b"two".to_vec()).await.unwrap();
        store.put("d1", b"uno".to_vec()).await.unwrap();

        let mut all = store.get_all().await.unwrap();
        all.sort();
        assert_eq!(
            all,
            vec![
                ("d1".to_string(), b"uno".to_vec()),
                ("e1/$edgeHub".to_string(), b"two".to_vec()),
            ]
        );

        store.remove("d1").await.unwrap();
        store.remove("d1").await.unwrap();
        assert_eq!(store.get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        {
            let store = FileIdentityStore::open(temp_dir.path()).await.unwrap();
            store.put("d1", b"persisted".to_vec()).await.unwrap();
        }
        let reopened = FileIdentityStore::open(temp_dir.path()).await.unwrap();
        assert_eq!(
            reopened.get_all().await.unwrap(),
            vec![("d1".to_string(), b"persisted".to_vec())]
        );
    }

    #[tokio::test]
    async fn test_corrupt_entries_are_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileIdentityStore::open(temp_dir.path()).await.unwrap();
        store.put("d1", b"ok".to_vec()).await.unwrap();
        std::fs::write(temp_dir.path().join("broken.entry"), b"{not json").unwrap();
        std::fs::write(temp_dir.path().join("notes.txt"), b"ignored").unwrap();

        let all = store.get_all().await.unwrap();
        assert_eq!(all, vec![("d1".to_string(), b"ok".to_vec())]);
    }
}
