use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::{fs, sync::RwLock};

use super::{KeyValueStore, StorageError};

/// File-backed key-value store.
///
/// Keeps a `key -> value` map persisted as a JSON object. Every `set`
/// writes the whole map to a sibling `.tmp` file and renames it over the
/// target, so the file on disk is always a complete map.
#[derive(Debug, Clone)]
pub struct FileStore {
    inner: Arc<RwLock<HashMap<String, String>>>,
    file_path: PathBuf,
    temp_path: PathBuf,
}

impl FileStore {
    /// Open the store at `path`, creating the file if missing.
    ///
    /// A file that does not contain a JSON object of strings is treated as
    /// empty and overwritten on the next `set`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or its parent directory cannot be
    /// created or read.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let file_path = path.into();
        let temp_path = temp_path_for(&file_path);
        if let Some(parent) = file_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }

        let map = match fs::read(&file_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                tracing::warn!(
                    path = %file_path.display(),
                    error = %e,
                    "Ignoring unreadable key-value file"
                );
                HashMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let empty: HashMap<String, String> = HashMap::new();
                write_atomic(&file_path, &temp_path, serde_json::to_vec(&empty)?).await?;
                empty
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            inner: Arc::new(RwLock::new(map)),
            file_path,
            temp_path,
        })
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.inner.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        // Hold the write lock across the file write so writers never interleave.
        let mut map = self.inner.write().await;
        let mut next = map.clone();
        next.insert(key.to_string(), value);
        let data = serde_json::to_vec(&next)?;
        write_atomic(&self.file_path, &self.temp_path, data).await?;
        *map = next;
        Ok(())
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

async fn write_atomic(path: &Path, temp_path: &Path, data: Vec<u8>) -> Result<(), StorageError> {
    let result = async {
        fs::write(temp_path, data).await?;
        fs::rename(temp_path, path).await
    }
    .await;

    if result.is_err() {
        let _ = fs::remove_file(temp_path).await;
    }
    Ok(result?)
}
