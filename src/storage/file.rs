//! JSON file storage backend
//!
//! Each key lives in `<data_dir>/<key>.json`, the same layout the Telegram
//! bot reads its `bot_data` folder from.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;
use crate::utils::errors::{ShopDeskError, Result};
use super::KeyValueStore;

#[derive(Debug)]
pub struct FileStore {
    data_dir: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Open a file store rooted at `data_dir`, creating the directory if needed
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        fs::create_dir_all(&data_dir)?;

        Ok(Self {
            data_dir,
            write_lock: Mutex::new(()),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(ShopDeskError::InvalidInput(format!("Invalid storage key: {:?}", key)));
        }
        Ok(self.data_dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let tmp_path = self.data_dir.join(format!(".{}.json.tmp", key));

        let _guard = self.write_lock.lock()
            .map_err(|_| ShopDeskError::Storage("file store lock poisoned".to_string()))?;

        fs::write(&tmp_path, value)?;
        fs::rename(&tmp_path, &path)?;

        debug!(path = %path.display(), bytes = value.len(), "File written");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;

        let _guard = self.write_lock.lock()
            .map_err(|_| ShopDeskError::Storage("file store lock poisoned".to_string()))?;

        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}
