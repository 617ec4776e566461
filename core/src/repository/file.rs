use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::repository::traits::{KeyValueStore, StoreError};

const DEFAULT_DIR_NAME: &str = ".milktrack";
const DEFAULT_FILE_NAME: &str = "store.json";
const TMP_SUFFIX: &str = "tmp";
const CORRUPT_SUFFIX: &str = "bad";

/// Key-value store kept as one JSON object on disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    file_path: PathBuf,
}

impl FileStore {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self, StoreError> {
        let mut path = match base_dir {
            Some(dir) => dir,
            None => default_base_dir()?,
        };
        fs::create_dir_all(&path)?;
        path.push(DEFAULT_FILE_NAME);
        Ok(FileStore { file_path: path })
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        if !self.file_path.exists() {
            return Ok(BTreeMap::new());
        }
        let file = File::open(&self.file_path)?;
        let reader = BufReader::new(file);
        let values = serde_json::from_reader(reader)?;
        Ok(values)
    }

    /// Current contents for a write. A file that no longer parses is moved to
    /// `store.json.bad` and the write starts from an empty store.
    fn read_for_write(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match self.read_all() {
            Err(StoreError::Serde(err)) => {
                let aside = self.corrupt_path();
                warn!(
                    error = %err,
                    moved_to = %aside.display(),
                    "store file is corrupted, starting a fresh one"
                );
                fs::rename(&self.file_path, &aside)?;
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }

    pub fn corrupt_path(&self) -> PathBuf {
        self.file_path.with_extension(format!("json.{}", CORRUPT_SUFFIX))
    }

    fn write_all(&self, values: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let tmp = self.file_path.with_extension(format!("json.{}", TMP_SUFFIX));
        {
            let file = File::create(&tmp)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, values)?;
            writer.flush()?;
        }
        fs::rename(&tmp, &self.file_path)?;
        debug!(path = %self.file_path.display(), keys = values.len(), "store written");
        Ok(())
    }
}

/// `~/.milktrack`, or an error when no home directory can be determined.
pub fn default_base_dir() -> Result<PathBuf, StoreError> {
    let home_dir = dirs::home_dir().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "could not determine home directory",
        )
    })?;
    Ok(home_dir.join(DEFAULT_DIR_NAME))
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut values = self.read_for_write()?;
        values.insert(key.to_string(), value.to_string());
        self.write_all(&values)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        let mut values = self.read_for_write()?;
        if values.remove(key).is_some() {
            self.write_all(&values)?;
        }
        Ok(())
    }
}
