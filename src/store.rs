//! Key-value settings persisted by the host across runs.
//!
//! The module keeps its device id and tokens here. Hosts that already have a
//! settings facility implement [`Settings`] on top of it; the bundled binary
//! uses [`FileStore`].

use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::{Path, PathBuf},
};

use crate::error::{Error, Result};

pub trait Settings {
    fn read(&self, key: &str) -> Option<String>;

    /// # Errors
    ///
    /// Returns error if the value cannot be persisted.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// # Errors
    ///
    /// Returns error if the removal cannot be persisted.
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Settings that live as long as the process.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStore(HashMap<String, String>);

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Settings for MemoryStore {
    fn read(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.0.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.0.remove(key);
        Ok(())
    }
}

/// Settings kept in a flat TOML table on disk.
///
/// The whole file is rewritten on every change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    /// Larger files are certainly not ours.
    const MAX_FILE_SIZE: u64 = 64 * 1024;

    /// Opens the store at `path`. A missing file is an empty store.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but is too large, unreadable or not
    /// a flat table of strings.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let values = match fs::metadata(&path) {
            Ok(attributes) => {
                if attributes.len() > Self::MAX_FILE_SIZE {
                    return Err(Error::invalid_argument(format!(
                        "{} is too large",
                        path.display()
                    )));
                }

                let contents = fs::read_to_string(&path)?;
                toml::from_str::<BTreeMap<String, String>>(&contents).map_err(|e| {
                    Error::invalid_argument(format!("{} format is invalid: {e}", path.display()))
                })?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self { path, values })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        let contents = toml::to_string(&self.values)?;
        fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl Settings for FileStore {
    fn read(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_owned(), value.to_owned());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.values.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}
