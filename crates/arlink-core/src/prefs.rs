use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{ShellError, ShellResult};

pub const KEY_LAST_ADDRESS: &str = "last_server_address";
pub const KEY_LAST_SESSION: &str = "last_session_id";

/// Small string key-value store that survives restarts.
pub trait Preferences: Send {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn flush(&mut self) -> ShellResult<()>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryPreferences {
    map: BTreeMap<String, String>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Preferences for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.map.insert(key.to_string(), value.to_string());
    }

    fn flush(&mut self) -> ShellResult<()> {
        Ok(())
    }
}

/// Preferences kept as a flat TOML table on disk.
#[derive(Debug)]
pub struct FilePreferences {
    path: PathBuf,
    map: BTreeMap<String, String>,
}

impl FilePreferences {
    /// Open `path`; a missing file reads as empty.
    pub fn open(path: impl AsRef<Path>) -> ShellResult<Self> {
        let path = path.as_ref().to_path_buf();
        let map = match fs::read_to_string(&path) {
            Ok(s) => toml::from_str(&s)
                .map_err(|e| ShellError::Prefs(format!("parse {}: {}", path.display(), e)))?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(ShellError::Prefs(format!("read {}: {}", path.display(), e))),
        };
        Ok(Self { path, map })
    }
}

impl Preferences for FilePreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.map.insert(key.to_string(), value.to_string());
    }

    fn flush(&mut self) -> ShellResult<()> {
        let s = toml::to_string(&self.map).map_err(|e| ShellError::Prefs(e.to_string()))?;
        fs::write(&self.path, s)
            .map_err(|e| ShellError::Prefs(format!("write {}: {}", self.path.display(), e)))
    }
}
