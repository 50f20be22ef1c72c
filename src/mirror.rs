use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::ServiceResult;

/// Default on-device data directory (`~/.cyberlearn`).
pub fn default_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("couldn't find home dir");
    home.join(".cyberlearn")
}

/// Local mirror of the merged catalog: one serialized blob, whole-collection
/// granularity. Partial writes are impossible by construction (temp file +
/// atomic rename).
pub struct Mirror {
    path: PathBuf,
}

impl Mirror {
    pub fn new() -> Self {
        Self::at_dir(&default_data_dir())
    }

    pub fn at_dir(dir: &Path) -> Self {
        Self {
            path: dir.join("catalog.json"),
        }
    }

    /// Read the stored blob. Missing or unreadable content is `None`; the
    /// caller decides what "absent" means (it always means "fall back").
    pub fn read(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Some(contents),
            Err(e) => {
                tracing::debug!(path = %self.path.display(), error = %e, "mirror read failed");
                None
            }
        }
    }

    /// Replace the stored blob using a temporary file and an atomic rename
    /// to avoid partial writes.
    pub fn write(&self, blob: &str) -> ServiceResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp = self.path.with_extension("tmp");
        let mut f = File::create(&temp)?;
        f.write_all(blob.as_bytes())?;
        f.sync_all()?;
        fs::rename(temp, &self.path)?;
        Ok(())
    }
}

impl Default for Mirror {
    fn default() -> Self {
        Self::new()
    }
}
