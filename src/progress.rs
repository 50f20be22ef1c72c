//! Per-lesson completion ledger.
//!
//! A flat map from lesson id to completion, independent of which item or
//! module the lesson belongs to. Persistence is best effort: losing it only
//! degrades a progress display, so failures never surface to the caller.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::ServiceResult;
use crate::types::ContentItem;

pub struct ProgressLedger {
    path: PathBuf,
    completed: HashMap<String, bool>,
}

impl ProgressLedger {
    /// Open the ledger in a data directory. Missing or malformed content
    /// starts an empty ledger.
    pub fn open(dir: &Path) -> Self {
        let path = dir.join("progress.json");
        let completed = fs::read_to_string(&path)
            .ok()
            .and_then(|blob| serde_json::from_str(&blob).ok())
            .unwrap_or_default();
        Self { path, completed }
    }

    /// Mark a lesson complete. Idempotent; persists immediately, silently.
    pub fn mark_complete(&mut self, lesson_id: &str) {
        self.completed.insert(lesson_id.to_string(), true);
        if let Err(e) = self.save() {
            tracing::debug!(error = %e, "progress ledger save failed");
        }
    }

    pub fn is_complete(&self, lesson_id: &str) -> bool {
        self.completed.get(lesson_id).copied().unwrap_or(false)
    }

    /// Derived `(completed, total)` for an item, counted by walking its
    /// modules and lessons against the ledger. Never stored.
    pub fn summary(&self, item: &ContentItem) -> (usize, usize) {
        let total = item.lesson_count();
        let completed = item
            .modules
            .iter()
            .flat_map(|m| m.lessons.iter())
            .filter(|l| self.is_complete(&l.id))
            .count();
        (completed, total)
    }

    fn save(&self) -> ServiceResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let temp = self.path.with_extension("tmp");
        let mut f = File::create(&temp)?;
        let content = serde_json::to_string(&self.completed)?;
        f.write_all(content.as_bytes())?;
        f.sync_all()?;
        fs::rename(temp, &self.path)?;
        Ok(())
    }
}
