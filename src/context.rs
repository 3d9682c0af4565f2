// ABOUTME: Context stack module for the slidegen application
// ABOUTME: Maintains the persisted, append-only log of prior-slide summaries

use crate::errors::{Result, SlideGenError};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// One summary entry. The index matches the slide identifier of the part
/// it summarizes (e.g. "003" or "003_2").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextEntry {
    pub index: String,
    pub summary: String,
}

/// The ordered sequence of summaries visible to future prompts, backed by
/// a JSON file that is rewritten in full on every append. Entries are
/// never removed or reordered.
#[derive(Debug)]
pub struct ContextStack {
    path: PathBuf,
    entries: Vec<ContextEntry>,
}

impl ContextStack {
    /// Load the stack from disk, returning an empty stack when no file
    /// exists yet.
    pub fn load(path: &Path) -> Result<Self> {
        let entries = if path.exists() {
            let content = fs::read_to_string(path).map_err(SlideGenError::FileReadError)?;
            serde_json::from_str(&content).map_err(SlideGenError::SerializationError)?
        } else {
            Vec::new()
        };

        info!(
            "Loaded context stack from {:?} ({} entries)",
            path,
            entries.len()
        );

        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    /// Append one entry and immediately persist the full updated sequence.
    /// The file is replaced via a temporary file and rename, so a crash
    /// mid-append never corrupts previously confirmed entries.
    pub fn append(&mut self, entry: ContextEntry) -> Result<()> {
        self.entries.push(entry);

        let serialized = serde_json::to_string_pretty(&self.entries)
            .map_err(SlideGenError::SerializationError)?;

        let tmp_path = self
            .path
            .with_extension(format!("tmp-{}", uuid::Uuid::new_v4()));
        fs::write(&tmp_path, serialized).map_err(SlideGenError::FileReadError)?;
        fs::rename(&tmp_path, &self.path).map_err(SlideGenError::FileReadError)?;

        Ok(())
    }

    /// Serialize the stack for embedding in a prompt. Entries appear in
    /// generation order, each tagged with its slide index.
    pub fn render(&self) -> String {
        if self.entries.is_empty() {
            return "(none yet - this is the first slide)".to_string();
        }

        self.entries
            .iter()
            .map(|entry| format!("- Slide {}: {}", entry.index, entry.summary))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn entries(&self) -> &[ContextEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
