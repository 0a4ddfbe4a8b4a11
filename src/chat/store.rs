//! Durable storage for the conversation list.
//!
//! The manager is written as a single JSON snapshot using an atomic
//! write-then-rename so a crash never leaves a half-written file behind.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::manager::ConversationManager;
use super::types::{Conversation, ConversationId};

/// Current snapshot format version
const SNAPSHOT_VERSION: u32 = 1;

/// File name of the snapshot inside the data directory
const SNAPSHOT_FILE: &str = "conversations.json";

#[derive(Debug, Deserialize)]
struct Snapshot {
    version: u32,
    #[serde(default)]
    active_id: Option<ConversationId>,
    #[serde(default)]
    conversations: Vec<Conversation>,
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    version: u32,
    active_id: Option<&'a str>,
    conversations: &'a [Conversation],
}

/// Loads and saves `ConversationManager` snapshots.
pub struct ConversationStore {
    path: PathBuf,
}

impl ConversationStore {
    /// Store the snapshot inside `dir`
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(SNAPSHOT_FILE),
        }
    }

    /// Store the snapshot in the platform data directory (`<data>/ragchat`)
    pub fn default_location() -> Result<Self> {
        let data_dir = dirs::data_dir()
            .context("Could not find data directory")?
            .join("ragchat");
        Ok(Self::new(&data_dir))
    }

    /// Path of the snapshot file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the manager, or a fresh one if nothing has been saved yet
    pub fn load(&self) -> Result<ConversationManager> {
        if !self.path.exists() {
            return Ok(ConversationManager::new());
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read conversations: {}", self.path.display()))?;
        let snapshot: Snapshot = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse conversations: {}", self.path.display()))?;

        if snapshot.version > SNAPSHOT_VERSION {
            tracing::warn!(
                version = snapshot.version,
                "conversation snapshot is newer than this build, unknown fields are dropped"
            );
        }

        tracing::info!(
            count = snapshot.conversations.len(),
            path = %self.path.display(),
            "restored conversations"
        );
        Ok(ConversationManager::from_snapshot(
            snapshot.conversations,
            snapshot.active_id,
        ))
    }

    /// Load the manager, moving an unreadable snapshot aside first.
    ///
    /// A snapshot that fails to load is renamed to
    /// `conversations.json.corrupt-<timestamp>` and a fresh manager is returned
    /// with the backup path, so later saves never overwrite it. Errors only
    /// when the bad file could not be moved.
    pub fn load_or_recover(&self) -> Result<(ConversationManager, Option<PathBuf>)> {
        let error = match self.load() {
            Ok(manager) => return Ok((manager, None)),
            Err(e) => e,
        };
        tracing::warn!(
            path = %self.path.display(),
            error = %format!("{error:#}"),
            "could not restore conversations"
        );

        let stamp = Utc::now().format("%Y%m%d-%H%M%S");
        let backup = self
            .path
            .with_file_name(format!("{SNAPSHOT_FILE}.corrupt-{stamp}"));
        fs::rename(&self.path, &backup).with_context(|| {
            format!(
                "Failed to move unreadable conversations to {}",
                backup.display()
            )
        })?;

        tracing::info!(backup = %backup.display(), "kept unreadable conversations aside");
        Ok((ConversationManager::new(), Some(backup)))
    }

    /// Save the manager (write to temp, then rename)
    pub fn save(&self, manager: &ConversationManager) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory: {}", parent.display()))?;
        }

        let snapshot = SnapshotRef {
            version: SNAPSHOT_VERSION,
            active_id: manager.active_id(),
            conversations: manager.conversations(),
        };
        let json =
            serde_json::to_string_pretty(&snapshot).context("Failed to serialize conversations")?;

        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, json)
            .with_context(|| format!("Failed to write temp file: {}", temp_path.display()))?;
        fs::rename(&temp_path, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;

        tracing::debug!(count = manager.len(), "saved conversations");
        Ok(())
    }
}
