//! Snapshot persistence for the task registry.
//!
//! The entire registry state (next-id counter plus every record) lives in one
//! JSON document that is rewritten in full after every successful mutation.
//! A full rewrite is O(total size) per save; at the registry's 50k ceiling
//! that is an accepted scaling limit, not a bug.
//!
//! Load and save never propagate errors to the caller: a broken snapshot
//! degrades to whatever parsed, and a failed save leaves the in-memory state
//! authoritative. Both paths log to the audit error log and warn on stderr.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::audit::AuditLog;
use crate::error::Result;
use crate::task::{Task, TaskId};

/// On-disk layout: the id counter and every record, due dates as RFC 3339.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub next_id: TaskId,
    pub tasks: Vec<Task>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            next_id: 1,
            tasks: Vec::new(),
        }
    }
}

// Tolerant counterpart used only while loading: missing keys fall back to
// defaults, and each record is decoded individually so one bad entry cannot
// take down the rest.
#[derive(Debug, Default, Deserialize)]
struct RawSnapshot {
    #[serde(default = "default_next_id")]
    next_id: TaskId,
    #[serde(default)]
    tasks: Vec<serde_json::Value>,
}

fn default_next_id() -> TaskId {
    1
}

/// Store for the single snapshot file.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the snapshot, degrading instead of failing.
    ///
    /// Missing file: empty snapshot, counter at 1. Malformed top level: log,
    /// warn, and keep defaults. A record that fails to decode or violates the
    /// stored-record rules is skipped (and logged); the rest load. Records
    /// whose due date has passed load normally — that rule is creation-time
    /// only. The effective counter never trails the highest loaded id.
    pub fn load(&self, audit: &AuditLog) -> Snapshot {
        if !self.path.exists() {
            return Snapshot::default();
        }

        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) => {
                self.report(audit, &format!("failed to read snapshot: {}", err));
                return Snapshot::default();
            }
        };

        let doc: RawSnapshot = match serde_json::from_str(&raw) {
            Ok(doc) => doc,
            Err(err) => {
                self.report(audit, &format!("malformed snapshot: {}", err));
                RawSnapshot::default()
            }
        };

        let mut tasks = Vec::with_capacity(doc.tasks.len());
        for value in doc.tasks {
            match decode_record(value) {
                Ok(task) => tasks.push(task),
                Err(message) => {
                    audit.record_error(&format!("skipped record while loading: {}", message));
                }
            }
        }

        let max_id = tasks.iter().map(|task| task.id).max().unwrap_or(0);
        Snapshot {
            next_id: doc.next_id.max(max_id + 1),
            tasks,
        }
    }

    /// Write the full snapshot, swallowing failures.
    ///
    /// The triggering operation already applied its in-memory mutation and
    /// still reports success; a failed save is a logged durability gap.
    pub fn save(&self, snapshot: &Snapshot, audit: &AuditLog) {
        if let Err(err) = self.try_save(snapshot) {
            self.report(audit, &format!("failed to save snapshot: {}", err));
        }
    }

    fn try_save(&self, snapshot: &Snapshot) -> Result<()> {
        let json = serde_json::to_string_pretty(snapshot)?;
        write_atomic(&self.path, json.as_bytes())
    }

    fn report(&self, audit: &AuditLog, message: &str) {
        let message = format!("{}: {}", self.path.display(), message);
        audit.record_error(&message);
        eprintln!("warning: {}", message);
    }
}

fn decode_record(value: serde_json::Value) -> std::result::Result<Task, String> {
    let task: Task = serde_json::from_value(value).map_err(|err| err.to_string())?;
    task.validate_stored().map_err(|err| err.to_string())?;
    Ok(task)
}

/// Write data atomically using temp file + rename.
///
/// A crashed or failed save never leaves a torn snapshot on disk: the file is
/// either the old content or the new content.
fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let temp_path = path.with_extension("tmp");

    let mut file = File::create(&temp_path)?;
    file.write_all(data)?;
    file.sync_all()?;

    fs::rename(&temp_path, path)?;

    Ok(())
}
