use std::path::PathBuf;

use taskdeck::audit::AuditLog;
use taskdeck::registry::TaskRegistry;
use taskdeck::store::SnapshotStore;
use tempfile::TempDir;

/// One isolated snapshot + log directory pair for a test.
pub struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("failed to create tempdir"),
        }
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.dir.path().join("tasks.json")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.dir.path().join("logs")
    }

    pub fn audit(&self) -> AuditLog {
        AuditLog::new(self.log_dir())
    }

    pub fn open_registry(&self, max_tasks: usize) -> TaskRegistry {
        let store = SnapshotStore::new(self.snapshot_path());
        TaskRegistry::open(store, self.audit(), max_tasks)
    }

    pub fn read_snapshot(&self) -> serde_json::Value {
        let raw = std::fs::read_to_string(self.snapshot_path()).expect("snapshot file");
        serde_json::from_str(&raw).expect("snapshot json")
    }
}
