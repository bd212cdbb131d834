//! Command-line interface for taskdeck
//!
//! The binary runs an interactive menu shell; flags and environment
//! variables select the config file, snapshot path, and audit log directory.

use std::path::PathBuf;

use clap::Parser;

use crate::audit::AuditLog;
use crate::config::{Config, DEFAULT_CONFIG_FILE};
use crate::error::Result;
use crate::registry::TaskRegistry;
use crate::store::SnapshotStore;

mod menu;

/// taskdeck - single-user task tracker
///
/// Tracks tasks with a title, description, priority, status, and due date;
/// persists them to a JSON snapshot and records an audit trail of every
/// operation.
#[derive(Parser, Debug)]
#[command(name = "taskdeck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the config file
    #[arg(long, env = "TASKDECK_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Path to the snapshot file (overrides the config file)
    #[arg(long, env = "TASKDECK_SNAPSHOT")]
    pub snapshot: Option<PathBuf>,

    /// Directory for the audit logs (overrides the config file)
    #[arg(long, env = "TASKDECK_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let mut config = Config::load(&self.config)?;
        if let Some(snapshot) = self.snapshot {
            config.storage.snapshot = snapshot;
        }
        if let Some(dir) = self.log_dir {
            config.logs.dir = dir;
        }

        let audit = AuditLog::new(config.logs.dir.clone());
        let store = SnapshotStore::new(config.storage.snapshot.clone());
        let mut registry = TaskRegistry::open(store, audit.clone(), config.registry.max_tasks);

        menu::run(&mut registry, &audit)
    }
}
