//! Append-only audit trail.
//!
//! Three plain-text logs under one directory: actions (with timings), errors,
//! and data mutations. Each append opens the file, writes one line, and
//! closes it; no handle is held across operations. The trail is write-only —
//! nothing in the system reads it back.
//!
//! Line formats are an external interface and kept verbatim:
//!
//! ```text
//! <ts> - Accion: <name> - Duracion: <ms> ms
//! <ts> - ERROR: <message>
//! <ts> - <operation>: <details>
//! ```

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Local;

const ACTION_LOG: &str = "actions.log";
const ERROR_LOG: &str = "errors.log";
const DATA_LOG: &str = "data.log";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Actions slower than this are flagged on stdout.
const SLOW_ACTION_MS: f64 = 1000.0;

/// Handle to the three log files. Constructed once at startup and passed to
/// every component that records entries.
#[derive(Debug, Clone)]
pub struct AuditLog {
    dir: PathBuf,
}

impl AuditLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path to the action/timing log
    pub fn action_log(&self) -> PathBuf {
        self.dir.join(ACTION_LOG)
    }

    /// Path to the error log
    pub fn error_log(&self) -> PathBuf {
        self.dir.join(ERROR_LOG)
    }

    /// Path to the data-mutation log
    pub fn data_log(&self) -> PathBuf {
        self.dir.join(DATA_LOG)
    }

    /// Record a completed action and its duration in fractional milliseconds.
    pub fn record_action(&self, action: &str, duration_ms: f64) {
        let line = format!(
            "{} - Accion: {} - Duracion: {:.2} ms",
            timestamp(),
            action,
            duration_ms
        );
        self.append(&self.action_log(), &line);
    }

    /// Record an error message.
    pub fn record_error(&self, message: &str) {
        let line = format!("{} - ERROR: {}", timestamp(), message);
        self.append(&self.error_log(), &line);
    }

    /// Record a data mutation with a descriptive payload.
    pub fn record_data(&self, operation: &str, details: &str) {
        let line = format!("{} - {}: {}", timestamp(), operation, details);
        self.append(&self.data_log(), &line);
    }

    // A failed append is non-fatal to the calling operation: the trail is a
    // side channel, never load-bearing. The failure still goes to tracing.
    fn append(&self, path: &Path, line: &str) {
        if let Err(err) = self.try_append(path, line) {
            tracing::warn!(path = %path.display(), %err, "audit append failed");
        }
    }

    fn try_append(&self, path: &Path, line: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", line)?;
        Ok(())
    }
}

fn timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Run `op` under a timing scope.
///
/// The start instant is taken on entry and the action line is appended on
/// every exit path, whether `op` produced a success or an error value. An
/// action slower than a second is flagged on stdout the moment the
/// measurement completes.
pub fn timed<T>(audit: &AuditLog, action: &str, op: impl FnOnce() -> T) -> T {
    let start = Instant::now();
    let result = op();
    let duration_ms = start.elapsed().as_secs_f64() * 1000.0;
    audit.record_action(action, duration_ms);
    if duration_ms > SLOW_ACTION_MS {
        println!(
            "warning: action '{}' took more than a second ({:.2} ms)",
            action, duration_ms
        );
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_lines_have_the_expected_shape() {
        let dir = tempfile::tempdir().expect("tempdir");
        let audit = AuditLog::new(dir.path().join("logs"));
        audit.record_action("add task", 12.345);

        let contents = fs::read_to_string(audit.action_log()).expect("action log");
        let line = contents.lines().next().expect("one line");
        assert!(line.contains(" - Accion: add task - Duracion: 12.35 ms"));
    }

    #[test]
    fn error_and_data_lines_go_to_separate_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let audit = AuditLog::new(dir.path().join("logs"));
        audit.record_error("boom");
        audit.record_data("task added", "id: 1");

        let errors = fs::read_to_string(audit.error_log()).expect("error log");
        assert!(errors.contains(" - ERROR: boom"));
        let data = fs::read_to_string(audit.data_log()).expect("data log");
        assert!(data.contains(" - task added: id: 1"));
        assert!(!audit.action_log().exists());
    }

    #[test]
    fn appends_accumulate_lines() {
        let dir = tempfile::tempdir().expect("tempdir");
        let audit = AuditLog::new(dir.path());
        audit.record_error("first");
        audit.record_error("second");

        let contents = fs::read_to_string(audit.error_log()).expect("error log");
        assert_eq!(contents.lines().count(), 2);
    }

    #[test]
    fn timed_returns_the_closure_result_and_logs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let audit = AuditLog::new(dir.path());

        let value = timed(&audit, "probe", || 41 + 1);
        assert_eq!(value, 42);

        let contents = fs::read_to_string(audit.action_log()).expect("action log");
        assert!(contents.contains("Accion: probe"));
    }

    #[test]
    fn timed_logs_on_error_exits_too() {
        let dir = tempfile::tempdir().expect("tempdir");
        let audit = AuditLog::new(dir.path());

        let result: Result<(), &str> = timed(&audit, "failing", || Err("nope"));
        assert!(result.is_err());

        let contents = fs::read_to_string(audit.action_log()).expect("action log");
        assert!(contents.contains("Accion: failing"));
    }
}
