//! In-memory task registry.
//!
//! The registry is the sole owner of the id → record mapping and the next-id
//! counter for the process lifetime. Every mutating operation rewrites the
//! full snapshot through the store; every operation, mutating or not, runs
//! under a timing scope that appends one action line to the audit trail.
//!
//! Not-found is signaled uniformly as [`Error::NotFound`] across lookup and
//! update paths.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::audit::{self, AuditLog};
use crate::error::{Error, Result};
use crate::store::{Snapshot, SnapshotStore};
use crate::task::{self, Priority, Status, Task, TaskId, ValidationError};

/// Default ceiling on live records.
pub const DEFAULT_MAX_TASKS: usize = 50_000;

pub struct TaskRegistry {
    tasks: BTreeMap<TaskId, Task>,
    next_id: TaskId,
    max_tasks: usize,
    store: SnapshotStore,
    audit: AuditLog,
}

impl TaskRegistry {
    /// Open the registry, loading whatever snapshot exists at the store path.
    ///
    /// Load is best-effort and never fails: a missing file starts empty, and
    /// broken content degrades per the store's contract.
    pub fn open(store: SnapshotStore, audit: AuditLog, max_tasks: usize) -> Self {
        let snapshot = store.load(&audit);
        let mut tasks = BTreeMap::new();
        for task in snapshot.tasks {
            tasks.insert(task.id, task);
        }
        Self {
            tasks,
            next_id: snapshot.next_id,
            max_tasks,
            store,
            audit,
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Id the next created task will receive.
    pub fn next_id(&self) -> TaskId {
        self.next_id
    }

    /// Create a new pending task.
    ///
    /// Fails with [`Error::CapacityExceeded`] when the registry is full (the
    /// counter does not advance) and [`Error::Validation`] for bad priority
    /// text or record fields. On success the record is inserted, the counter
    /// bumped, and the full snapshot saved.
    pub fn create(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
        priority_text: &str,
        due_at: DateTime<Utc>,
    ) -> Result<Task> {
        let audit = self.audit.clone();
        let title = title.into();
        let description = description.into();
        audit::timed(&audit, "add task", || {
            self.create_inner(title, description, priority_text, due_at)
        })
    }

    fn create_inner(
        &mut self,
        title: String,
        description: String,
        priority_text: &str,
        due_at: DateTime<Utc>,
    ) -> Result<Task> {
        if self.tasks.len() >= self.max_tasks {
            let err = Error::CapacityExceeded {
                max: self.max_tasks,
            };
            self.audit.record_error(&err.to_string());
            return Err(err);
        }

        let priority =
            Priority::parse(priority_text).map_err(|err| self.validation_failed(err))?;
        let task = Task::new(self.next_id, title, description, priority, due_at, Utc::now())
            .map_err(|err| self.validation_failed(err))?;

        self.audit.record_data(
            "task added",
            &format!("id: {}, title: {}", task.id, task.title),
        );
        self.tasks.insert(task.id, task.clone());
        self.next_id += 1;
        self.save();

        Ok(task)
    }

    /// Look up a task by id. Pure: no mutation, no save.
    pub fn find(&self, id: TaskId) -> Result<Task> {
        let audit = self.audit.clone();
        audit::timed(&audit, "find task by id", || {
            self.tasks.get(&id).cloned().ok_or_else(|| {
                let err = Error::NotFound(id);
                audit.record_error(&err.to_string());
                err
            })
        })
    }

    /// Every record, completed ones included, ordered by priority rank.
    pub fn list_by_priority(&self, ascending: bool) -> Vec<Task> {
        let audit = self.audit.clone();
        audit::timed(&audit, "list tasks by priority", || {
            let mut tasks: Vec<Task> = self.tasks.values().cloned().collect();
            task::sort_by_priority(&mut tasks, ascending);
            tasks
        })
    }

    /// Records still open (not completed), soonest due date first.
    pub fn list_by_due_date(&self) -> Vec<Task> {
        let audit = self.audit.clone();
        audit::timed(&audit, "list tasks by due date", || {
            let mut tasks: Vec<Task> = self
                .tasks
                .values()
                .filter(|task| task.status != Status::Completed)
                .cloned()
                .collect();
            tasks.sort_by_key(|task| task.due_at);
            tasks
        })
    }

    /// Replace the status of the task with the given id.
    ///
    /// Fails with [`Error::NotFound`] for a missing id and
    /// [`Error::Validation`] for unrecognized status text. On success the
    /// stored record is replaced with a status-changed copy and the full
    /// snapshot saved.
    pub fn update_status(&mut self, id: TaskId, status_text: &str) -> Result<Task> {
        let audit = self.audit.clone();
        audit::timed(&audit, "update task status", || {
            self.update_status_inner(id, status_text)
        })
    }

    fn update_status_inner(&mut self, id: TaskId, status_text: &str) -> Result<Task> {
        let current = match self.tasks.get(&id) {
            Some(task) => task.clone(),
            None => {
                let err = Error::NotFound(id);
                self.audit.record_error(&err.to_string());
                return Err(err);
            }
        };

        let status = Status::parse(status_text).map_err(|err| self.validation_failed(err))?;

        let updated = current.with_status(status);
        self.tasks.insert(id, updated.clone());
        self.audit.record_data(
            "task status updated",
            &format!("id: {}, status: {}", id, status.as_str()),
        );
        self.save();

        Ok(updated)
    }

    fn validation_failed(&self, err: ValidationError) -> Error {
        self.audit.record_error(&err.to_string());
        Error::Validation(err)
    }

    fn save(&self) {
        let snapshot = Snapshot {
            next_id: self.next_id,
            tasks: self.tasks.values().cloned().collect(),
        };
        self.store.save(&snapshot, &self.audit);
    }
}
