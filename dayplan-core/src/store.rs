//! File-backed record store: an in-memory task list mirrored to a JSON
//! file, rewritten wholesale on every mutation.
//!
//! Single process, single in-memory copy is authoritative; there is no file
//! locking, and external edits to the backing file between operations are
//! lost at the next rewrite. Every mutating operation serializes the
//! prospective record set to disk first and commits to memory only on
//! success, so a failed write leaves the store exactly as it was.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use tracing::warn;
use uuid::Uuid;

use crate::task::{Priority, Task, TaskStatus};

#[derive(Debug)]
pub struct TaskStore {
    path: PathBuf,
    tasks: Vec<Task>,
}

/// Point-in-time counters over the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStats {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub pending_tasks: usize,
    /// Per-priority counts over non-completed tasks.
    pub high_priority: usize,
    pub medium_priority: usize,
    pub low_priority: usize,
    /// Backing file size in bytes, 0 when the file does not exist.
    pub file_size: u64,
}

impl TaskStore {
    /// Open a store backed by `path`. A missing file is an empty store; an
    /// unreadable or malformed one degrades to empty with a warning rather
    /// than failing, and stays untouched on disk until the next mutation.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let tasks = match load_tasks(&path) {
            Ok(tasks) => tasks,
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "task file unreadable, starting from an empty store"
                );
                Vec::new()
            }
        };
        Self { path, tasks }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Add a new record. Ids are store-unique; a duplicate is a caller bug
    /// and fails without touching state.
    pub fn add_task(&mut self, task: Task) -> Result<()> {
        if self.tasks.iter().any(|t| t.id == task.id) {
            bail!("duplicate task id: {}", task.id);
        }
        let mut next = self.tasks.clone();
        next.push(task);
        self.commit(next)
    }

    /// All records, as independent copies.
    pub fn get_all_tasks(&self) -> Vec<Task> {
        self.tasks.clone()
    }

    pub fn get_task_by_id(&self, id: &Uuid) -> Option<Task> {
        self.tasks.iter().find(|t| t.id == *id).cloned()
    }

    /// Replace the record with `id` wholesale. The stored id wins over
    /// whatever the replacement carries. `Ok(false)` when `id` is unknown.
    pub fn update_task(&mut self, id: &Uuid, mut replacement: Task) -> Result<bool> {
        let Some(index) = self.tasks.iter().position(|t| t.id == *id) else {
            return Ok(false);
        };
        replacement.id = *id;

        let mut next = self.tasks.clone();
        next[index] = replacement;
        self.commit(next)?;
        Ok(true)
    }

    /// One-way pending -> completed transition, stamping `completed_date`.
    /// Completing an already-completed task is a no-op that still reports
    /// success. `Ok(false)` when `id` is unknown.
    pub fn complete_task(&mut self, id: &Uuid, now: DateTime<Utc>) -> Result<bool> {
        let Some(index) = self.tasks.iter().position(|t| t.id == *id) else {
            return Ok(false);
        };
        if self.tasks[index].is_completed() {
            return Ok(true);
        }

        let mut next = self.tasks.clone();
        next[index].complete(now);
        self.commit(next)?;
        Ok(true)
    }

    /// `Ok(false)` when `id` is unknown.
    pub fn delete_task(&mut self, id: &Uuid) -> Result<bool> {
        if !self.tasks.iter().any(|t| t.id == *id) {
            return Ok(false);
        }
        let next: Vec<Task> = self.tasks.iter().filter(|t| t.id != *id).cloned().collect();
        self.commit(next)?;
        Ok(true)
    }

    pub fn tasks_by_status(&self, status: TaskStatus) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|t| t.status == status)
            .cloned()
            .collect()
    }

    pub fn tasks_by_priority(&self, priority: Priority) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|t| t.priority == priority)
            .cloned()
            .collect()
    }

    /// Non-completed tasks whose deadline has passed.
    pub fn overdue_tasks(&self, now: DateTime<Utc>) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|t| !t.is_completed() && t.due_date < now)
            .cloned()
            .collect()
    }

    pub fn stats(&self) -> StoreStats {
        let completed_tasks = self.tasks.iter().filter(|t| t.is_completed()).count();
        let open: Vec<&Task> = self.tasks.iter().filter(|t| !t.is_completed()).collect();

        StoreStats {
            total_tasks: self.tasks.len(),
            completed_tasks,
            pending_tasks: self.tasks.len() - completed_tasks,
            high_priority: open.iter().filter(|t| t.priority == Priority::High).count(),
            medium_priority: open
                .iter()
                .filter(|t| t.priority == Priority::Medium)
                .count(),
            low_priority: open.iter().filter(|t| t.priority == Priority::Low).count(),
            file_size: fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0),
        }
    }

    /// Write the current record set to `file`, or to a timestamped
    /// `tasks_backup_<YYYYmmdd_HHMMSS>.json` beside the store file when no
    /// name is given. Returns the path written.
    pub fn backup(&self, file: Option<PathBuf>, now: DateTime<Utc>) -> Result<PathBuf> {
        let target = file.unwrap_or_else(|| {
            let name = format!("tasks_backup_{}.json", now.format("%Y%m%d_%H%M%S"));
            match self.path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.join(name),
                _ => PathBuf::from(name),
            }
        });

        write_tasks(&target, &self.tasks)?;
        Ok(target)
    }

    /// Replace the full record set from a backup file and re-persist. The
    /// backup is parsed completely before any state changes, so a missing
    /// or corrupt file leaves the store untouched.
    pub fn restore(&mut self, file: &Path) -> Result<()> {
        let raw =
            fs::read_to_string(file).with_context(|| format!("read backup {}", file.display()))?;
        let restored: Vec<Task> = serde_json::from_str(&raw)
            .with_context(|| format!("parse backup {}", file.display()))?;
        self.commit(restored)
    }

    fn commit(&mut self, next: Vec<Task>) -> Result<()> {
        write_tasks(&self.path, &next)?;
        self.tasks = next;
        Ok(())
    }
}

fn load_tasks(path: &Path) -> Result<Vec<Task>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let tasks = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(tasks)
}

fn write_tasks(path: &Path, tasks: &[Task]) -> Result<()> {
    let json = serde_json::to_string_pretty(tasks)?;
    fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
