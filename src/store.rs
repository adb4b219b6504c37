//! The task store: single owner of the task collection and the theme.
//!
//! Every mutation is applied to memory first and then written through to
//! the backing [`KeyValueStore`]. Writes are fire-and-forget: a failed write
//! is logged and the in-memory state stays authoritative for the session.
//! The most recent failure is kept for callers that want to report it.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::io::kv::KeyValueStore;
use crate::io::persist::{self, PersistError, TASKS_BACKUP_KEY, TASKS_KEY};
use crate::model::filter::TaskFilter;
use crate::model::task::{NewTask, Priority, Task, TaskId, TaskStatus};
use crate::model::theme::ThemeName;
use crate::ops::board::{self, ColumnCounts, TaskStats};
use crate::ops::task_ops;

pub struct TaskStore<S: KeyValueStore> {
    tasks: Vec<Task>,
    theme: ThemeName,
    storage: S,
    /// High-water mark so ids are never reissued within a session.
    /// `None` once the id space is used up.
    next_id: Option<TaskId>,
    /// Set when stored tasks could be neither read nor backed up; they are
    /// then never overwritten
    tasks_protected: bool,
    write_error: Option<PersistError>,
}

impl<S: KeyValueStore> TaskStore<S> {
    /// Rehydrate from `storage`.
    ///
    /// Absent keys give an empty collection and the light theme. Unreadable
    /// task data fails closed to an empty collection, after the raw payload
    /// is copied to `tasks.bak`. If that copy fails too, the stored payload
    /// is left untouched for the rest of the session. An unknown theme
    /// falls back to light.
    pub fn open(mut storage: S) -> Self {
        let mut tasks_protected = false;
        let tasks = match persist::load_tasks(&storage) {
            Ok(Some(tasks)) => tasks,
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "could not load stored tasks, starting empty");
                tasks_protected = !back_up_raw_tasks(&mut storage);
                Vec::new()
            }
        };

        let theme = match persist::load_theme(&storage) {
            Ok(theme) => theme.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "could not load stored theme, using light");
                ThemeName::default()
            }
        };

        debug!(tasks = tasks.len(), %theme, "store opened");
        let next_id = task_ops::next_id(&tasks);
        TaskStore {
            tasks,
            theme,
            storage,
            next_id,
            tasks_protected,
            write_error: None,
        }
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Create a task from `draft` as the newest item.
    /// Blank text is a silent no-op returning `None`, as is running out of
    /// ids.
    pub fn add_task(&mut self, draft: NewTask) -> Option<TaskId> {
        self.add_task_at(draft, Utc::now())
    }

    /// [`add_task`](Self::add_task) with an explicit creation time
    pub fn add_task_at(&mut self, draft: NewTask, now: DateTime<Utc>) -> Option<TaskId> {
        let id = match (task_ops::next_id(&self.tasks), self.next_id) {
            (Some(free), Some(mark)) => free.max(mark),
            _ => {
                warn!("no task ids left, nothing added");
                return None;
            }
        };
        let added = task_ops::add_task(&mut self.tasks, draft, id, now)?;
        self.next_id = added.checked_add(1);
        debug!(id = added, "task added");
        self.persist_tasks();
        Some(added)
    }

    /// Move a task to another column. Returns false (and does nothing) if
    /// the id is unknown.
    pub fn set_status(&mut self, id: TaskId, status: TaskStatus) -> bool {
        let found = task_ops::set_status(&mut self.tasks, id, status);
        self.after_update(id, found, "status changed")
    }

    pub fn set_priority(&mut self, id: TaskId, priority: Priority) -> bool {
        let found = task_ops::set_priority(&mut self.tasks, id, priority);
        self.after_update(id, found, "priority changed")
    }

    pub fn toggle_star(&mut self, id: TaskId) -> bool {
        let found = task_ops::toggle_star(&mut self.tasks, id);
        self.after_update(id, found, "star toggled")
    }

    pub fn delete_task(&mut self, id: TaskId) -> bool {
        let found = task_ops::delete_task(&mut self.tasks, id);
        self.after_update(id, found, "task deleted")
    }

    /// Replace the current theme and persist it on its own key
    pub fn set_theme(&mut self, theme: ThemeName) {
        self.theme = theme;
        debug!(%theme, "theme changed");
        if let Err(e) = persist::save_theme(&mut self.storage, theme) {
            warn!(error = %e, "could not persist theme");
            self.write_error = Some(e);
        }
    }

    fn after_update(&mut self, id: TaskId, found: bool, what: &str) -> bool {
        if found {
            debug!(id, "{}", what);
            self.persist_tasks();
        } else {
            debug!(id, "no task with this id, ignoring");
        }
        found
    }

    fn persist_tasks(&mut self) {
        if self.tasks_protected {
            warn!("stored tasks were not backed up, leaving them untouched");
            self.write_error = Some(PersistError::NotBackedUp);
            return;
        }
        if let Err(e) = persist::save_tasks(&mut self.storage, &self.tasks) {
            warn!(error = %e, "could not persist tasks");
            self.write_error = Some(e);
        }
    }

    /// The most recent failed write since the last call, if any
    pub fn take_write_error(&mut self) -> Option<PersistError> {
        self.write_error.take()
    }

    // -----------------------------------------------------------------------
    // Read access and derived views
    // -----------------------------------------------------------------------

    /// The collection in persisted order (newest first)
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        task_ops::find_task(&self.tasks, id)
    }

    pub fn theme(&self) -> ThemeName {
        self.theme
    }

    pub fn filtered_tasks(&self, filter: &TaskFilter) -> Vec<&Task> {
        board::filtered_tasks(&self.tasks, filter)
    }

    pub fn tasks_by_status(&self, status: TaskStatus, filter: &TaskFilter) -> Vec<&Task> {
        board::tasks_by_status(&self.tasks, status, filter)
    }

    pub fn column_counts(&self, filter: &TaskFilter) -> ColumnCounts {
        board::column_counts(&self.tasks, filter)
    }

    pub fn stats(&self) -> TaskStats {
        board::task_stats(&self.tasks)
    }

    pub fn progress_percent(&self) -> Option<u8> {
        board::progress_percent(&self.stats())
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }
}

/// Copy an unreadable `tasks` payload, byte for byte, to `tasks.bak`.
/// Returns false when no copy could be made.
fn back_up_raw_tasks<S: KeyValueStore>(storage: &mut S) -> bool {
    match storage.copy(TASKS_KEY, TASKS_BACKUP_KEY) {
        Ok(_) => {
            warn!(key = TASKS_BACKUP_KEY, "unreadable tasks backed up");
            true
        }
        Err(e) => {
            warn!(error = %e, "could not back up unreadable tasks");
            false
        }
    }
}
