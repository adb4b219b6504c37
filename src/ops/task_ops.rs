use chrono::{DateTime, SubsecRound, Utc};

use crate::model::task::{NewTask, Priority, Task, TaskId, TaskStatus};

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

/// Prepend a new task built from `draft`, making it the newest item.
///
/// Returns `None` without touching the collection when the text is blank.
/// Text and category are stored trimmed; a blank category is stored as
/// absent. `created_at` is kept at millisecond precision so it survives a
/// persist/reload round trip unchanged.
pub fn add_task(
    tasks: &mut Vec<Task>,
    draft: NewTask,
    id: TaskId,
    now: DateTime<Utc>,
) -> Option<TaskId> {
    let text = draft.text.trim();
    if text.is_empty() {
        return None;
    }

    let mut task = Task::new(id, text, draft.priority, now.trunc_subsecs(3));
    task.category = draft
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string);

    tasks.insert(0, task);
    Some(id)
}

/// Smallest id greater than every id in the collection (1 for an empty one).
/// `None` when the largest id is already `TaskId::MAX`.
pub fn next_id(tasks: &[Task]) -> Option<TaskId> {
    tasks
        .iter()
        .map(|t| t.id)
        .max()
        .map_or(Some(1), |max| max.checked_add(1))
}

// ---------------------------------------------------------------------------
// Field updates
// ---------------------------------------------------------------------------
//
// Each update touches exactly one field of the matching task and returns
// whether a task with that id exists. A missing id is a no-op.

pub fn set_status(tasks: &mut [Task], id: TaskId, status: TaskStatus) -> bool {
    match find_task_mut(tasks, id) {
        Some(task) => {
            task.status = status;
            true
        }
        None => false,
    }
}

pub fn set_priority(tasks: &mut [Task], id: TaskId, priority: Priority) -> bool {
    match find_task_mut(tasks, id) {
        Some(task) => {
            task.priority = priority;
            true
        }
        None => false,
    }
}

pub fn toggle_star(tasks: &mut [Task], id: TaskId) -> bool {
    match find_task_mut(tasks, id) {
        Some(task) => {
            task.is_starred = !task.is_starred;
            true
        }
        None => false,
    }
}

// ---------------------------------------------------------------------------
// Deletion
// ---------------------------------------------------------------------------

/// Permanently remove the task with this id. Returns whether one was removed.
pub fn delete_task(tasks: &mut Vec<Task>, id: TaskId) -> bool {
    let before_len = tasks.len();
    tasks.retain(|t| t.id != id);
    tasks.len() != before_len
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

pub fn find_task(tasks: &[Task], id: TaskId) -> Option<&Task> {
    tasks.iter().find(|t| t.id == id)
}

pub fn find_task_mut(tasks: &mut [Task], id: TaskId) -> Option<&mut Task> {
    tasks.iter_mut().find(|t| t.id == id)
}
