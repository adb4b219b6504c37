//! Derived views over the task collection.
//!
//! Everything here is a pure function of the collection and the caller's
//! [`TaskFilter`]; nothing is mutated or persisted.

use std::cmp::Ordering;

use serde::Serialize;

use crate::model::filter::TaskFilter;
use crate::model::task::{Priority, Task, TaskStatus};

/// Fixed priority rank used only for column ordering
pub fn priority_rank(priority: Priority) -> u8 {
    priority.rank()
}

/// Does this task pass the search term and priority filter?
///
/// The search term matches case-insensitively against the text or the
/// category. An empty term matches every task.
pub fn task_matches(task: &Task, filter: &TaskFilter) -> bool {
    filter.priority.allows(task.priority) && matches_search(task, &filter.search)
}

fn matches_search(task: &Task, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    task.text.to_lowercase().contains(&needle)
        || task
            .category
            .as_deref()
            .is_some_and(|c| c.to_lowercase().contains(&needle))
}

/// Tasks passing `filter`, in collection order (newest first)
pub fn filtered_tasks<'a>(tasks: &'a [Task], filter: &TaskFilter) -> Vec<&'a Task> {
    tasks.iter().filter(|t| task_matches(t, filter)).collect()
}

/// Column ordering: starred first, then higher priority, then newer.
pub fn column_order(a: &Task, b: &Task) -> Ordering {
    b.is_starred
        .cmp(&a.is_starred)
        .then_with(|| priority_rank(b.priority).cmp(&priority_rank(a.priority)))
        .then_with(|| b.created_at.cmp(&a.created_at))
}

/// Filtered tasks in one column, sorted for display.
///
/// The sort is stable, so tasks equal on every key keep collection order.
pub fn tasks_by_status<'a>(
    tasks: &'a [Task],
    status: TaskStatus,
    filter: &TaskFilter,
) -> Vec<&'a Task> {
    let mut column: Vec<&Task> = filtered_tasks(tasks, filter)
        .into_iter()
        .filter(|t| t.status == status)
        .collect();
    column.sort_by(|a, b| column_order(a, b));
    column
}

/// Counts over the whole, unfiltered collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub pending: usize,
}

pub fn task_stats(tasks: &[Task]) -> TaskStats {
    let mut stats = TaskStats {
        total: tasks.len(),
        ..Default::default()
    };
    for task in tasks {
        match task.status {
            TaskStatus::Done => stats.completed += 1,
            TaskStatus::InProgress => stats.in_progress += 1,
            TaskStatus::ToDo => stats.pending += 1,
        }
    }
    stats
}

/// Percentage of tasks done, rounded half away from zero.
/// `None` for an empty collection.
pub fn progress_percent(stats: &TaskStats) -> Option<u8> {
    if stats.total == 0 {
        return None;
    }
    let pct = (stats.completed as f64 / stats.total as f64 * 100.0).round();
    Some(pct as u8)
}

/// Per-column counts of the filtered collection, as shown in column headers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnCounts {
    pub to_do: usize,
    pub in_progress: usize,
    pub done: usize,
}

impl ColumnCounts {
    pub fn get(&self, status: TaskStatus) -> usize {
        match status {
            TaskStatus::ToDo => self.to_do,
            TaskStatus::InProgress => self.in_progress,
            TaskStatus::Done => self.done,
        }
    }
}

pub fn column_counts(tasks: &[Task], filter: &TaskFilter) -> ColumnCounts {
    let mut counts = ColumnCounts::default();
    for task in filtered_tasks(tasks, filter) {
        match task.status {
            TaskStatus::ToDo => counts.to_do += 1,
            TaskStatus::InProgress => counts.in_progress += 1,
            TaskStatus::Done => counts.done += 1,
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::filter::PriorityFilter;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn at(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    fn task(id: u64, text: &str, priority: Priority, minutes: i64) -> Task {
        Task::new(id, text, priority, at(minutes))
    }

    fn ids(tasks: &[&Task]) -> Vec<u64> {
        tasks.iter().map(|t| t.id).collect()
    }

    #[test]
    fn star_then_priority_then_newest() {
        // A: unstarred Low t1, B: starred Low t0, C: unstarred High t2
        let a = task(1, "A", Priority::Low, 1);
        let mut b = task(2, "B", Priority::Low, 0);
        b.is_starred = true;
        let c = task(3, "C", Priority::High, 2);
        let tasks = vec![a, b, c];

        let column = tasks_by_status(&tasks, TaskStatus::ToDo, &TaskFilter::all());
        assert_eq!(ids(&column), vec![2, 3, 1]);
    }

    #[test]
    fn newer_first_within_same_priority() {
        let tasks = vec![
            task(1, "old", Priority::Medium, 0),
            task(2, "new", Priority::Medium, 10),
            task(3, "mid", Priority::Medium, 5),
        ];
        let column = tasks_by_status(&tasks, TaskStatus::ToDo, &TaskFilter::all());
        assert_eq!(ids(&column), vec![2, 3, 1]);
    }

    #[test]
    fn identical_timestamps_keep_collection_order() {
        let tasks = vec![
            task(5, "first", Priority::Low, 3),
            task(4, "second", Priority::Low, 3),
            task(6, "third", Priority::Low, 3),
        ];
        let column = tasks_by_status(&tasks, TaskStatus::ToDo, &TaskFilter::all());
        assert_eq!(ids(&column), vec![5, 4, 6]);
    }

    #[test]
    fn column_only_contains_its_status() {
        let mut tasks = vec![
            task(1, "a", Priority::Low, 0),
            task(2, "b", Priority::Low, 1),
            task(3, "c", Priority::Low, 2),
        ];
        tasks[1].status = TaskStatus::Done;
        tasks[2].status = TaskStatus::InProgress;

        let all = TaskFilter::all();
        assert_eq!(ids(&tasks_by_status(&tasks, TaskStatus::ToDo, &all)), vec![1]);
        assert_eq!(ids(&tasks_by_status(&tasks, TaskStatus::InProgress, &all)), vec![3]);
        assert_eq!(ids(&tasks_by_status(&tasks, TaskStatus::Done, &all)), vec![2]);
    }

    #[test]
    fn search_matches_text() {
        let tasks = vec![
            task(1, "Finish report", Priority::Medium, 0),
            task(2, "Buy milk", Priority::Medium, 1),
        ];
        let filter = TaskFilter::new("report", PriorityFilter::All);
        assert_eq!(ids(&filtered_tasks(&tasks, &filter)), vec![1]);
    }

    #[test]
    fn search_is_case_insensitive_and_checks_category() {
        let mut groceries = task(2, "Buy milk", Priority::Low, 1);
        groceries.category = Some("Errands".into());
        let tasks = vec![task(1, "Finish REPORT", Priority::High, 0), groceries];

        let filter = TaskFilter::new("rePort", PriorityFilter::All);
        assert_eq!(ids(&filtered_tasks(&tasks, &filter)), vec![1]);

        let filter = TaskFilter::new("errand", PriorityFilter::All);
        assert_eq!(ids(&filtered_tasks(&tasks, &filter)), vec![2]);
    }

    #[test]
    fn empty_search_matches_everything() {
        let tasks = vec![
            task(1, "one", Priority::Low, 0),
            task(2, "two", Priority::High, 1),
        ];
        assert_eq!(ids(&filtered_tasks(&tasks, &TaskFilter::all())), vec![1, 2]);
    }

    #[test]
    fn priority_filter_combines_with_search() {
        let tasks = vec![
            task(1, "Report draft", Priority::Low, 0),
            task(2, "Report final", Priority::High, 1),
            task(3, "Groceries", Priority::High, 2),
        ];
        let filter = TaskFilter::new("report", PriorityFilter::Only(Priority::High));
        assert_eq!(ids(&filtered_tasks(&tasks, &filter)), vec![2]);

        let filter = TaskFilter::new("", PriorityFilter::Only(Priority::High));
        assert_eq!(ids(&filtered_tasks(&tasks, &filter)), vec![2, 3]);
    }

    #[test]
    fn stats_count_unfiltered_collection() {
        let mut tasks = vec![
            task(1, "a", Priority::Low, 0),
            task(2, "b", Priority::Low, 1),
            task(3, "c", Priority::Low, 2),
            task(4, "d", Priority::Low, 3),
        ];
        tasks[2].status = TaskStatus::InProgress;
        tasks[3].status = TaskStatus::Done;

        let stats = task_stats(&tasks);
        assert_eq!(
            stats,
            TaskStats {
                total: 4,
                completed: 1,
                in_progress: 1,
                pending: 2,
            }
        );
        assert_eq!(stats.total, stats.completed + stats.in_progress + stats.pending);
    }

    #[test]
    fn progress_guards_empty_collection() {
        assert_eq!(progress_percent(&task_stats(&[])), None);
        let stats = TaskStats {
            total: 2,
            completed: 1,
            ..Default::default()
        };
        assert_eq!(progress_percent(&stats), Some(50));
        let stats = TaskStats {
            total: 3,
            completed: 2,
            ..Default::default()
        };
        assert_eq!(progress_percent(&stats), Some(67));
    }

    #[test]
    fn column_counts_follow_filter() {
        let mut tasks = vec![
            task(1, "Report", Priority::Low, 0),
            task(2, "Report", Priority::Low, 1),
            task(3, "Other", Priority::Low, 2),
        ];
        tasks[1].status = TaskStatus::Done;
        let counts = column_counts(&tasks, &TaskFilter::new("report", PriorityFilter::All));
        assert_eq!(counts.get(TaskStatus::ToDo), 1);
        assert_eq!(counts.get(TaskStatus::Done), 1);
        assert_eq!(counts.get(TaskStatus::InProgress), 0);
    }
}
