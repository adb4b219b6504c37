use crossterm::style::{Color, Stylize};
use serde::Serialize;

use crate::cli::theme::Palette;
use crate::io::kv::KeyValueStore;
use crate::model::filter::TaskFilter;
use crate::model::task::{Task, TaskStatus};
use crate::model::theme::ThemeName;
use crate::ops::board::TaskStats;
use crate::store::TaskStore;
use crate::util::unicode::{pad_to_width, single_line};

const PROGRESS_BAR_CELLS: usize = 20;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct BoardJson<'a> {
    pub theme: ThemeName,
    pub stats: TaskStats,
    pub progress: Option<u8>,
    pub columns: Vec<ColumnJson<'a>>,
}

#[derive(Serialize)]
pub struct ColumnJson<'a> {
    pub status: TaskStatus,
    pub count: usize,
    pub tasks: Vec<&'a Task>,
}

#[derive(Serialize)]
pub struct StatsJson {
    #[serde(flatten)]
    pub stats: TaskStats,
    pub progress: Option<u8>,
}

#[derive(Serialize)]
pub struct ThemeJson {
    pub theme: ThemeName,
    pub available: Vec<ThemeName>,
}

pub fn board_json<'a, S: KeyValueStore>(
    store: &'a TaskStore<S>,
    filter: &TaskFilter,
) -> BoardJson<'a> {
    let counts = store.column_counts(filter);
    BoardJson {
        theme: store.theme(),
        stats: store.stats(),
        progress: store.progress_percent(),
        columns: TaskStatus::ALL
            .iter()
            .map(|&status| ColumnJson {
                status,
                count: counts.get(status),
                tasks: store.tasks_by_status(status, filter),
            })
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Text rendering
// ---------------------------------------------------------------------------

/// Formats board text, colored with a theme palette or plain
pub struct Renderer {
    palette: Option<Palette>,
    max_text_width: usize,
}

impl Renderer {
    pub fn new(theme: ThemeName, color: bool, max_text_width: usize) -> Self {
        Renderer {
            palette: color.then(|| Palette::for_theme(theme)),
            max_text_width,
        }
    }

    /// No escape codes, for pipes and tests
    pub fn plain(max_text_width: usize) -> Self {
        Renderer {
            palette: None,
            max_text_width,
        }
    }

    fn paint(&self, text: &str, pick: impl Fn(&Palette) -> Color) -> String {
        match &self.palette {
            Some(p) => text.with(pick(p)).to_string(),
            None => text.to_string(),
        }
    }

    fn heading(&self, text: &str, pick: impl Fn(&Palette) -> Color) -> String {
        match &self.palette {
            Some(p) => text.with(pick(p)).bold().to_string(),
            None => text.to_string(),
        }
    }
}

/// Message shown in a column with no (matching) tasks
pub fn empty_column_message(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::ToDo => "No pending tasks",
        TaskStatus::InProgress => "No active tasks",
        TaskStatus::Done => "No completed tasks",
    }
}

/// One task on one line: star, id, text, priority badge, category.
/// `id_width` aligns the ids within a listing.
pub fn format_task_line(task: &Task, r: &Renderer, id_width: usize, show_status: bool) -> String {
    let star = if task.is_starred {
        r.paint("\u{2605}", |p| p.star)
    } else {
        " ".to_string()
    };
    let id = pad_to_width(&format!("#{}", task.id), id_width);
    let text = single_line(&task.text, r.max_text_width);
    let text = match (&r.palette, task.status) {
        (Some(p), TaskStatus::Done) => text.as_str().with(p.dim).crossed_out().to_string(),
        _ => r.paint(&text, |p| p.text),
    };
    let badge = format!("[{}]", task.priority);

    let mut line = format!(
        "{} {} {} {}",
        star,
        r.paint(&id, |p| p.dim),
        text,
        r.paint(&badge, |p| p.priority(task.priority)),
    );
    if let Some(category) = &task.category {
        line.push(' ');
        line.push_str(&r.paint(&format!("({})", category), |p| p.dim));
    }
    if show_status {
        let status = r.paint(task.status.label(), |p| p.status(task.status));
        line.push_str(&format!(" \u{00b7} {}", status));
    }
    line
}

/// Width of the widest `#id` among `tasks`
pub fn id_column_width(tasks: &[&Task]) -> usize {
    tasks
        .iter()
        .map(|t| format!("#{}", t.id).len())
        .max()
        .unwrap_or(0)
}

pub fn format_stats(stats: &TaskStats) -> String {
    format!(
        "Total {} \u{00b7} Completed {} \u{00b7} In Progress {} \u{00b7} Pending {}",
        stats.total, stats.completed, stats.in_progress, stats.pending
    )
}

pub fn format_progress(percent: u8, r: &Renderer) -> String {
    let filled = (percent as usize * PROGRESS_BAR_CELLS + 50) / 100;
    let bar = format!(
        "{}{}",
        "#".repeat(filled),
        "-".repeat(PROGRESS_BAR_CELLS - filled)
    );
    format!(
        "Progress {}% Complete [{}]",
        percent,
        r.paint(&bar, |p| p.green)
    )
}

/// Describe a non-default filter, e.g. `Filter: "report", High Priority`
pub fn format_filter(filter: &TaskFilter) -> Option<String> {
    if *filter == TaskFilter::default() {
        return None;
    }
    let mut parts = Vec::new();
    if !filter.search.is_empty() {
        parts.push(format!("\"{}\"", filter.search));
    }
    parts.push(filter.priority.to_string());
    Some(format!("Filter: {}", parts.join(", ")))
}

/// Header plus sorted tasks (or the empty message) for one column
pub fn format_column(
    status: TaskStatus,
    tasks: &[&Task],
    r: &Renderer,
    id_width: usize,
) -> Vec<String> {
    let mut lines = vec![r.heading(
        &format!("{} ({})", status.label(), tasks.len()),
        |p| p.status(status),
    )];
    if tasks.is_empty() {
        lines.push(format!("  {}", r.paint(empty_column_message(status), |p| p.dim)));
    } else {
        for task in tasks {
            lines.push(format!("  {}", format_task_line(task, r, id_width, false)));
        }
    }
    lines
}

/// The whole board: stats, progress, and the three sorted columns
pub fn format_board<S: KeyValueStore>(
    store: &TaskStore<S>,
    filter: &TaskFilter,
    r: &Renderer,
    show_progress: bool,
) -> Vec<String> {
    if store.tasks().is_empty() {
        return vec![
            r.heading("Ready to be productive?", |p| p.accent),
            "Start by adding your first task: te add \"Plan the week\"".to_string(),
        ];
    }

    let mut lines = vec![format_stats(&store.stats())];
    if show_progress {
        if let Some(pct) = store.progress_percent() {
            lines.push(format_progress(pct, r));
        }
    }
    if let Some(desc) = format_filter(filter) {
        lines.push(desc);
    }

    let columns: Vec<(TaskStatus, Vec<&Task>)> = TaskStatus::ALL
        .iter()
        .map(|&status| (status, store.tasks_by_status(status, filter)))
        .collect();
    let id_width = columns
        .iter()
        .map(|(_, tasks)| id_column_width(tasks))
        .max()
        .unwrap_or(0);

    for (status, tasks) in &columns {
        lines.push(String::new());
        lines.extend(format_column(*status, tasks, r, id_width));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::kv::MemoryStore;
    use crate::model::filter::PriorityFilter;
    use crate::model::task::{NewTask, Priority};
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use insta::assert_snapshot;

    fn t(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 3, 10, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    fn sample_store() -> TaskStore<MemoryStore> {
        let mut store = TaskStore::open(MemoryStore::new());
        store.add_task_at(NewTask::new("Buy milk"), t(0));
        store.add_task_at(
            NewTask::new("Finish report")
                .priority(Priority::High)
                .category("work"),
            t(1),
        );
        store.add_task_at(NewTask::new("Pay rent").priority(Priority::Low), t(2));
        store.toggle_star(2);
        store.set_status(3, TaskStatus::Done);
        store
    }

    #[test]
    fn test_board_plain() {
        let store = sample_store();
        let lines = format_board(&store, &TaskFilter::all(), &Renderer::plain(60), true);
        assert_snapshot!(lines.join("\n"), @r"
        Total 3 · Completed 1 · In Progress 0 · Pending 2
        Progress 33% Complete [#######-------------]

        To Do (2)
          ★ #2 Finish report [High] (work)
            #1 Buy milk [Medium]

        In Progress (0)
          No active tasks

        Done (1)
            #3 Pay rent [Low]
        ");
    }

    #[test]
    fn test_board_empty_store() {
        let store = TaskStore::open(MemoryStore::new());
        let lines = format_board(&store, &TaskFilter::all(), &Renderer::plain(60), true);
        assert_eq!(lines[0], "Ready to be productive?");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_board_with_filter() {
        let store = sample_store();
        let filter = TaskFilter::new("milk", PriorityFilter::All);
        let lines = format_board(&store, &filter, &Renderer::plain(60), false);
        assert_eq!(lines[1], "Filter: \"milk\", All Priorities");
        assert!(lines.contains(&"To Do (1)".to_string()));
        assert!(lines.contains(&"Done (0)".to_string()));
        assert!(lines.contains(&"  No completed tasks".to_string()));
        assert!(!lines.iter().any(|l| l.starts_with("Progress")));
    }

    #[test]
    fn test_task_line_truncates_and_shows_status() {
        let store = sample_store();
        let task = store.task(2).unwrap();
        let line = format_task_line(task, &Renderer::plain(8), 2, true);
        assert_eq!(line, "\u{2605} #2 Finish \u{2026} [High] (work) \u{00b7} To Do");
    }

    #[test]
    fn test_progress_bar() {
        let r = Renderer::plain(60);
        assert_eq!(
            format_progress(50, &r),
            "Progress 50% Complete [##########----------]"
        );
        assert_eq!(
            format_progress(100, &r),
            "Progress 100% Complete [####################]"
        );
        assert_eq!(
            format_progress(0, &r),
            "Progress 0% Complete [--------------------]"
        );
    }

    #[test]
    fn test_colored_output_has_escapes() {
        let store = sample_store();
        let r = Renderer::new(ThemeName::Ocean, true, 60);
        let line = format_task_line(store.task(1).unwrap(), &r, 2, false);
        assert!(line.contains('\u{1b}'));
        assert!(line.contains("Buy milk"));
    }

    #[test]
    fn test_board_json_shape() {
        let store = sample_store();
        let json = serde_json::to_value(board_json(&store, &TaskFilter::all())).unwrap();
        assert_eq!(json["theme"], "light");
        assert_eq!(json["stats"]["total"], 3);
        assert_eq!(json["stats"]["inProgress"], 0);
        assert_eq!(json["progress"], 33);
        assert_eq!(json["columns"][0]["status"], "To Do");
        assert_eq!(json["columns"][0]["count"], 2);
        assert_eq!(json["columns"][0]["tasks"][0]["id"], 2);
        assert_eq!(json["columns"][2]["tasks"][0]["text"], "Pay rent");
    }
}
