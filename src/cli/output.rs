use chrono::Local;
use serde::Serialize;

use crate::model::task::{Collection, Task};
use crate::model::theme::{Palette, ThemePreference};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

/// A task as printed by `--json`: the stored record plus where it sits
#[derive(Serialize)]
pub struct TaskJson<'a> {
    pub position: usize,
    pub collection: Collection,
    #[serde(flatten)]
    pub task: &'a Task,
}

#[derive(Serialize)]
pub struct ListJson<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<Vec<TaskJson<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived: Option<Vec<TaskJson<'a>>>,
}

#[derive(Serialize)]
pub struct ThemeJson<'a> {
    pub name: &'a str,
    pub palette: Palette,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn tasks_to_json(tasks: &[Task], collection: Collection) -> Vec<TaskJson<'_>> {
    tasks
        .iter()
        .enumerate()
        .map(|(i, task)| TaskJson {
            position: i + 1,
            collection,
            task,
        })
        .collect()
}

pub fn theme_to_json(theme: &ThemePreference) -> ThemeJson<'_> {
    ThemeJson {
        name: theme.name(),
        palette: theme.palette(),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// One-line summary: position, checkbox, title, id, and completion time for
/// archived tasks
pub fn format_task_line(position: usize, task: &Task) -> String {
    match task.completed_at {
        Some(done) => format!(
            "{:>3}. [x] {}  ({}, done {})",
            position,
            task.title,
            task.id,
            done.with_timezone(&Local).format("%Y-%m-%d %H:%M")
        ),
        None => format!("{:>3}. [ ] {}  ({})", position, task.title, task.id),
    }
}

/// Lines for one collection, with a header and an empty-state line
pub fn format_task_list(collection: Collection, tasks: &[Task]) -> Vec<String> {
    let mut lines = vec![match collection {
        Collection::Active => format!("Tasks ({})", tasks.len()),
        Collection::Archived => format!("Archive ({})", tasks.len()),
    }];
    if tasks.is_empty() {
        lines.push(match collection {
            Collection::Active => "  No tasks yet. Add one with `tuck add <title>`.".to_string(),
            Collection::Archived => "  Nothing archived.".to_string(),
        });
    }
    lines.extend(
        tasks
            .iter()
            .enumerate()
            .map(|(i, task)| format_task_line(i + 1, task)),
    );
    lines
}

pub fn format_theme(theme: &ThemePreference) -> Vec<String> {
    let palette = theme.palette();
    vec![
        format!("theme: {}", theme.name()),
        format!("  background  {}", palette.bg_color),
        format!("  panel       {}", palette.panel_color),
        format!("  accent      {}", palette.accent_color),
        format!("  text        {}", palette.text_color),
    ]
}
