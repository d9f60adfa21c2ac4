use crossterm::style::{Color, Stylize};
use serde::Serialize;

use crate::model::config::UiConfig;
use crate::model::task::{Priority, Task, TaskStatus};
use crate::ops::search::{MatchField, SearchHit};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    pub position: usize,
    pub description: String,
    pub date: String,
    pub priority: Priority,
    pub progress: u8,
    pub subtasks: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub attachments: Vec<String>,
    pub status: TaskStatus,
    pub created: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
}

#[derive(Serialize)]
pub struct TaskListJson {
    pub category: String,
    pub tasks: Vec<TaskJson>,
}

#[derive(Serialize)]
pub struct CategoryJson {
    pub name: String,
    pub file: String,
    pub tasks: usize,
    pub completed: usize,
}

#[derive(Serialize)]
pub struct SearchHitJson {
    pub category: String,
    pub position: usize,
    pub field: MatchField,
    pub text: String,
}

/// `index` is zero-based; positions shown to users start at 1
pub fn task_to_json(index: usize, task: &Task) -> TaskJson {
    TaskJson {
        position: index + 1,
        description: task.description.clone(),
        date: task.date.clone(),
        priority: task.priority,
        progress: task.progress,
        subtasks: task.subtasks.clone(),
        notes: task.notes.clone(),
        attachments: task.attachments.clone(),
        status: task.status(),
        created: task.created_timestamp().to_string(),
        last_modified: task.last_modified_timestamp().map(str::to_string),
    }
}

pub fn hit_to_json(hit: &SearchHit) -> SearchHitJson {
    SearchHitJson {
        category: hit.category.clone(),
        position: hit.index + 1,
        field: hit.field,
        text: hit.text.clone(),
    }
}

// ---------------------------------------------------------------------------
// Display view
// ---------------------------------------------------------------------------

/// One line of the list view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    /// 1-based
    pub position: usize,
    pub label: String,
    pub priority: Priority,
    pub completed: bool,
}

/// Rows in stored order; completed tasks get a ` (Completed)` suffix
pub fn display_rows(tasks: &[Task]) -> Vec<DisplayRow> {
    tasks
        .iter()
        .enumerate()
        .map(|(i, task)| DisplayRow {
            position: i + 1,
            label: if task.is_completed() {
                format!("{} ({})", task.description, TaskStatus::Completed)
            } else {
                task.description.clone()
            },
            priority: task.priority,
            completed: task.is_completed(),
        })
        .collect()
}

/// Colors keyed by priority
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityColors {
    pub high: Color,
    pub medium: Color,
    pub low: Color,
}

impl Default for PriorityColors {
    fn default() -> Self {
        PriorityColors {
            high: Color::Red,
            medium: Color::Rgb {
                r: 0xFF,
                g: 0xA5,
                b: 0x00,
            },
            low: Color::Green,
        }
    }
}

fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb { r, g, b })
}

/// `#RRGGBB` or one of the basic color names
pub fn parse_color(value: &str) -> Option<Color> {
    let value = value.trim();
    if value.starts_with('#') {
        return parse_hex_color(value);
    }
    match value.to_ascii_lowercase().as_str() {
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "white" => Some(Color::White),
        "grey" | "gray" => Some(Color::Grey),
        "orange" => parse_hex_color("#FFA500"),
        _ => None,
    }
}

impl PriorityColors {
    /// Defaults with `[ui.priority_colors]` overrides applied
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut colors = PriorityColors::default();
        for (key, value) in &ui.priority_colors {
            let Some(color) = parse_color(value) else {
                tracing::warn!(key = %key, value = %value, "ignoring unknown color");
                continue;
            };
            match Priority::parse_priority(key) {
                Some(Priority::High) => colors.high = color,
                Some(Priority::Medium) => colors.medium = color,
                Some(Priority::Low) => colors.low = color,
                None => tracing::warn!(key = %key, "ignoring color for unknown priority"),
            }
        }
        colors
    }

    pub fn for_priority(&self, priority: Priority) -> Color {
        match priority {
            Priority::High => self.high,
            Priority::Medium => self.medium,
            Priority::Low => self.low,
        }
    }
}

/// Plain text for one row
pub fn format_row(row: &DisplayRow) -> String {
    format!("{:>3}  {:<6}  {}", row.position, row.priority, row.label)
}

/// A row colored by its priority
pub fn format_row_colored(row: &DisplayRow, colors: &PriorityColors) -> String {
    format_row(row)
        .with(colors.for_priority(row.priority))
        .to_string()
}

/// Detailed view of one task
pub fn format_task_detail(index: usize, task: &Task) -> Vec<String> {
    let mut lines = vec![
        format!("#{} {}", index + 1, task.description),
        format!("  date:       {}", task.date),
        format!("  priority:   {}", task.priority),
        format!("  progress:   {}%", task.progress),
        format!("  status:     {}", task.status()),
        format!("  created:    {}", task.created_timestamp()),
    ];
    if let Some(modified) = task.last_modified_timestamp() {
        lines.push(format!("  modified:   {}", modified));
    }
    if let Some(ref notes) = task.notes {
        lines.push(format!("  notes:      {}", notes));
    }
    if !task.subtasks.is_empty() {
        lines.push("  subtasks:".to_string());
        for (i, subtask) in task.subtasks.iter().enumerate() {
            lines.push(format!("    {}. {}", i + 1, subtask));
        }
    }
    if !task.attachments.is_empty() {
        lines.push("  attachments:".to_string());
        for (i, path) in task.attachments.iter().enumerate() {
            lines.push(format!("    {}. {}", i + 1, path));
        }
    }
    lines
}

pub fn format_search_hit(hit: &SearchHit) -> String {
    let field = match hit.field {
        MatchField::Description => "description",
        MatchField::Notes => "notes",
        MatchField::Subtask => "subtask",
    };
    format!("{} #{} [{}] {}", hit.category, hit.index + 1, field, hit.text)
}
