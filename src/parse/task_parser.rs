use tracing::{debug, warn};

use crate::model::task::{Priority, Task, TaskStatus};
use crate::parse::{FIELD_COUNT, FIELD_DELIMITER, LIST_DELIMITER, NONE_SENTINEL};
use crate::util::clock::Clock;

/// A stored line that cannot be turned back into a task
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("progress is not an integer: {value:?}")]
    InvalidProgress { value: String },
}

/// A [`FormatError`] located in a list of lines
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {source}")]
pub struct LineError {
    /// 1-based line number
    pub line: usize,
    /// The offending line as read
    pub text: String,
    pub source: FormatError,
}

/// Shapes a stored line has had over time, told apart by field count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaVersion {
    /// description, date, priority
    Legacy,
    /// Any other short line; missing trailing fields are blank
    Truncated(usize),
    /// All ten fields
    Current,
    /// More than ten fields; the extras are ignored
    Overlong(usize),
}

/// A default for a field missing from an older shape
#[derive(Debug, Clone, Copy)]
enum FieldDefault {
    Text(&'static str),
    Now,
}

/// Defaults for fields 4..=10 of a legacy (three-field) line
const LEGACY_DEFAULTS: [FieldDefault; FIELD_COUNT - 3] = [
    FieldDefault::Text("0"),
    FieldDefault::Text(""),
    FieldDefault::Text(""),
    FieldDefault::Text(""),
    FieldDefault::Text("Incomplete"),
    FieldDefault::Now,
    FieldDefault::Text(""),
];

impl SchemaVersion {
    pub fn detect(field_count: usize) -> SchemaVersion {
        match field_count {
            3 => SchemaVersion::Legacy,
            FIELD_COUNT => SchemaVersion::Current,
            n if n > FIELD_COUNT => SchemaVersion::Overlong(n),
            n => SchemaVersion::Truncated(n),
        }
    }

    /// Bring the raw fields of this shape up to the current ten-field shape
    fn upgrade(self, mut fields: Vec<String>, clock: &dyn Clock) -> Vec<String> {
        match self {
            SchemaVersion::Current => {}
            SchemaVersion::Legacy => {
                fields.extend(LEGACY_DEFAULTS.iter().map(|d| match d {
                    FieldDefault::Text(text) => text.to_string(),
                    FieldDefault::Now => clock.timestamp(),
                }));
            }
            SchemaVersion::Truncated(_) => fields.resize(FIELD_COUNT, String::new()),
            SchemaVersion::Overlong(n) => {
                warn!(fields = n, "ignoring extra fields in task line");
                fields.truncate(FIELD_COUNT);
            }
        }
        fields
    }
}

/// Parse every non-blank line into a task, preserving order.
/// Stops at the first line that fails to decode.
pub fn parse_tasks(lines: &[String], clock: &dyn Clock) -> Result<Vec<Task>, LineError> {
    let mut tasks = Vec::with_capacity(lines.len());
    for (idx, line) in lines.iter().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let task = parse_task(line, clock).map_err(|source| LineError {
            line: idx + 1,
            text: line.clone(),
            source,
        })?;
        tasks.push(task);
    }
    Ok(tasks)
}

/// Decode one stored line, accepting every historical shape.
///
/// Only a non-integer progress is an error. Everything else that is missing
/// or unrecognised falls back to a default.
pub fn parse_task(line: &str, clock: &dyn Clock) -> Result<Task, FormatError> {
    let raw: Vec<String> = line
        .trim()
        .split(FIELD_DELIMITER)
        .map(str::to_string)
        .collect();
    let version = SchemaVersion::detect(raw.len());
    if version != SchemaVersion::Current {
        debug!(?version, "upgrading task line");
    }

    let mut f = version.upgrade(raw, clock).into_iter();
    let mut next = || f.next().unwrap_or_default();

    let description = next();
    let date = next();
    let priority = parse_priority_field(&next());
    let progress = parse_progress_field(&next())?;
    let subtasks = split_list(&next());
    let notes = Some(next()).filter(|n| !n.is_empty() && n != NONE_SENTINEL);
    let attachments = split_list(&next());
    let status = parse_status_field(&next());
    let created = Some(next())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| clock.timestamp());
    let last_modified = Some(next()).filter(|m| !m.is_empty() && m != NONE_SENTINEL);

    let mut task = Task::new(description, date, priority, created);
    task.progress = progress;
    task.subtasks = subtasks;
    task.notes = notes;
    task.attachments = attachments;
    Ok(Task::restore(task, status, last_modified))
}

fn parse_priority_field(field: &str) -> Priority {
    Priority::parse_priority(field).unwrap_or_else(|| {
        if !field.is_empty() {
            warn!(value = field, "unknown priority, using Low");
        }
        Priority::Low
    })
}

fn parse_progress_field(field: &str) -> Result<u8, FormatError> {
    let value: i64 = field
        .trim()
        .parse()
        .map_err(|_| FormatError::InvalidProgress {
            value: field.to_string(),
        })?;
    if !(0..=100).contains(&value) {
        warn!(value, "progress out of range, clamping");
    }
    Ok(value.clamp(0, 100) as u8)
}

fn parse_status_field(field: &str) -> TaskStatus {
    if field.eq_ignore_ascii_case("Completed") {
        TaskStatus::Completed
    } else {
        if !field.is_empty() && !field.eq_ignore_ascii_case("Incomplete") {
            warn!(value = field, "unknown status, using Incomplete");
        }
        TaskStatus::Incomplete
    }
}

/// An empty field is an empty list
fn split_list(field: &str) -> Vec<String> {
    if field.is_empty() {
        Vec::new()
    } else {
        field.split(LIST_DELIMITER).map(str::to_string).collect()
    }
}
