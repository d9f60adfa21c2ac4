use crate::model::task::{Priority, Task, TaskDetails};
use crate::parse::{FIELD_DELIMITER, LIST_DELIMITER, NONE_SENTINEL};
use crate::util::clock::is_valid_date;

/// Error type for task operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    #[error("{0}")]
    Validation(String),
    #[error("no task at position {} (list has {len})", .index + 1)]
    Index { index: usize, len: usize },
}

impl TaskError {
    fn invalid(message: impl Into<String>) -> Self {
        TaskError::Validation(message.into())
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

pub fn validate_date(date: &str) -> Result<(), TaskError> {
    if is_valid_date(date) {
        Ok(())
    } else {
        Err(TaskError::invalid(format!(
            "invalid date {:?}: expected YYYY-MM-DD",
            date
        )))
    }
}

pub fn validate_progress(progress: i32) -> Result<u8, TaskError> {
    u8::try_from(progress)
        .ok()
        .filter(|p| *p <= 100)
        .ok_or_else(|| {
            TaskError::invalid(format!("progress must be between 0 and 100, got {}", progress))
        })
}

/// A free-text field must fit on one line and not contain the field delimiter
fn validate_text(what: &str, value: &str) -> Result<(), TaskError> {
    if value.contains(FIELD_DELIMITER) || value.contains(['\n', '\r']) {
        return Err(TaskError::invalid(format!(
            "{} may not contain '{}' or line breaks",
            what, FIELD_DELIMITER
        )));
    }
    Ok(())
}

/// Trim a description and check it is non-empty and storable
pub fn validate_description(description: &str) -> Result<String, TaskError> {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return Err(TaskError::invalid("description is required"));
    }
    validate_text("description", trimmed)?;
    Ok(trimmed.to_string())
}

/// Drop empty elements and reject ones that cannot be stored
fn clean_list(what: &str, items: Vec<String>) -> Result<Vec<String>, TaskError> {
    let mut cleaned = Vec::with_capacity(items.len());
    for item in items {
        if item.is_empty() {
            continue;
        }
        validate_text(what, &item)?;
        if item.contains(LIST_DELIMITER) {
            return Err(TaskError::invalid(format!(
                "{} may not contain '{}'",
                what, LIST_DELIMITER
            )));
        }
        cleaned.push(item);
    }
    Ok(cleaned)
}

/// Validate a whole detail snapshot, returning it cleaned plus the progress
pub fn validate_details(mut details: TaskDetails) -> Result<(TaskDetails, u8), TaskError> {
    validate_date(&details.date)?;
    let progress = validate_progress(details.progress)?;
    if let Some(ref notes) = details.notes {
        validate_text("notes", notes)?;
        // Reads back as no notes
        if notes == NONE_SENTINEL {
            return Err(TaskError::invalid(format!(
                "notes may not be just {:?}",
                NONE_SENTINEL
            )));
        }
    }
    details.subtasks = clean_list("subtask", details.subtasks)?;
    details.attachments = clean_list("attachment", details.attachments)?;
    Ok((details, progress))
}

fn check_index(tasks: &[Task], index: usize) -> Result<(), TaskError> {
    if index < tasks.len() {
        Ok(())
    } else {
        Err(TaskError::Index {
            index,
            len: tasks.len(),
        })
    }
}

// ---------------------------------------------------------------------------
// List operations
// ---------------------------------------------------------------------------

/// Append a new task. Returns its index.
pub fn add_task(
    tasks: &mut Vec<Task>,
    description: &str,
    date: &str,
    priority: Priority,
    created: String,
) -> Result<usize, TaskError> {
    let description = validate_description(description)?;
    validate_date(date)?;
    tasks.push(Task::new(description, date.to_string(), priority, created));
    Ok(tasks.len() - 1)
}

pub fn edit_description(
    tasks: &mut [Task],
    index: usize,
    description: &str,
) -> Result<(), TaskError> {
    check_index(tasks, index)?;
    let description = validate_description(description)?;
    tasks[index].description = description;
    Ok(())
}

/// Replace the detail fields of one task and stamp it with `now`
pub fn edit_details(
    tasks: &mut [Task],
    index: usize,
    details: TaskDetails,
    now: String,
) -> Result<(), TaskError> {
    check_index(tasks, index)?;
    let (details, progress) = validate_details(details)?;
    tasks[index].apply_details(details, progress, now);
    Ok(())
}

pub fn complete_task(tasks: &mut [Task], index: usize) -> Result<(), TaskError> {
    check_index(tasks, index)?;
    tasks[index].mark_completed();
    Ok(())
}

pub fn delete_task(tasks: &mut Vec<Task>, index: usize) -> Result<Task, TaskError> {
    check_index(tasks, index)?;
    Ok(tasks.remove(index))
}

/// Swap with the predecessor. `Ok(false)` when already first.
pub fn move_up(tasks: &mut [Task], index: usize) -> Result<bool, TaskError> {
    check_index(tasks, index)?;
    if index == 0 {
        return Ok(false);
    }
    tasks.swap(index, index - 1);
    Ok(true)
}

/// Swap with the successor. `Ok(false)` when already last.
pub fn move_down(tasks: &mut [Task], index: usize) -> Result<bool, TaskError> {
    check_index(tasks, index)?;
    if index + 1 == tasks.len() {
        return Ok(false);
    }
    tasks.swap(index, index + 1);
    Ok(true)
}
