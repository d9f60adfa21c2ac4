use crate::model::task::Task;
use crate::parse::{FIELD_DELIMITER, LIST_DELIMITER};

/// Serialize a list of tasks, one line per task, in list order
pub fn serialize_tasks(tasks: &[Task]) -> Vec<String> {
    tasks.iter().map(serialize_task).collect()
}

/// Encode one task as a single line (no trailing newline).
///
/// Field order: description, date, priority, progress, subtasks, notes,
/// attachments, status, created, last modified. Absent optional fields are
/// written as empty fields.
pub fn serialize_task(task: &Task) -> String {
    let list = LIST_DELIMITER.to_string();
    let progress = task.progress.to_string();
    let subtasks = task.subtasks.join(list.as_str());
    let attachments = task.attachments.join(list.as_str());

    let fields: [&str; 10] = [
        &task.description,
        &task.date,
        task.priority.as_str(),
        &progress,
        &subtasks,
        task.notes.as_deref().unwrap_or(""),
        &attachments,
        task.status().as_str(),
        task.created_timestamp(),
        task.last_modified_timestamp().unwrap_or(""),
    ];
    fields.join(FIELD_DELIMITER.to_string().as_str())
}
