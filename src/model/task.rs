use serde::{Deserialize, Serialize};

/// `YYYY-MM-DD`, the format of a task's due date
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// `YYYY-MM-DD HH:MM:SS`, the format of creation and modification stamps
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Task priority, also used to pick the display color
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl Priority {
    /// The stored spelling (`Low`, `Medium`, `High`)
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }

    /// Parse a priority name, ignoring case
    pub fn parse_priority(s: &str) -> Option<Priority> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Completion status. Only ever moves from `Incomplete` to `Completed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    Incomplete,
    Completed,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Incomplete => "Incomplete",
            TaskStatus::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// One task in a category list.
///
/// The creation stamp and the status are private: the creation stamp is fixed
/// when the task is built, and the status can only be advanced through
/// [`Task::mark_completed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// What the task is about
    pub description: String,
    /// Due date, `YYYY-MM-DD`
    pub date: String,
    pub priority: Priority,
    /// Percent done, 0..=100
    pub progress: u8,
    /// Subtask titles in insertion order
    pub subtasks: Vec<String>,
    pub notes: Option<String>,
    /// Attached file paths in insertion order
    pub attachments: Vec<String>,
    status: TaskStatus,
    created_timestamp: String,
    last_modified_timestamp: Option<String>,
}

/// The fields a detail-editing session may replace in one go
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDetails {
    /// Signed so that out-of-range input reaches validation instead of
    /// failing earlier in a conversion.
    pub progress: i32,
    pub date: String,
    pub subtasks: Vec<String>,
    pub notes: Option<String>,
    pub attachments: Vec<String>,
}

impl Task {
    /// Create a fresh task with default progress, status and lists.
    /// `created_timestamp` is already formatted with [`TIMESTAMP_FORMAT`].
    pub fn new(
        description: String,
        date: String,
        priority: Priority,
        created_timestamp: String,
    ) -> Self {
        Task {
            description,
            date,
            priority,
            progress: 0,
            subtasks: Vec::new(),
            notes: None,
            attachments: Vec::new(),
            status: TaskStatus::Incomplete,
            created_timestamp,
            last_modified_timestamp: None,
        }
    }

    /// Rebuild a task whose status and stamps were read back from storage
    pub(crate) fn restore(
        mut task: Task,
        status: TaskStatus,
        last_modified_timestamp: Option<String>,
    ) -> Self {
        task.status = status;
        task.last_modified_timestamp = last_modified_timestamp;
        task
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    pub fn created_timestamp(&self) -> &str {
        &self.created_timestamp
    }

    pub fn last_modified_timestamp(&self) -> Option<&str> {
        self.last_modified_timestamp.as_deref()
    }

    /// Mark the task completed. Calling it again is harmless.
    pub fn mark_completed(&mut self) {
        self.status = TaskStatus::Completed;
    }

    /// Snapshot the detail fields for an editing session
    pub fn details(&self) -> TaskDetails {
        TaskDetails {
            progress: i32::from(self.progress),
            date: self.date.clone(),
            subtasks: self.subtasks.clone(),
            notes: self.notes.clone(),
            attachments: self.attachments.clone(),
        }
    }

    /// Replace the detail fields and stamp the modification time.
    /// The caller has already validated `details`.
    pub(crate) fn apply_details(&mut self, details: TaskDetails, progress: u8, now: String) {
        self.progress = progress;
        self.date = details.date;
        self.subtasks = details.subtasks;
        self.notes = details.notes.filter(|n| !n.is_empty());
        self.attachments = details.attachments;
        self.last_modified_timestamp = Some(now);
    }
}
