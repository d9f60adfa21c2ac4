use std::io;

use tracing::{debug, info, warn};

use crate::io::resource::TaskResource;
use crate::model::task::{Priority, Task, TaskDetails};
use crate::ops::task_ops::{self, TaskError};
use crate::parse::{self, LineError};
use crate::util::clock::Clock;

/// Error type for category store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Task(#[from] TaskError),
    #[error("could not load {resource}: {source}")]
    Format {
        resource: String,
        #[source]
        source: LineError,
    },
    #[error("could not read {resource}: {source}")]
    Read {
        resource: String,
        #[source]
        source: io::Error,
    },
    #[error("could not write {resource}: {source}")]
    Write {
        resource: String,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    /// Short machine-readable kind, used in JSON output
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::Task(TaskError::Validation(_)) => "validation",
            StoreError::Task(TaskError::Index { .. }) => "index",
            StoreError::Format { .. } => "format",
            StoreError::Read { .. } | StoreError::Write { .. } => "io",
        }
    }
}

/// The ordered task list of one category, kept in step with its resource.
///
/// Every successful mutation rewrites the whole resource. A failed write
/// leaves the in-memory change in place so [`TaskListStore::save`] can be
/// retried.
pub struct TaskListStore {
    category: String,
    resource: Box<dyn TaskResource>,
    clock: Box<dyn Clock>,
    tasks: Vec<Task>,
}

impl TaskListStore {
    /// An empty store; call [`TaskListStore::load`] to read the resource
    pub fn new(
        category: impl Into<String>,
        resource: Box<dyn TaskResource>,
        clock: Box<dyn Clock>,
    ) -> Self {
        TaskListStore {
            category: category.into(),
            resource,
            clock,
            tasks: Vec::new(),
        }
    }

    /// Construct and load in one step
    pub fn open(
        category: impl Into<String>,
        resource: Box<dyn TaskResource>,
        clock: Box<dyn Clock>,
    ) -> Result<Self, StoreError> {
        let mut store = TaskListStore::new(category, resource, clock);
        store.load()?;
        Ok(store)
    }

    /// Replace the in-memory list with the resource's content.
    /// A missing resource is an empty list. On error the list is unchanged.
    pub fn load(&mut self) -> Result<(), StoreError> {
        let lines = self
            .resource
            .read_lines()
            .map_err(|source| StoreError::Read {
                resource: self.resource.describe(),
                source,
            })?;

        let Some(lines) = lines else {
            self.tasks.clear();
            return Ok(());
        };

        match parse::parse_tasks(&lines, self.clock.as_ref()) {
            Ok(tasks) => {
                debug!(category = %self.category, count = tasks.len(), "loaded tasks");
                self.tasks = tasks;
                Ok(())
            }
            Err(err) => {
                warn!(
                    category = %self.category,
                    line = err.line,
                    error = %err.source,
                    "aborting load on unreadable line"
                );
                self.resource
                    .record_unreadable(err.line, &err.text, &err.source.to_string());
                Err(StoreError::Format {
                    resource: self.resource.describe(),
                    source: err,
                })
            }
        }
    }

    /// Rewrite the whole resource from the in-memory list
    pub fn save(&self) -> Result<(), StoreError> {
        let lines = parse::serialize_tasks(&self.tasks);
        self.resource
            .write_lines(&lines)
            .map_err(|source| {
                warn!(category = %self.category, error = %source, "save failed");
                StoreError::Write {
                    resource: self.resource.describe(),
                    source,
                }
            })?;
        debug!(category = %self.category, count = lines.len(), "saved tasks");
        Ok(())
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Append a new task. Returns its index.
    pub fn add(
        &mut self,
        description: &str,
        date: &str,
        priority: Priority,
    ) -> Result<usize, StoreError> {
        let index = task_ops::add_task(
            &mut self.tasks,
            description,
            date,
            priority,
            self.clock.timestamp(),
        )?;
        info!(category = %self.category, index, "task added");
        self.save()?;
        Ok(index)
    }

    pub fn edit_description(&mut self, index: usize, description: &str) -> Result<(), StoreError> {
        task_ops::edit_description(&mut self.tasks, index, description)?;
        self.save()
    }

    /// Replace the detail fields of one task and stamp its modification time
    pub fn edit_details(&mut self, index: usize, details: TaskDetails) -> Result<(), StoreError> {
        task_ops::edit_details(&mut self.tasks, index, details, self.clock.timestamp())?;
        self.save()
    }

    pub fn complete(&mut self, index: usize) -> Result<(), StoreError> {
        task_ops::complete_task(&mut self.tasks, index)?;
        info!(category = %self.category, index, "task completed");
        self.save()
    }

    /// Remove a task, returning it
    pub fn delete(&mut self, index: usize) -> Result<Task, StoreError> {
        let removed = task_ops::delete_task(&mut self.tasks, index)?;
        info!(category = %self.category, index, "task deleted");
        self.save()?;
        Ok(removed)
    }

    /// Returns `false` (and writes nothing) when the task is already first
    pub fn move_up(&mut self, index: usize) -> Result<bool, StoreError> {
        let moved = task_ops::move_up(&mut self.tasks, index)?;
        if moved {
            self.save()?;
        }
        Ok(moved)
    }

    /// Returns `false` (and writes nothing) when the task is already last
    pub fn move_down(&mut self, index: usize) -> Result<bool, StoreError> {
        let moved = task_ops::move_down(&mut self.tasks, index)?;
        if moved {
            self.save()?;
        }
        Ok(moved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::resource::MemoryResource;
    use crate::model::task::TaskStatus;
    use crate::util::clock::FixedClock;
    use pretty_assertions::assert_eq;
    use std::rc::Rc;

    fn store_with(resource: &MemoryResource) -> (TaskListStore, Rc<FixedClock>) {
        let clock = Rc::new(FixedClock::at("2024-05-01 09:00:00").unwrap());
        let store = TaskListStore::open(
            "Coding",
            Box::new(resource.clone()),
            Box::new(Rc::clone(&clock)),
        )
        .unwrap();
        (store, clock)
    }

    fn descriptions(store: &TaskListStore) -> Vec<&str> {
        store.tasks().iter().map(|t| t.description.as_str()).collect()
    }

    #[test]
    fn test_missing_resource_loads_empty() {
        let resource = MemoryResource::new();
        let (store, _) = store_with(&resource);
        assert!(store.is_empty());
        assert_eq!(resource.write_count(), 0);
    }

    #[test]
    fn test_load_preserves_file_order() {
        let resource = MemoryResource::with_lines([
            "b|2024-01-02|Low",
            "a|2024-01-01|High",
            "c|2024-01-03|Medium",
        ]);
        let (store, _) = store_with(&resource);
        assert_eq!(descriptions(&store), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_load_aborts_on_bad_line() {
        let resource = MemoryResource::with_lines([
            "ok|2024-01-01|Low",
            "bad|2024-01-01|Low|lots||||Incomplete|2024-01-01 00:00:00|",
        ]);
        let clock = FixedClock::at("2024-05-01 09:00:00").unwrap();
        let err = TaskListStore::open("Coding", Box::new(resource), Box::new(clock))
            .err()
            .unwrap();
        assert_eq!(err.kind(), "format");
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_end_to_end_add_complete_delete() {
        let resource = MemoryResource::new();
        let (mut store, _) = store_with(&resource);

        store.add("Write report", "2024-05-01", Priority::High).unwrap();
        let lines = resource.lines().unwrap();
        assert_eq!(
            lines,
            vec!["Write report|2024-05-01|High|0||||Incomplete|2024-05-01 09:00:00|"]
        );

        store.complete(0).unwrap();
        let reloaded = TaskListStore::open(
            "Coding",
            Box::new(resource.clone()),
            Box::new(FixedClock::at("2030-01-01 00:00:00").unwrap()),
        )
        .unwrap();
        assert_eq!(reloaded.tasks()[0].status(), TaskStatus::Completed);
        assert_eq!(reloaded.tasks()[0], store.tasks()[0]);

        store.delete(0).unwrap();
        assert_eq!(resource.lines(), Some(Vec::new()));
    }

    #[test]
    fn test_validation_failure_does_not_save() {
        let resource = MemoryResource::new();
        let (mut store, _) = store_with(&resource);

        let err = store.add("", "2024-01-01", Priority::Low).unwrap_err();
        assert_eq!(err.kind(), "validation");
        let err = store.add("x", "2024-13-40", Priority::Low).unwrap_err();
        assert_eq!(err.kind(), "validation");
        assert!(store.is_empty());
        assert_eq!(resource.write_count(), 0);
    }

    #[test]
    fn test_edit_details_stamps_modification_time() {
        let resource = MemoryResource::new();
        let (mut store, clock) = store_with(&resource);
        store.add("Refactor", "2024-05-02", Priority::Medium).unwrap();

        clock.advance(chrono::Duration::hours(2));
        let mut details = store.get(0).unwrap().details();
        details.progress = 50;
        details.subtasks.push("extract module".to_string());
        store.edit_details(0, details).unwrap();

        let task = store.get(0).unwrap();
        assert_eq!(task.progress, 50);
        assert_eq!(task.created_timestamp(), "2024-05-01 09:00:00");
        assert_eq!(task.last_modified_timestamp(), Some("2024-05-01 11:00:00"));
        assert_eq!(resource.write_count(), 2);
    }

    #[test]
    fn test_edit_details_rejects_progress_out_of_range() {
        let resource = MemoryResource::new();
        let (mut store, _) = store_with(&resource);
        store.add("Refactor", "2024-05-02", Priority::Medium).unwrap();

        let mut details = store.get(0).unwrap().details();
        details.progress = 150;
        let err = store.edit_details(0, details).unwrap_err();
        assert_eq!(err.kind(), "validation");
        assert_eq!(store.get(0).unwrap().progress, 0);
        assert_eq!(resource.write_count(), 1);
    }

    #[test]
    fn test_boundary_moves_do_not_save() {
        let resource = MemoryResource::new();
        let (mut store, _) = store_with(&resource);
        store.add("a", "2024-01-01", Priority::Low).unwrap();
        store.add("b", "2024-01-01", Priority::Low).unwrap();
        let writes = resource.write_count();

        assert!(!store.move_up(0).unwrap());
        assert!(!store.move_down(1).unwrap());
        assert_eq!(resource.write_count(), writes);

        assert!(store.move_down(0).unwrap());
        assert_eq!(descriptions(&store), vec!["b", "a"]);
        assert_eq!(resource.write_count(), writes + 1);

        assert_eq!(store.move_up(2).unwrap_err().kind(), "index");
    }

    #[test]
    fn test_failed_save_keeps_change_and_can_retry() {
        let resource = MemoryResource::new();
        let (mut store, _) = store_with(&resource);
        store.add("a", "2024-01-01", Priority::Low).unwrap();

        resource.set_fail_writes(true);
        let err = store.edit_description(0, "renamed").unwrap_err();
        assert_eq!(err.kind(), "io");
        assert_eq!(store.get(0).unwrap().description, "renamed");
        assert!(resource.lines().unwrap()[0].starts_with("a|"));

        resource.set_fail_writes(false);
        store.save().unwrap();
        assert!(resource.lines().unwrap()[0].starts_with("renamed|"));
    }

    #[test]
    fn test_save_twice_is_byte_identical() {
        let resource = MemoryResource::with_lines(["legacy|2024-01-01|High"]);
        let (store, _) = store_with(&resource);
        store.save().unwrap();
        let first = resource.lines();
        store.save().unwrap();
        assert_eq!(resource.lines(), first);
    }
}
