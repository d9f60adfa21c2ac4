use crate::io::prompt::{FilePicker, Prompt};
use crate::io::store::{StoreError, TaskListStore};
use crate::model::task::TaskDetails;
use crate::ops::task_ops::TaskError;

/// Edits a copy of one task's details. Nothing reaches the store until
/// [`DetailSession::confirm`]; dropping the session discards the edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailSession {
    index: usize,
    draft: TaskDetails,
}

impl DetailSession {
    /// Snapshot the task at `index`
    pub fn open(store: &TaskListStore, index: usize) -> Result<Self, TaskError> {
        let task = store.get(index).ok_or(TaskError::Index {
            index,
            len: store.len(),
        })?;
        Ok(DetailSession {
            index,
            draft: task.details(),
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn draft(&self) -> &TaskDetails {
        &self.draft
    }

    pub fn set_progress(&mut self, progress: i32) {
        self.draft.progress = progress;
    }

    pub fn set_date(&mut self, date: impl Into<String>) {
        self.draft.date = date.into();
    }

    /// An empty string clears the notes
    pub fn set_notes(&mut self, notes: impl Into<String>) {
        let notes = notes.into();
        self.draft.notes = if notes.is_empty() { None } else { Some(notes) };
    }

    pub fn add_subtask(&mut self, subtask: impl Into<String>) {
        self.draft.subtasks.push(subtask.into());
    }

    pub fn remove_subtask(&mut self, position: usize) -> Result<String, TaskError> {
        remove_at(&mut self.draft.subtasks, position)
    }

    pub fn add_attachment(&mut self, path: impl Into<String>) {
        self.draft.attachments.push(path.into());
    }

    pub fn remove_attachment(&mut self, position: usize) -> Result<String, TaskError> {
        remove_at(&mut self.draft.attachments, position)
    }

    /// Ask for a subtask; returns whether one was added
    pub fn prompt_subtask(&mut self, prompt: &mut dyn Prompt) -> bool {
        match prompt.prompt_string("Add Subtask", "Enter subtask:") {
            Some(subtask) => {
                self.add_subtask(subtask);
                true
            }
            None => false,
        }
    }

    /// Ask for a file to attach; returns whether one was added
    pub fn pick_attachment(&mut self, picker: &mut dyn FilePicker) -> bool {
        match picker.pick_file() {
            Some(path) => {
                self.add_attachment(path.display().to_string());
                true
            }
            None => false,
        }
    }

    /// Submit the draft as a whole-record detail edit
    pub fn confirm(self, store: &mut TaskListStore) -> Result<(), StoreError> {
        store.edit_details(self.index, self.draft)
    }
}

fn remove_at(items: &mut Vec<String>, position: usize) -> Result<String, TaskError> {
    if position < items.len() {
        Ok(items.remove(position))
    } else {
        Err(TaskError::Index {
            index: position,
            len: items.len(),
        })
    }
}
