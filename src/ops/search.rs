use std::ops::Range;

use regex::Regex;
use serde::Serialize;

use crate::model::task::Task;

/// Which field of a task matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchField {
    Description,
    Notes,
    Subtask,
}

/// A search hit in one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub category: String,
    /// Index of the task in its category list
    pub index: usize,
    pub field: MatchField,
    /// Matched text of the field
    pub text: String,
    pub spans: Vec<Range<usize>>,
}

/// Collect all non-overlapping match byte-ranges for a regex in the given text.
fn find_matches(re: &Regex, text: &str) -> Vec<Range<usize>> {
    re.find_iter(text).map(|m| m.start()..m.end()).collect()
}

/// Search every task of one category, in list order
pub fn search_tasks(re: &Regex, category: &str, tasks: &[Task]) -> Vec<SearchHit> {
    let mut hits = Vec::new();
    for (index, task) in tasks.iter().enumerate() {
        let mut check = |field: MatchField, text: &str| {
            let spans = find_matches(re, text);
            if !spans.is_empty() {
                hits.push(SearchHit {
                    category: category.to_string(),
                    index,
                    field,
                    text: text.to_string(),
                    spans,
                });
            }
        };

        check(MatchField::Description, &task.description);
        if let Some(ref notes) = task.notes {
            check(MatchField::Notes, notes);
        }
        for subtask in &task.subtasks {
            check(MatchField::Subtask, subtask);
        }
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::{Priority, TaskDetails};

    fn tasks() -> Vec<Task> {
        let mut a = Task::new(
            "Fix login bug".into(),
            "2024-01-01".into(),
            Priority::High,
            "2024-01-01 00:00:00".into(),
        );
        a.apply_details(
            TaskDetails {
                progress: 0,
                date: "2024-01-01".into(),
                subtasks: vec!["reproduce bug".into(), "write test".into()],
                notes: Some("seen on mobile".into()),
                attachments: Vec::new(),
            },
            0,
            "2024-01-02 00:00:00".into(),
        );
        let b = Task::new(
            "Tidy garage".into(),
            "2024-01-05".into(),
            Priority::Low,
            "2024-01-01 00:00:00".into(),
        );
        vec![a, b]
    }

    #[test]
    fn test_search_finds_all_fields() {
        let re = Regex::new("(?i)bug").unwrap();
        let hits = search_tasks(&re, "Coding", &tasks());
        let fields: Vec<MatchField> = hits.iter().map(|h| h.field).collect();
        assert_eq!(fields, vec![MatchField::Description, MatchField::Subtask]);
        assert_eq!(hits[0].spans, vec![10..13]);
        assert!(hits.iter().all(|h| h.index == 0 && h.category == "Coding"));
    }

    #[test]
    fn test_search_notes_and_misses() {
        let re = Regex::new("mobile").unwrap();
        let hits = search_tasks(&re, "Coding", &tasks());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].field, MatchField::Notes);

        let re = Regex::new("nothing here").unwrap();
        assert!(search_tasks(&re, "Coding", &tasks()).is_empty());
    }
}
