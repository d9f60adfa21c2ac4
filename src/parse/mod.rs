pub mod task_parser;
pub mod task_serializer;

pub use task_parser::{FormatError, LineError, SchemaVersion, parse_task, parse_tasks};
pub use task_serializer::{serialize_task, serialize_tasks};

/// Separates the top-level fields of an encoded task
pub const FIELD_DELIMITER: char = '|';

/// Joins the elements of a list-valued field (subtasks, attachments)
pub const LIST_DELIMITER: char = '&';

/// Number of fields in the current record shape
pub const FIELD_COUNT: usize = 10;

/// Written by earlier versions of the tracker for an unset notes or stamp field
pub const NONE_SENTINEL: &str = "None";
