use std::cell::{Cell, RefCell};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::debug;

use crate::io::recovery::{self, RecoveryCategory, RecoveryEntry};

/// Where one category's lines live
pub trait TaskResource {
    /// All lines, or `None` when the resource does not exist yet
    fn read_lines(&self) -> io::Result<Option<Vec<String>>>;

    /// Replace the whole resource with `lines`
    fn write_lines(&self, lines: &[String]) -> io::Result<()>;

    /// Human-readable name for messages
    fn describe(&self) -> String;

    /// Called when a stored line could not be decoded during load
    fn record_unreadable(&self, _line: usize, _text: &str, _error: &str) {}
}

/// A category file on disk. Writes go through a temp file and a rename.
#[derive(Debug, Clone)]
pub struct FileResource {
    path: PathBuf,
    recovery_dir: Option<PathBuf>,
}

impl FileResource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileResource {
            path: path.into(),
            recovery_dir: None,
        }
    }

    /// Keep lines that fail to load or save in the recovery log under `dir`
    pub fn with_recovery_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.recovery_dir = Some(dir.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

impl TaskResource for FileResource {
    fn read_lines(&self) -> io::Result<Option<Vec<String>>> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text.lines().map(str::to_string).collect())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "category file not found");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn write_lines(&self, lines: &[String]) -> io::Result<()> {
        let mut content = String::new();
        for line in lines {
            content.push_str(line);
            content.push('\n');
        }

        let result = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
                fs::create_dir_all(parent)
                    .and_then(|_| recovery::atomic_write(&self.path, content.as_bytes()))
            }
            _ => recovery::atomic_write(&self.path, content.as_bytes()),
        };

        if let Err(ref e) = result
            && let Some(ref dir) = self.recovery_dir
        {
            recovery::log_recovery(
                dir,
                RecoveryEntry {
                    timestamp: chrono::Utc::now(),
                    category: RecoveryCategory::Write,
                    description: "category write failed".to_string(),
                    fields: vec![
                        ("Target".to_string(), self.file_name()),
                        ("Error".to_string(), e.to_string()),
                    ],
                    body: content,
                },
            );
        }
        result
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn record_unreadable(&self, line: usize, text: &str, error: &str) {
        if let Some(ref dir) = self.recovery_dir {
            recovery::log_recovery(
                dir,
                RecoveryEntry {
                    timestamp: chrono::Utc::now(),
                    category: RecoveryCategory::Parser,
                    description: "unreadable task line".to_string(),
                    fields: vec![
                        ("Source".to_string(), self.file_name()),
                        ("Line".to_string(), line.to_string()),
                        ("Error".to_string(), error.to_string()),
                    ],
                    body: text.to_string(),
                },
            );
        }
    }
}

/// In-memory lines shared between clones, for tests and embedding.
/// `set_fail_writes(true)` makes every write fail with `PermissionDenied`.
#[derive(Debug, Clone, Default)]
pub struct MemoryResource {
    lines: Rc<RefCell<Option<Vec<String>>>>,
    fail_writes: Rc<Cell<bool>>,
    writes: Rc<Cell<usize>>,
}

impl MemoryResource {
    /// A resource that does not exist yet
    pub fn new() -> Self {
        MemoryResource::default()
    }

    pub fn with_lines<S: Into<String>>(lines: impl IntoIterator<Item = S>) -> Self {
        let resource = MemoryResource::default();
        resource
            .lines
            .replace(Some(lines.into_iter().map(Into::into).collect()));
        resource
    }

    /// Current content, `None` if never written
    pub fn lines(&self) -> Option<Vec<String>> {
        self.lines.borrow().clone()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Number of successful writes so far
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }
}

impl TaskResource for MemoryResource {
    fn read_lines(&self) -> io::Result<Option<Vec<String>>> {
        Ok(self.lines())
    }

    fn write_lines(&self, lines: &[String]) -> io::Result<()> {
        if self.fail_writes.get() {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "resource is read-only",
            ));
        }
        self.lines.replace(Some(lines.to_vec()));
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn describe(&self) -> String {
        "<memory>".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_reads_as_none() {
        let tmp = TempDir::new().unwrap();
        let resource = FileResource::new(tmp.path().join("Coding_tasks.txt"));
        assert_eq!(resource.read_lines().unwrap(), None);
    }

    #[test]
    fn test_file_lines_are_newline_terminated() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("Coding_tasks.txt");
        let resource = FileResource::new(&path);

        resource
            .write_lines(&["a".to_string(), "b".to_string()])
            .unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a\nb\n");
        assert_eq!(
            resource.read_lines().unwrap(),
            Some(vec!["a".to_string(), "b".to_string()])
        );

        resource.write_lines(&[]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
        assert_eq!(resource.read_lines().unwrap(), Some(Vec::new()));
    }

    #[test]
    fn test_write_creates_parent_directory() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("lists").join("work.txt");
        FileResource::new(&path)
            .write_lines(&["x".to_string()])
            .unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_failed_write_goes_to_recovery_log() {
        let tmp = TempDir::new().unwrap();
        // A directory where the file should be makes the rename fail
        let path = tmp.path().join("Coding_tasks.txt");
        fs::create_dir_all(path.join("blocker")).unwrap();

        let resource = FileResource::new(&path).with_recovery_dir(tmp.path());
        assert!(resource.write_lines(&["keep me".to_string()]).is_err());

        let log = fs::read_to_string(recovery::recovery_log_path(tmp.path())).unwrap();
        assert!(log.contains("category write failed"));
        assert!(log.contains("keep me"));
    }

    #[test]
    fn test_memory_resource_shares_state() {
        let resource = MemoryResource::new();
        let handle = resource.clone();
        resource.write_lines(&["x".to_string()]).unwrap();
        assert_eq!(handle.lines(), Some(vec!["x".to_string()]));
        assert_eq!(handle.write_count(), 1);

        handle.set_fail_writes(true);
        assert!(resource.write_lines(&[]).is_err());
        assert_eq!(handle.write_count(), 1);
    }
}
