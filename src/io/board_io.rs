use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::io::resource::FileResource;
use crate::io::store::{StoreError, TaskListStore};
use crate::model::board::Board;
use crate::model::config::{BoardConfig, CategoryConfig};
use crate::util::clock::Clock;

/// Name of the optional config file inside the data directory
pub const CONFIG_FILE: &str = "taskboard.toml";

/// Environment variable naming the data directory
pub const DATA_DIR_ENV: &str = "TASKBOARD_DIR";

/// Error type for board-level I/O
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse taskboard.toml: {0}")]
    ConfigParseError(#[from] toml::de::Error),
    #[error("invalid taskboard.toml: {0}")]
    InvalidConfig(String),
    #[error("unknown category '{name}' (known: {known})")]
    UnknownCategory { name: String, known: String },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Pick the data directory: explicit flag, then `TASKBOARD_DIR`, then cwd
pub fn resolve_data_dir(flag: Option<&str>) -> Result<PathBuf, BoardError> {
    if let Some(dir) = flag {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(dir) = std::env::var(DATA_DIR_ENV)
        && !dir.trim().is_empty()
    {
        return Ok(PathBuf::from(dir));
    }
    std::env::current_dir().map_err(|e| BoardError::ReadError {
        path: PathBuf::from("."),
        source: e,
    })
}

/// Load the board rooted at `data_dir`. A missing config file gives the
/// built-in category table.
pub fn load_board(data_dir: &Path) -> Result<Board, BoardError> {
    let config_path = data_dir.join(CONFIG_FILE);
    let config = match fs::read_to_string(&config_path) {
        Ok(text) => {
            let config: BoardConfig = toml::from_str(&text)?;
            validate_config(&config)?;
            config
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %config_path.display(), "no config file, using defaults");
            BoardConfig::default()
        }
        Err(e) => {
            return Err(BoardError::ReadError {
                path: config_path,
                source: e,
            });
        }
    };

    Ok(Board {
        data_dir: data_dir.to_path_buf(),
        config,
    })
}

fn validate_config(config: &BoardConfig) -> Result<(), BoardError> {
    let mut seen = HashSet::new();
    for category in &config.categories {
        let name = category.name.trim();
        if name.is_empty() {
            return Err(BoardError::InvalidConfig("category name is empty".into()));
        }
        if !seen.insert(name.to_lowercase()) {
            return Err(BoardError::InvalidConfig(format!(
                "category '{}' is listed twice",
                name
            )));
        }
    }
    Ok(())
}

impl Board {
    /// Look up a category's table entry
    pub fn category(&self, name: &str) -> Result<&CategoryConfig, BoardError> {
        self.config
            .find_category(name)
            .ok_or_else(|| BoardError::UnknownCategory {
                name: name.to_string(),
                known: self
                    .config
                    .categories
                    .iter()
                    .map(|c| c.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    /// The file backing a category
    pub fn resource_for(&self, category: &CategoryConfig) -> FileResource {
        FileResource::new(self.data_dir.join(category.resource_file()))
            .with_recovery_dir(&self.data_dir)
    }

    /// Open the store for a category by name
    pub fn open_store(
        &self,
        name: &str,
        clock: Box<dyn Clock>,
    ) -> Result<TaskListStore, BoardError> {
        let category = self.category(name)?;
        let resource = self.resource_for(category);
        Ok(TaskListStore::open(
            category.name.clone(),
            Box::new(resource),
            clock,
        )?)
    }
}
