use std::path::PathBuf;

use super::config::BoardConfig;

/// A data directory together with its category table
#[derive(Debug, Clone)]
pub struct Board {
    /// Directory holding the category files and taskboard.toml
    pub data_dir: PathBuf,
    /// Parsed taskboard.toml, or the built-in table
    pub config: BoardConfig,
}
