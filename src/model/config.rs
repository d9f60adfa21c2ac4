use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Categories shipped when no `taskboard.toml` exists
pub const DEFAULT_CATEGORIES: [&str; 4] = ["Learning", "Coding", "Cleaning", "Personal"];

/// Configuration from taskboard.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    #[serde(default = "default_categories")]
    pub categories: Vec<CategoryConfig>,
    #[serde(default)]
    pub ui: UiConfig,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            categories: default_categories(),
            ui: UiConfig::default(),
        }
    }
}

/// One row of the category table: a name and the file holding its tasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub name: String,
    /// Relative to the data directory. Defaults to `<name>_tasks.txt`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl CategoryConfig {
    pub fn new(name: &str) -> Self {
        CategoryConfig {
            name: name.to_string(),
            file: None,
        }
    }

    /// The file name this category is persisted to
    pub fn resource_file(&self) -> String {
        match self.file {
            Some(ref file) => file.clone(),
            None => format!("{}_tasks.txt", self.name),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiConfig {
    /// Overrides keyed by lowercase priority name (`high`, `medium`, `low`).
    /// Values are color names or `#RRGGBB`.
    #[serde(default)]
    pub priority_colors: HashMap<String, String>,
}

fn default_categories() -> Vec<CategoryConfig> {
    DEFAULT_CATEGORIES
        .iter()
        .map(|name| CategoryConfig::new(name))
        .collect()
}

impl BoardConfig {
    /// Look up a category by name, ignoring case
    pub fn find_category(&self, name: &str) -> Option<&CategoryConfig> {
        self.categories
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_maps_names_to_files() {
        let config = BoardConfig::default();
        let files: Vec<String> = config
            .categories
            .iter()
            .map(|c| c.resource_file())
            .collect();
        assert_eq!(
            files,
            vec![
                "Learning_tasks.txt",
                "Coding_tasks.txt",
                "Cleaning_tasks.txt",
                "Personal_tasks.txt"
            ]
        );
    }

    #[test]
    fn test_find_category_is_case_insensitive() {
        let config = BoardConfig::default();
        assert_eq!(config.find_category("coding").unwrap().name, "Coding");
        assert!(config.find_category("Gardening").is_none());
    }

    #[test]
    fn test_explicit_file_wins() {
        let config: BoardConfig = toml::from_str(
            r#"
[[categories]]
name = "Work"
file = "lists/work.txt"
"#,
        )
        .unwrap();
        assert_eq!(config.categories.len(), 1);
        assert_eq!(config.categories[0].resource_file(), "lists/work.txt");
    }
}
