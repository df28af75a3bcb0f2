use std::path::{Path, PathBuf};

use plotweave_history::{DEFAULT_AUTHOR, DEFAULT_BRANCH};
use serde::{Deserialize, Serialize};

use crate::error::{SdkError, SdkResult};

/// Settings for a Plotweave session.
///
/// Every field has a default, so a config file only needs the keys it
/// changes:
///
/// ```toml
/// data_dir = "/home/ada/novels"
/// author = "ada"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotweaveConfig {
    /// Directory holding the project store.
    pub data_dir: PathBuf,
    /// Author recorded on commits; `None` records the placeholder author.
    pub author: Option<String>,
    /// Name of the first branch of new projects.
    pub default_branch: String,
    /// Name given to the starter project created on first open.
    pub project_name: String,
}

impl Default for PlotweaveConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".plotweave"),
            author: None,
            default_branch: DEFAULT_BRANCH.to_string(),
            project_name: "My First Novel".to_string(),
        }
    }
}

impl PlotweaveConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(text: &str) -> SdkResult<Self> {
        toml::from_str(text).map_err(|e| SdkError::Config(e.to_string()))
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> SdkResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// The author to record on commits.
    pub fn author(&self) -> &str {
        self.author.as_deref().unwrap_or(DEFAULT_AUTHOR)
    }
}
