use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::error::{Error, IoResultExt as _, Result};

pub const CONFIG_FILE: &str = "config.json";
pub const TEMPLATES_DIR: &str = "templates";
pub const STATIC_DIR: &str = "static";
pub const DEFAULT_OUTPUT_DIR: &str = "html";
pub const PAGE_FILE: &str = "index.html";

/// The ordered list of pages to render, as read from `config.json`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Config {
    pub jobs: Vec<Job>,
}

/// One page: which template renders it, with what variables, and where it goes.
///
/// Fields are optional on load. A missing one is reported when the job is
/// rendered, see [`Job::template`] and friends.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Job {
    pub template: Option<String>,
    pub context: Option<serde_json::Map<String, serde_json::Value>>,
    pub url: Option<String>,
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.try_exists().at(path)? {
            return Err(Error::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path).at(path)?;
        Self::from_str_at(&content, path)
    }

    fn from_str_at(content: &str, path: &Path) -> Result<Self> {
        serde_json::from_str(content).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// `<input_dir>/config.json`
    pub fn path_in(input_dir: impl AsRef<Path>) -> PathBuf {
        input_dir.as_ref().join(CONFIG_FILE)
    }
}

impl Job {
    pub fn template(&self, index: usize) -> Result<&str> {
        self.template
            .as_deref()
            .ok_or(Error::MissingField {
                index,
                field: "template",
            })
    }

    pub fn context(&self, index: usize) -> Result<&serde_json::Map<String, serde_json::Value>> {
        self.context.as_ref().ok_or(Error::MissingField {
            index,
            field: "context",
        })
    }

    pub fn url(&self, index: usize) -> Result<&str> {
        self.url.as_deref().ok_or(Error::MissingField { index, field: "url" })
    }
}
