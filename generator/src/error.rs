use std::{path::PathBuf, sync::Arc};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("input directory '{}' not found", path.display())]
    InputNotFound { path: PathBuf },

    #[error("output directory '{}' already exists", path.display())]
    OutputExists { path: PathBuf },

    #[error("'{}' not found", path.display())]
    ConfigNotFound { path: PathBuf },

    #[error("failed to parse '{}'", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to load templates from '{}'", dir.display())]
    TemplateLoad {
        dir: PathBuf,
        #[source]
        source: tera::Error,
    },

    /// The template exists but could not be read or parsed, or it extends
    /// or imports one that could not.
    #[error("template '{name}' could not be loaded")]
    TemplateInvalid {
        name: String,
        #[source]
        source: Arc<tera::Error>,
    },

    #[error("template '{name}' not found")]
    TemplateNotFound {
        name: String,
        #[source]
        source: tera::Error,
    },

    #[error("failed to render template '{name}'")]
    Render {
        name: String,
        #[source]
        source: tera::Error,
    },

    /// A job in the config list lacks a required field.
    #[error("job #{index} in config is missing the `{field}` field")]
    MissingField { index: usize, field: &'static str },

    /// The url points outside the output directory.
    #[error("url '{url}' escapes the output directory")]
    InvalidUrl { url: String },

    #[error("io error on '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub(crate) trait IoResultExt<T> {
    /// Attach the path the io operation was working on.
    fn at(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn at(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|source| Error::Io {
            path: path.into(),
            source,
        })
    }
}
