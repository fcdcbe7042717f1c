use miette::Diagnostic;
use thiserror::Error;
use yumrepo_utils::error::{DurationError, FileSystemError, PathError, UtilsError};

#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("TOML deserialization error: {0}")]
    #[diagnostic(
        code(yumrepo_config::toml_deserialize),
        help("Check your config.toml syntax and structure")
    )]
    TomlDeError(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    #[diagnostic(code(yumrepo_config::toml_serialize))]
    TomlSerError(#[from] toml::ser::Error),

    #[error("Failed to read configuration file `{path}`")]
    #[diagnostic(
        code(yumrepo_config::read),
        help("Check that the file exists and is readable")
    )]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(code(yumrepo_config::utils))]
    Utils(#[from] UtilsError),
}

impl From<PathError> for ConfigError {
    fn from(err: PathError) -> Self {
        Self::Utils(UtilsError::Path(err))
    }
}

impl From<DurationError> for ConfigError {
    fn from(err: DurationError) -> Self {
        Self::Utils(UtilsError::Duration(err))
    }
}

impl From<FileSystemError> for ConfigError {
    fn from(err: FileSystemError) -> Self {
        Self::Utils(UtilsError::FileSystem(err))
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
