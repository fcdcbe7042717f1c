//! Error types for yumrepo-core.

use miette::Diagnostic;
use thiserror::Error;
use yumrepo_config::error::ConfigError;
use yumrepo_utils::error::FileSystemError;

use crate::types::ValidationResult;

/// Failure to reach the repository metadata index.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    #[error("Invalid file path.")]
    #[diagnostic(
        code(yumrepo::connection::file),
        help("Check that the repository directory exists and contains repodata/repomd.xml")
    )]
    InvalidFilePath,

    /// Final response status line, e.g. `HTTP/1.1 404 Not Found`.
    #[error("{0}")]
    #[diagnostic(code(yumrepo::connection::http_status))]
    HttpStatus(String),

    #[error("{0}")]
    #[diagnostic(
        code(yumrepo::connection::transport),
        help("Check the repository host name, port and your network connection")
    )]
    Transport(String),
}

/// Core error type for repository validation, connection checks and queries.
#[derive(Error, Diagnostic, Debug)]
pub enum YumError {
    #[error("{}", .0.messages().join("; "))]
    #[diagnostic(code(yumrepo::validation))]
    Validation(ValidationResult),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Connection(#[from] ConnectionError),

    #[error("Invalid URL : {0}")]
    #[diagnostic(
        code(yumrepo::invalid_url),
        help("Use an absolute file://, http:// or https:// URL")
    )]
    InvalidUrl(String),

    #[error("Invalid uri format {0}")]
    #[diagnostic(
        code(yumrepo::invalid_uri_format),
        help("The URL must contain '//' after the scheme, e.g. file:///srv/repo")
    )]
    InvalidUriFormat(String),

    #[error("{0}")]
    #[diagnostic(
        code(yumrepo::process_launch),
        help("Check that the query tool is installed and on PATH")
    )]
    ProcessLaunch(String),

    #[error("{0}")]
    #[diagnostic(code(yumrepo::query))]
    QueryExecution(String),

    #[error("Could not find any package that matched '{spec}'.")]
    #[diagnostic(code(yumrepo::package_not_found))]
    PackageNotFound { spec: String },

    #[error(
        "Given Package Spec ({spec}) resolves to more than one file on the repository: {}",
        .files.join(", ")
    )]
    #[diagnostic(
        code(yumrepo::ambiguous_match),
        help("Narrow the package spec so that it matches exactly one package")
    )]
    AmbiguousMatch { spec: String, files: Vec<String> },

    #[error("Invalid proxy '{proxy}': {reason}")]
    #[diagnostic(
        code(yumrepo::invalid_proxy),
        help("Use a proxy URL such as http://proxy.example.com:3128 or socks5://127.0.0.1:1080")
    )]
    InvalidProxy { proxy: String, reason: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(code(yumrepo::fs))]
    FileSystem(#[from] FileSystemError),

    #[error("Thread lock poison error")]
    #[diagnostic(
        code(yumrepo::poison),
        help("This is an internal error, please report it")
    )]
    Poisoned,
}

impl<T> From<std::sync::PoisonError<T>> for YumError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        Self::Poisoned
    }
}
