use error::YumError;

pub mod cache;
pub mod checker;
pub mod configuration;
pub mod constants;
pub mod credentials;
pub mod error;
pub mod http_client;
pub mod parser;
pub mod poller;
pub mod process;
pub mod repo_url;
pub mod repoquery;
pub mod types;

#[cfg(test)]
pub(crate) mod test_utils;

pub type YumResult<T> = std::result::Result<T, YumError>;
