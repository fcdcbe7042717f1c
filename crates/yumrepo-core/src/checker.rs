//! Reachability checks for repository metadata, one variant per URL scheme.

use base64::{engine::general_purpose::STANDARD, Engine};
use tracing::{debug, trace};
use ureq::{
    http::{header, Response, StatusCode},
    Agent, Body,
};
use url::Url;

use crate::{credentials::Credentials, error::ConnectionError, http_client::ClientConfig};

/// Checks that a repository metadata URL can be reached.
#[derive(Debug, Clone)]
pub enum ConnectionChecker {
    Http(HttpConnectionChecker),
    File(FileConnectionChecker),
}

impl ConnectionChecker {
    pub fn check_connection(
        &self,
        url: &str,
        credentials: &Credentials,
    ) -> Result<(), ConnectionError> {
        match self {
            Self::Http(checker) => checker.check_connection(url, credentials),
            Self::File(checker) => checker.check_connection(url),
        }
    }
}

/// GETs the URL, answering a single `Basic` challenge with credentials.
#[derive(Debug, Clone)]
pub struct HttpConnectionChecker {
    agent: Agent,
}

impl HttpConnectionChecker {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            agent: config.build(),
        }
    }

    pub fn check_connection(
        &self,
        url: &str,
        credentials: &Credentials,
    ) -> Result<(), ConnectionError> {
        let mut response = self.get(url, None)?;

        if response.status() == StatusCode::UNAUTHORIZED && is_basic_challenge(&response) {
            if let (Some(username), Some(password)) =
                (credentials.username(), credentials.password())
            {
                debug!("{} requested basic authentication, retrying", url);
                let token = STANDARD.encode(format!("{username}:{password}"));
                response = self.get(url, Some(&format!("Basic {token}")))?;
            }
        }

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ConnectionError::HttpStatus(status_line(&response)))
        }
    }

    fn get(
        &self,
        url: &str,
        authorization: Option<&str>,
    ) -> Result<Response<Body>, ConnectionError> {
        let mut request = self.agent.get(url);
        if let Some(value) = authorization {
            request = request.header(header::AUTHORIZATION, value);
        }
        let response = request
            .call()
            .map_err(|err| ConnectionError::Transport(err.to_string()))?;
        trace!("GET {} -> {}", url, response.status());
        Ok(response)
    }
}

fn is_basic_challenge(response: &Response<Body>) -> bool {
    response
        .headers()
        .get_all(header::WWW_AUTHENTICATE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|value| value.to_ascii_lowercase().contains("basic"))
}

fn status_line(response: &Response<Body>) -> String {
    let status = response.status();
    format!(
        "{:?} {} {}",
        response.version(),
        status.as_u16(),
        status.canonical_reason().unwrap_or("")
    )
    .trim_end()
    .to_string()
}

/// Checks that a `file://` URL names an existing local path.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileConnectionChecker;

impl FileConnectionChecker {
    pub fn check_connection(&self, url: &str) -> Result<(), ConnectionError> {
        let path = Url::parse(url)
            .ok()
            .and_then(|url| url.to_file_path().ok())
            .ok_or(ConnectionError::InvalidFilePath)?;

        if path.exists() {
            Ok(())
        } else {
            Err(ConnectionError::InvalidFilePath)
        }
    }
}
