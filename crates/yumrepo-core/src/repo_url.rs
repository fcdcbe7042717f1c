use std::fmt;

use tracing::debug;
use url::Url;

use crate::{
    checker::{ConnectionChecker, FileConnectionChecker, HttpConnectionChecker},
    constants::{REPO_METADATA_PATH, REPO_URL},
    credentials::Credentials,
    error::YumError,
    http_client::ClientConfig,
    types::ValidationResult,
    YumResult,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scheme {
    File,
    Http,
    Https,
    Other(String),
}

impl Scheme {
    fn from_url(url: &Url) -> Self {
        match url.scheme() {
            "file" => Self::File,
            "http" => Self::Http,
            "https" => Self::Https,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Http => write!(f, "http"),
            Self::Https => write!(f, "https"),
            Self::Other(scheme) => write!(f, "{scheme}"),
        }
    }
}

/// Base location of a YUM repository plus the credentials used to reach it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoUrl {
    raw: String,
    credentials: Credentials,
}

impl RepoUrl {
    pub fn new(raw: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            raw: raw.into(),
            credentials,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// The URL as configured, safe to show to users.
    pub fn for_display(&self) -> &str {
        &self.raw
    }

    /// Trimmed URL without trailing slashes, used to identify the repository.
    /// The slashes after the scheme are kept, so `file:///` stays `file://`.
    pub fn normalized(&self) -> &str {
        let url = self.raw.trim();
        let path_start = url.find("://").map_or(0, |idx| idx + 3);
        let path = url[path_start..].trim_end_matches('/');
        &url[..path_start + path.len()]
    }

    fn parse(&self) -> Option<Url> {
        Url::parse(self.raw.trim()).ok()
    }

    /// Scheme of the URL, or `None` if it cannot be parsed.
    pub fn scheme(&self) -> Option<Scheme> {
        self.parse().map(|url| Scheme::from_url(&url))
    }

    /// Appends every problem with the URL and its credential combination to
    /// `result`. Credential completeness is checked separately.
    pub fn validate(&self, result: &mut ValidationResult) {
        if self.raw.trim().is_empty() {
            result.add(REPO_URL, "Repository url is empty");
            return;
        }

        let url = self.parse();
        match &url {
            None => result.add(REPO_URL, format!("Invalid URL : {}", self.raw)),
            Some(url) if !Scheme::from_url(url).is_supported() => result.add(
                REPO_URL,
                "Invalid URL: Only 'file', 'http' and 'https' protocols are supported.",
            ),
            Some(_) => {}
        }

        if self.has_user_info() {
            result.add(
                REPO_URL,
                "User info should not be provided as part of the URL. Please provide credentials \
                 using USERNAME and PASSWORD configuration keys.",
            );
        }

        let Some(url) = url else {
            return;
        };
        let scheme = Scheme::from_url(&url);
        if scheme == Scheme::File && self.credentials.is_any_provided() {
            result.add(
                REPO_URL,
                "File protocol does not support username and/or password.",
            );
        }
    }

    /// The authority component carries `user[:password]@`. Checked on the raw
    /// text since `file` URLs with userinfo do not parse at all.
    fn has_user_info(&self) -> bool {
        let Some((_, rest)) = self.raw.trim().split_once("://") else {
            return false;
        };
        let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
        authority.contains('@')
    }

    /// URL of `repodata/repomd.xml` below the base URL.
    pub fn metadata_index_url(&self) -> String {
        format!("{}/{}", self.normalized(), REPO_METADATA_PATH)
    }

    /// The base URL with the percent-encoded credentials embedded as userinfo.
    ///
    /// # Errors
    ///
    /// * [`YumError::InvalidUrl`] if the URL cannot be parsed
    /// * [`YumError::InvalidUriFormat`] if the scheme is not followed by `//`
    pub fn authenticated_url(&self) -> YumResult<String> {
        let raw = self.raw.trim();
        if self.parse().is_none() {
            return Err(YumError::InvalidUrl(self.raw.clone()));
        }

        let Some((scheme, rest)) = raw.split_once("://") else {
            return Err(YumError::InvalidUriFormat(self.raw.clone()));
        };

        Ok(match self.credentials.user_info() {
            Some(user_info) => format!("{scheme}://{user_info}@{rest}"),
            None => raw.to_string(),
        })
    }

    /// [`RepoUrl::authenticated_url`] with the password masked, for logging.
    pub fn redacted_url(&self) -> YumResult<String> {
        let raw = self.raw.trim();
        match (raw.split_once("://"), self.credentials.username()) {
            (Some((scheme, rest)), Some(username)) if self.credentials.is_provided() => {
                Ok(format!("{scheme}://{username}:****@{rest}"))
            }
            _ => self.authenticated_url(),
        }
    }

    /// Picks the connection checker matching the URL scheme.
    ///
    /// # Errors
    ///
    /// Returns [`YumError::InvalidUrl`] if the URL cannot be parsed or its
    /// scheme is unsupported.
    pub fn select_checker(&self, client: &ClientConfig) -> YumResult<ConnectionChecker> {
        let checker = match self.scheme() {
            Some(Scheme::Http | Scheme::Https) => {
                ConnectionChecker::Http(HttpConnectionChecker::new(client))
            }
            Some(Scheme::File) => ConnectionChecker::File(FileConnectionChecker),
            _ => return Err(YumError::InvalidUrl(self.raw.clone())),
        };
        debug!(
            "using {} checker for {}",
            match checker {
                ConnectionChecker::Http(_) => "http",
                ConnectionChecker::File(_) => "file",
            },
            self.for_display()
        );
        Ok(checker)
    }

    /// Validates the URL, then checks that its metadata index is reachable.
    ///
    /// # Errors
    ///
    /// * [`YumError::Validation`] if validation fails; no connection is attempted
    /// * [`YumError::Connection`] with the checker's message otherwise
    pub fn check_connection(&self, client: &ClientConfig) -> YumResult<()> {
        let mut result = ValidationResult::new();
        self.validate(&mut result);
        if result.is_failure() {
            return Err(YumError::Validation(result));
        }

        let checker = self.select_checker(client)?;
        checker.check_connection(&self.metadata_index_url(), &self.credentials)?;
        Ok(())
    }
}
