use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::{
    constants::{PASSWORD, USERNAME},
    types::ValidationResult,
};

/// Characters left untouched in a URL userinfo component: RFC 3986 unreserved.
const USERINFO: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Username/password pair supplied out-of-band for a single query.
///
/// Empty strings are treated the same as absent values.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    username: Option<String>,
    password: Option<String>,
}

impl Credentials {
    pub fn new(username: Option<&str>, password: Option<&str>) -> Self {
        let non_empty = |v: Option<&str>| v.filter(|s| !s.is_empty()).map(String::from);
        Self {
            username: non_empty(username),
            password: non_empty(password),
        }
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Both username and password are set.
    pub fn is_provided(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }

    /// At least one of username or password is set.
    pub fn is_any_provided(&self) -> bool {
        self.username.is_some() || self.password.is_some()
    }

    /// Percent-encoded `username:password` for embedding in a URL, or `None`
    /// unless both parts are present.
    pub fn user_info(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(password)) => {
                Some(format!(
                    "{}:{}",
                    utf8_percent_encode(user, USERINFO),
                    utf8_percent_encode(password, USERINFO)
                ))
            }
            _ => None,
        }
    }

    /// Reports an error on the missing field when only one of the pair is set.
    pub fn validate(&self, result: &mut ValidationResult) {
        let message = "Both Username and password are required.";
        match (&self.username, &self.password) {
            (None, Some(_)) => result.add(USERNAME, message),
            (Some(_), None) => result.add(PASSWORD, message),
            _ => {}
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "****"))
            .finish()
    }
}
