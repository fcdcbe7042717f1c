//! Values exchanged with the host: configuration properties, validation and
//! connection-check results, and package revisions.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Named string properties of a repository or package configuration.
///
/// A key present with a `None` value is distinct from a missing key: the
/// former is reported as "empty"/"null", the latter as "not specified".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialProperties {
    properties: BTreeMap<String, Option<String>>,
}

impl MaterialProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, Some(value.into()));
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Option<String>) {
        self.properties.insert(key.into(), value);
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    /// Returns the value of `key`, or `None` when the key is missing or null.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(|v| v.as_deref())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidationError {
    pub key: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            message: message.into(),
        }
    }
}

/// Ordered collection of validation failures; success iff empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.add_error(ValidationError::new(key, message));
    }

    pub fn extend(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.message.clone()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionCheckResult {
    pub success: bool,
    pub messages: Vec<String>,
}

impl ConnectionCheckResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            messages: vec![message.into()],
        }
    }

    pub fn failure(messages: Vec<String>) -> Self {
        Self {
            success: false,
            messages,
        }
    }
}

/// A resolved package revision.
///
/// Two revisions are the "same" for polling purposes when their `revision`
/// strings are equal; `timestamp` is informational only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageRevision {
    pub revision: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trackback_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default)]
    pub data: BTreeMap<String, String>,
}

impl PackageRevision {
    pub fn new(revision: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            revision: revision.into(),
            timestamp,
            trackback_url: None,
            user: None,
            data: BTreeMap::new(),
        }
    }

    pub fn data_for(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    pub fn is_same_revision(&self, other: &PackageRevision) -> bool {
        self.revision == other.revision
    }
}
