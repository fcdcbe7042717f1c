//! Validation of repository and package configuration properties.

use crate::{
    constants::{PACKAGE_KEYS, PACKAGE_SPEC, PASSWORD, REPOSITORY_KEYS, REPO_URL, USERNAME},
    credentials::Credentials,
    repo_url::RepoUrl,
    types::{MaterialProperties, ValidationResult},
};

/// Builds the repository location described by `properties`. A missing or
/// null URL yields an empty one.
pub fn repo_url_from(properties: &MaterialProperties) -> RepoUrl {
    RepoUrl::new(
        properties.value(REPO_URL).unwrap_or_default(),
        Credentials::new(properties.value(USERNAME), properties.value(PASSWORD)),
    )
}

pub fn validate_repository_configuration(properties: &MaterialProperties) -> ValidationResult {
    let mut result = ValidationResult::new();
    check_keys(properties, &REPOSITORY_KEYS, &mut result);

    if !properties.contains_key(REPO_URL) {
        result.add(REPO_URL, "Repository url not specified");
        return result;
    }

    let repo_url = repo_url_from(properties);
    repo_url.validate(&mut result);
    repo_url.credentials().validate(&mut result);
    result
}

pub fn validate_package_configuration(properties: &MaterialProperties) -> ValidationResult {
    let mut result = ValidationResult::new();
    check_keys(properties, &PACKAGE_KEYS, &mut result);

    if !properties.contains_key(PACKAGE_SPEC) {
        result.add(PACKAGE_SPEC, "Package spec not specified");
        return result;
    }

    match properties.value(PACKAGE_SPEC) {
        None => result.add(PACKAGE_SPEC, "Package spec is null"),
        Some(spec) if spec.trim().is_empty() => result.add(PACKAGE_SPEC, "Package spec is empty"),
        Some(_) => {}
    }
    result
}

fn check_keys(properties: &MaterialProperties, allowed: &[&str], result: &mut ValidationResult) {
    let unsupported: Vec<&str> = properties
        .keys()
        .filter(|key| !allowed.contains(key))
        .collect();

    if !unsupported.is_empty() {
        result.add(
            "",
            format!(
                "Unsupported key(s) found : {}. Allowed key(s) are : {}",
                unsupported.join(", "),
                allowed.join(", ")
            ),
        );
    }
}
