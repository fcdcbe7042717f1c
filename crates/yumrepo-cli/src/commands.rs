use chrono::{DateTime, Utc};
use nu_ansi_term::Color::{Blue, Cyan, Green};
use tracing::{error, info};
use yumrepo_config::config::Config;
use yumrepo_core::{
    constants::LOCATION,
    poller::{PackageRepositoryPoller, RevisionResolver},
    types::{ConnectionCheckResult, MaterialProperties, PackageRevision, ValidationResult},
    YumResult,
};

use crate::utils::{json_string, Colored};

pub fn report_validation(result: &ValidationResult) -> bool {
    if result.is_success() {
        info!(success = true, "{}", Colored(Green, "Configuration is valid"));
        return true;
    }

    for err in result.errors() {
        if err.key.is_empty() {
            error!(key = err.key, "{}", err.message);
        } else {
            error!(key = err.key, "{}: {}", Colored(Cyan, &err.key), err.message);
        }
    }
    false
}

fn report_check(result: &ConnectionCheckResult) -> bool {
    for message in &result.messages {
        if result.success {
            info!(success = true, "{}", Colored(Green, message));
        } else {
            error!(success = false, "{}", message);
        }
    }
    result.success
}

fn report_revision(revision: &PackageRevision) {
    info!(
        revision = revision.revision,
        timestamp = %revision.timestamp.to_rfc3339(),
        user = revision.user,
        trackback_url = revision.trackback_url,
        data = json_string(&revision.data),
        "{} (built {}){}",
        Colored(Blue, &revision.revision),
        revision.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
        revision
            .data_for(LOCATION)
            .map(|location| format!("\n  {location}"))
            .unwrap_or_default()
    );
}

pub fn check_repo(poller: &PackageRepositoryPoller, repository: &MaterialProperties) -> bool {
    report_check(&poller.check_connection_to_repository(repository))
}

pub fn check_package(
    poller: &PackageRepositoryPoller,
    package: &MaterialProperties,
    repository: &MaterialProperties,
) -> bool {
    report_check(&poller.check_connection_to_package(package, repository))
}

pub fn latest(
    poller: &PackageRepositoryPoller,
    package: &MaterialProperties,
    repository: &MaterialProperties,
) -> YumResult<()> {
    let revision = poller.latest_revision(package, repository)?;
    report_revision(&revision);
    Ok(())
}

pub fn latest_since(
    poller: &PackageRepositoryPoller,
    package: &MaterialProperties,
    repository: &MaterialProperties,
    revision: String,
    timestamp: Option<DateTime<Utc>>,
) -> YumResult<()> {
    let previous = PackageRevision::new(revision, timestamp.unwrap_or(DateTime::<Utc>::UNIX_EPOCH));

    match poller.latest_revision_since(package, repository, &previous)? {
        Some(latest) => report_revision(&latest),
        None => {
            info!(
                revision = previous.revision,
                "No new revision since {}",
                Colored(Blue, &previous.revision)
            );
        }
    }
    Ok(())
}

pub fn show_config(config: &Config) -> YumResult<()> {
    let toml = config.to_toml()?;
    if toml.trim().is_empty() {
        info!("No configuration set, using defaults");
    } else {
        info!("{}", toml.trim_end());
    }
    Ok(())
}
