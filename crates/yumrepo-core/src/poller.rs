//! Public operations over a repository and package configuration pair.
//!
//! Every resolve goes through the same stages: both configurations are
//! validated, the repository metadata index is checked for reachability,
//! and only then is the query tool run (through the [`QueryCache`]).

use std::sync::Arc;

use tracing::debug;
use yumrepo_config::config::Config;

use crate::{
    cache::{CacheKey, QueryCache},
    configuration::{
        repo_url_from, validate_package_configuration, validate_repository_configuration,
    },
    constants::PACKAGE_SPEC,
    error::YumError,
    http_client::ClientConfig,
    parser::select_single,
    process::ProcessRunner,
    repoquery::{RepoQueryCommand, RepoQueryParams, YumEnvironment},
    types::{ConnectionCheckResult, MaterialProperties, PackageRevision, ValidationResult},
    YumResult,
};

/// Anything that can resolve the current revision of a package.
pub trait RevisionResolver {
    fn latest_revision(
        &self,
        package: &MaterialProperties,
        repository: &MaterialProperties,
    ) -> YumResult<PackageRevision>;
}

/// Resolves the current revision and returns it only when its identity
/// differs from `previous`. Timestamps are not compared.
pub fn latest_revision_since<R>(
    resolver: &R,
    package: &MaterialProperties,
    repository: &MaterialProperties,
    previous: &PackageRevision,
) -> YumResult<Option<PackageRevision>>
where
    R: RevisionResolver + ?Sized,
{
    let latest = resolver.latest_revision(package, repository)?;
    if latest.is_same_revision(previous) {
        debug!("no revision newer than {}", previous.revision);
        Ok(None)
    } else {
        debug!("new revision {} (previous {})", latest.revision, previous.revision);
        Ok(Some(latest))
    }
}

pub struct PackageRepositoryPoller {
    config: Config,
    client: ClientConfig,
    runner: ProcessRunner,
    cache: Arc<QueryCache>,
}

impl PackageRepositoryPoller {
    pub fn new(config: Config, client: ClientConfig, cache: Arc<QueryCache>) -> Self {
        Self {
            config,
            client,
            runner: ProcessRunner::new(),
            cache,
        }
    }

    /// Creates a poller whose HTTP client settings come from `config`.
    pub fn from_config(config: Config, cache: Arc<QueryCache>) -> YumResult<Self> {
        let client = ClientConfig::from_config(&config)?;
        Ok(Self::new(config, client, cache))
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    pub fn validate_repository_configuration(
        &self,
        repository: &MaterialProperties,
    ) -> ValidationResult {
        validate_repository_configuration(repository)
    }

    pub fn validate_package_configuration(&self, package: &MaterialProperties) -> ValidationResult {
        validate_package_configuration(package)
    }

    pub fn check_connection_to_repository(
        &self,
        repository: &MaterialProperties,
    ) -> ConnectionCheckResult {
        let validation = validate_repository_configuration(repository);
        if validation.is_failure() {
            return ConnectionCheckResult::failure(validation.messages());
        }

        let repo_url = repo_url_from(repository);
        let metadata_url = repo_url.metadata_index_url();
        match repo_url.check_connection(&self.client) {
            Ok(()) => {
                ConnectionCheckResult::success(format!(
                    "Successfully accessed repository metadata at {metadata_url}"
                ))
            }
            Err(YumError::Connection(err)) => {
                debug!("connection check failed for {}: {}", metadata_url, err);
                ConnectionCheckResult::failure(vec![format!(
                    "Could not access file - {metadata_url}. {err}"
                )])
            }
            Err(err) => ConnectionCheckResult::failure(vec![err.to_string()]),
        }
    }

    pub fn check_connection_to_package(
        &self,
        package: &MaterialProperties,
        repository: &MaterialProperties,
    ) -> ConnectionCheckResult {
        if let Err(validation) = validate_both(package, repository) {
            return ConnectionCheckResult::failure(validation.messages());
        }

        let repository_check = self.check_connection_to_repository(repository);
        if !repository_check.success {
            return repository_check;
        }

        match self.query(package, repository) {
            Ok(revision) => {
                ConnectionCheckResult::success(format!("Found package '{}'.", revision.revision))
            }
            Err(err) => ConnectionCheckResult::failure(vec![err.to_string()]),
        }
    }

    pub fn latest_revision_since(
        &self,
        package: &MaterialProperties,
        repository: &MaterialProperties,
        previous: &PackageRevision,
    ) -> YumResult<Option<PackageRevision>> {
        latest_revision_since(self, package, repository, previous)
    }

    fn query(
        &self,
        package: &MaterialProperties,
        repository: &MaterialProperties,
    ) -> YumResult<PackageRevision> {
        let repo_url = repo_url_from(repository);
        let spec = package.value(PACKAGE_SPEC).unwrap_or_default();
        let key = CacheKey::new(&repo_url, spec);

        let cached = self.cache.get_or_query(&key, || {
            let params = RepoQueryParams::new(repo_url.clone(), spec);
            let env = YumEnvironment::new(&self.config, params.repo_id())?;
            RepoQueryCommand::new(self.config.repoquery_command(), params)
                .execute(&self.runner, &env)
        })?;

        select_single(spec, cached.revisions)
    }
}

impl RevisionResolver for PackageRepositoryPoller {
    /// # Errors
    ///
    /// * [`YumError::Validation`] with every repository then package problem
    /// * [`YumError::Connection`] if the metadata index cannot be reached
    /// * any query error: launch failure, tool failure, no match or several
    fn latest_revision(
        &self,
        package: &MaterialProperties,
        repository: &MaterialProperties,
    ) -> YumResult<PackageRevision> {
        validate_both(package, repository).map_err(YumError::Validation)?;
        repo_url_from(repository).check_connection(&self.client)?;

        let revision = self.query(package, repository)?;
        debug!("latest revision is {}", revision.revision);
        Ok(revision)
    }
}

fn validate_both(
    package: &MaterialProperties,
    repository: &MaterialProperties,
) -> Result<(), ValidationResult> {
    let mut result = validate_repository_configuration(repository);
    result.extend(validate_package_configuration(package));
    if result.is_success() {
        Ok(())
    } else {
        Err(result)
    }
}
