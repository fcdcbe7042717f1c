//! Per-session memoization of query results.
//!
//! Concurrent lookups of the same key run the query once: the first caller
//! initializes the key's cell while later callers wait on it and reuse the
//! stored result.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use tracing::debug;

use crate::{
    credentials::Credentials, error::YumError, repo_url::RepoUrl, types::PackageRevision,
    YumResult,
};

/// Identifies one query: repository, credential presence and package spec.
/// The spec is kept verbatim since it is passed to the query tool as is.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    repository: String,
    username: Option<String>,
    has_password: bool,
    spec: String,
}

impl CacheKey {
    pub fn new(repo_url: &RepoUrl, spec: &str) -> Self {
        let credentials: &Credentials = repo_url.credentials();
        Self {
            repository: repo_url.normalized().to_string(),
            username: credentials.username().map(String::from),
            has_password: credentials.password().is_some(),
            spec: spec.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedQuery {
    pub revisions: Vec<PackageRevision>,
    pub retrieved_at: DateTime<Utc>,
}

type Slot = Arc<OnceCell<CachedQuery>>;

#[derive(Debug, Default)]
pub struct QueryCache {
    entries: Mutex<HashMap<CacheKey, Slot>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached result for `key`, running `query` to fill it first
    /// if needed. Failed queries are not cached.
    pub fn get_or_query<F>(&self, key: &CacheKey, query: F) -> YumResult<CachedQuery>
    where
        F: FnOnce() -> YumResult<Vec<PackageRevision>>,
    {
        let slot = {
            let mut entries = self.entries.lock()?;
            Arc::clone(entries.entry(key.clone()).or_default())
        };

        if let Some(hit) = slot.get() {
            debug!("query cache hit for {:?}", key);
            return Ok(hit.clone());
        }

        let cached = slot.get_or_try_init(|| {
            debug!("query cache miss for {:?}", key);
            Ok::<_, YumError>(CachedQuery {
                revisions: query()?,
                retrieved_at: Utc::now(),
            })
        })?;
        Ok(cached.clone())
    }

    /// Drops every cached result. Queries already running complete but their
    /// results are not visible to later lookups.
    pub fn clear(&self) -> YumResult<()> {
        let mut entries = self.entries.lock()?;
        debug!("clearing {} cached query result(s)", entries.len());
        entries.clear();
        Ok(())
    }

    pub fn len(&self) -> YumResult<usize> {
        Ok(self.entries.lock()?.len())
    }

    pub fn is_empty(&self) -> YumResult<bool> {
        Ok(self.len()? == 0)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        thread,
        time::Duration,
    };

    use chrono::TimeZone;

    use super::*;

    fn key(url: &str, spec: &str) -> CacheKey {
        CacheKey::new(&RepoUrl::new(url, Credentials::default()), spec)
    }

    fn revision(name: &str) -> PackageRevision {
        PackageRevision::new(name, Utc.timestamp_opt(1365054258, 0).unwrap())
    }

    #[test]
    fn test_key_normalizes_url_only() {
        assert_eq!(
            key("http://localhost/repo/", "go-agent"),
            key("http://localhost/repo", "go-agent")
        );
        assert_ne!(
            key("http://localhost/repo", "go-agent"),
            key("http://localhost/repo", " go-agent")
        );
        assert_ne!(
            key("http://localhost/repo", "go-agent"),
            key("http://localhost/repo", "php")
        );

        let with_credentials = CacheKey::new(
            &RepoUrl::new(
                "http://localhost/repo",
                Credentials::new(Some("user"), Some("pwd")),
            ),
            "go-agent",
        );
        assert_ne!(with_credentials, key("http://localhost/repo", "go-agent"));
    }

    #[test]
    fn test_second_lookup_is_a_hit() {
        let cache = QueryCache::new();
        let key = key("http://localhost/repo", "go-agent");
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let cached = cache
                .get_or_query(&key, || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(vec![revision("go-agent-13.1.1-16714.noarch")])
                })
                .unwrap();
            assert_eq!(cached.revisions.len(), 1);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len().unwrap(), 1);
    }

    #[test]
    fn test_errors_are_not_cached() {
        let cache = QueryCache::new();
        let key = key("http://localhost/repo", "go-agent");

        let err = cache
            .get_or_query(&key, || Err(YumError::QueryExecution("boom".into())))
            .unwrap_err();
        assert_eq!(err.to_string(), "boom");

        let cached = cache
            .get_or_query(&key, || Ok(vec![revision("go-agent-13.1.1-16714.noarch")]))
            .unwrap();
        assert_eq!(cached.revisions[0].revision, "go-agent-13.1.1-16714.noarch");
    }

    #[test]
    fn test_panicking_query_does_not_wedge_key() {
        let cache = Arc::new(QueryCache::new());
        let key = key("http://localhost/repo", "go-agent");

        let panicked = {
            let cache = Arc::clone(&cache);
            let key = key.clone();
            thread::spawn(move || {
                let _ = cache.get_or_query(&key, || panic!("query tool crashed"));
            })
            .join()
        };
        assert!(panicked.is_err());

        let cached = cache
            .get_or_query(&key, || Ok(vec![revision("go-agent-13.1.1-16714.noarch")]))
            .unwrap();
        assert_eq!(cached.revisions.len(), 1);
    }

    #[test]
    fn test_clear_forces_requery() {
        let cache = QueryCache::new();
        let key = key("http://localhost/repo", "go-agent");
        let calls = AtomicUsize::new(0);
        let query = || {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![])
        };

        cache.get_or_query(&key, query).unwrap();
        cache.clear().unwrap();
        assert!(cache.is_empty().unwrap());
        cache.get_or_query(&key, query).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_concurrent_lookups_query_once() {
        let cache = Arc::new(QueryCache::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let calls = Arc::clone(&calls);
                thread::spawn(move || {
                    let key = key("http://localhost/repo", "go-agent");
                    cache
                        .get_or_query(&key, || {
                            calls.fetch_add(1, Ordering::SeqCst);
                            thread::sleep(Duration::from_millis(50));
                            Ok(vec![revision("go-agent-13.1.1-16714.noarch")])
                        })
                        .unwrap()
                })
            })
            .collect();

        for handle in handles {
            let cached = handle.join().unwrap();
            assert_eq!(cached.revisions[0].revision, "go-agent-13.1.1-16714.noarch");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
