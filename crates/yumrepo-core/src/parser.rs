//! Conversion of query tool output into [`PackageRevision`] records.
//!
//! Each package is one line of `<=>`-separated fields in the order
//! NAME, EPOCH, VERSION, RELEASE, ARCH, BUILDTIME, LOCATION, PACKAGER, URL.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use tracing::{trace, warn};

use crate::{
    constants::{EPOCH, FIELD_SEPARATOR, LOCATION},
    error::YumError,
    types::PackageRevision,
    YumResult,
};

const FIELD_COUNT: usize = 9;

/// Parses every package line of the query tool's stdout.
///
/// Lines without a field separator (plugin banners, progress output) are
/// skipped.
///
/// # Errors
///
/// Returns [`YumError::QueryExecution`] for a package line with the wrong
/// number of fields or an unreadable build time.
pub fn parse_output(lines: &[String]) -> YumResult<Vec<PackageRevision>> {
    let mut revisions = Vec::new();
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if !line.contains(FIELD_SEPARATOR) {
            warn!("ignoring unexpected query output: {}", line);
            continue;
        }
        revisions.push(parse_line(line)?);
    }
    Ok(revisions)
}

fn parse_line(line: &str) -> YumResult<PackageRevision> {
    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).map(str::trim).collect();
    let [name, epoch, version, release, arch, build_time, location, packager, url] =
        fields.as_slice()
    else {
        return Err(YumError::QueryExecution(format!(
            "Unexpected query output '{line}': expected {FIELD_COUNT} fields, found {}",
            fields.len()
        )));
    };

    let timestamp = parse_build_time(build_time).ok_or_else(|| {
        YumError::QueryExecution(format!(
            "Unexpected query output '{line}': invalid build time '{build_time}'"
        ))
    })?;

    let mut revision = PackageRevision::new(
        format!("{name}-{version}-{release}.{arch}"),
        timestamp,
    );
    revision.user = non_empty(packager);
    revision.trackback_url = non_empty(url);
    revision
        .data
        .insert(LOCATION.to_string(), location.to_string());
    revision.data.insert(EPOCH.to_string(), epoch.to_string());

    trace!("parsed revision {}", revision.revision);
    Ok(revision)
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// Build times are epoch seconds from yum, or minute-precision local
/// timestamps from dnf, which are read as UTC.
fn parse_build_time(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(secs) = value.parse::<i64>() {
        return Utc.timestamp_opt(secs, 0).single();
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|dt| dt.and_utc())
}

/// File name of the package artifact, taken from its location.
pub fn file_name(revision: &PackageRevision) -> String {
    revision
        .data_for(LOCATION)
        .and_then(|location| location.rsplit('/').next())
        .filter(|name| !name.is_empty())
        .map(String::from)
        .unwrap_or_else(|| format!("{}.rpm", revision.revision))
}

/// Returns the only revision, failing when `spec` matched none or several.
pub fn select_single(
    spec: &str,
    mut revisions: Vec<PackageRevision>,
) -> YumResult<PackageRevision> {
    match revisions.len() {
        0 => {
            Err(YumError::PackageNotFound {
                spec: spec.to_string(),
            })
        }
        1 => Ok(revisions.remove(0)),
        _ => {
            Err(YumError::AmbiguousMatch {
                spec: spec.to_string(),
                files: revisions.iter().map(file_name).collect(),
            })
        }
    }
}
