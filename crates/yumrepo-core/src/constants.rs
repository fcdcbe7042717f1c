//! Constants used throughout yumrepo-core.

/// Repository configuration key holding the repository base URL.
pub const REPO_URL: &str = "REPO_URL";

/// Repository configuration key holding the username.
pub const USERNAME: &str = "USERNAME";

/// Repository configuration key holding the password.
pub const PASSWORD: &str = "PASSWORD";

/// Package configuration key holding the package-name glob.
pub const PACKAGE_SPEC: &str = "PACKAGE_SPEC";

pub const REPOSITORY_KEYS: [&str; 3] = [REPO_URL, USERNAME, PASSWORD];

pub const PACKAGE_KEYS: [&str; 1] = [PACKAGE_SPEC];

/// Revision data key for the package location reported by the query tool.
pub const LOCATION: &str = "LOCATION";

/// Revision data key for the package epoch reported by the query tool.
pub const EPOCH: &str = "EPOCH";

/// Path of the repository metadata index, relative to the base URL.
pub const REPO_METADATA_PATH: &str = "repodata/repomd.xml";

/// Separator between fields in the query tool's output.
pub const FIELD_SEPARATOR: &str = "<=>";

/// Prefix of generated repository identifiers passed to the query tool.
pub const REPO_ID_PREFIX: &str = "yumrepo-";
