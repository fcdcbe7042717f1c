use chrono::{DateTime, Utc};
use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand, ValueHint};
use yumrepo_core::{
    constants::{PACKAGE_SPEC, PASSWORD, REPO_URL, USERNAME},
    types::MaterialProperties,
};

#[derive(Parser)]
#[command(
    author,
    version,
    about,
    help_template = "{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}",
    arg_required_else_help = true
)]
pub struct Args {
    /// Set output verbosity
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress outputs
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output as json
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Provide custom config file
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<String>,

    /// Set proxy
    #[arg(required = false, long, short = 'P', global = true)]
    pub proxy: Option<String>,

    /// Set user agent
    #[arg(required = false, long, short = 'A', global = true)]
    pub user_agent: Option<String>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct RepoArgs {
    /// Repository base URL (file://, http:// or https://)
    #[arg(long, value_hint = ValueHint::Url)]
    pub url: Option<String>,

    /// Repository username
    #[arg(long)]
    pub username: Option<String>,

    /// Repository password
    #[arg(long)]
    pub password: Option<String>,
}

impl RepoArgs {
    pub fn properties(&self) -> MaterialProperties {
        let mut properties = MaterialProperties::new();
        if let Some(url) = &self.url {
            properties.insert(REPO_URL, Some(url.clone()));
        }
        if let Some(username) = &self.username {
            properties.insert(USERNAME, Some(username.clone()));
        }
        if let Some(password) = &self.password {
            properties.insert(PASSWORD, Some(password.clone()));
        }
        properties
    }
}

#[derive(ClapArgs, Debug, Clone)]
pub struct PackageArgs {
    /// Package name glob, e.g. 'go-agent' or 'go-*'
    #[arg(long)]
    pub spec: Option<String>,
}

impl PackageArgs {
    pub fn properties(&self) -> MaterialProperties {
        let mut properties = MaterialProperties::new();
        if let Some(spec) = &self.spec {
            properties.insert(PACKAGE_SPEC, Some(spec.clone()));
        }
        properties
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a repository configuration
    #[clap(name = "validate-repo")]
    ValidateRepo {
        #[command(flatten)]
        repo: RepoArgs,

        /// Extra configuration entry, may be repeated
        #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
        set: Vec<(String, String)>,
    },

    /// Validate a package configuration
    #[clap(name = "validate-package")]
    ValidatePackage {
        #[command(flatten)]
        package: PackageArgs,

        /// Extra configuration entry, may be repeated
        #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
        set: Vec<(String, String)>,
    },

    /// Check that the repository metadata can be reached
    #[clap(name = "check-repo")]
    CheckRepo {
        #[command(flatten)]
        repo: RepoArgs,
    },

    /// Check that exactly one package matches the package spec
    #[clap(name = "check-package")]
    CheckPackage {
        #[command(flatten)]
        repo: RepoArgs,

        #[command(flatten)]
        package: PackageArgs,
    },

    /// Print the latest revision of a package
    #[clap(name = "latest")]
    Latest {
        #[command(flatten)]
        repo: RepoArgs,

        #[command(flatten)]
        package: PackageArgs,
    },

    /// Print the latest revision if it differs from a known one
    #[clap(name = "latest-since")]
    LatestSince {
        #[command(flatten)]
        repo: RepoArgs,

        #[command(flatten)]
        package: PackageArgs,

        /// Previously seen revision, e.g. go-agent-13.1.1-16714.noarch
        #[arg(long)]
        revision: String,

        /// Timestamp of the previous revision (RFC 3339)
        #[arg(long, value_parser = parse_timestamp)]
        timestamp: Option<DateTime<Utc>>,
    },

    /// Print the effective configuration
    Config,
}

pub fn parse_key_value(input: &str) -> Result<(String, String), String> {
    match input.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{input}'")),
    }
}

fn parse_timestamp(input: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(input)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| format!("invalid timestamp '{input}': {err}"))
}

/// Adds raw `--set` entries on top of `properties`.
pub fn with_extra(
    mut properties: MaterialProperties,
    extra: Vec<(String, String)>,
) -> MaterialProperties {
    for (key, value) in extra {
        properties.insert(key, Some(value));
    }
    properties
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("RANDOM=value").unwrap(),
            ("RANDOM".to_string(), "value".to_string())
        );
        assert_eq!(
            parse_key_value("EMPTY=").unwrap(),
            ("EMPTY".to_string(), String::new())
        );
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=value").is_err());
    }

    #[test]
    fn test_repo_properties_skip_unset_options() {
        let args = Args::parse_from([
            "yumrepo",
            "validate-repo",
            "--url",
            "http://localhost/repo",
            "--set",
            "RANDOM=1",
        ]);
        let Commands::ValidateRepo { repo, set } = args.command else {
            panic!("expected validate-repo");
        };

        let properties = with_extra(repo.properties(), set);
        assert_eq!(properties.value(REPO_URL), Some("http://localhost/repo"));
        assert!(!properties.contains_key(USERNAME));
        assert_eq!(properties.value("RANDOM"), Some("1"));
    }

    #[test]
    fn test_latest_since_timestamp() {
        let args = Args::parse_from([
            "yumrepo",
            "latest-since",
            "--url",
            "file:///srv/repo",
            "--spec",
            "go-agent",
            "--revision",
            "go-agent-13.1.1-16714.noarch",
            "--timestamp",
            "2013-04-04T11:14:18+05:30",
        ]);
        let Commands::LatestSince { timestamp, .. } = args.command else {
            panic!("expected latest-since");
        };
        assert_eq!(
            timestamp.map(|t| t.to_rfc3339()),
            Some("2013-04-04T05:44:18+00:00".to_string())
        );
    }
}
