use std::sync::Arc;

use clap::Parser;
use cli::{with_extra, Args, Commands};
use logging::setup_logging;
use tracing::debug;
use utils::COLOR;
use yumrepo_config::{config::Config, error::ConfigError};
use yumrepo_core::{
    cache::QueryCache,
    configuration::{validate_package_configuration, validate_repository_configuration},
    poller::PackageRepositoryPoller,
    YumResult,
};
use yumrepo_utils::path::resolve_path;

mod cli;
mod commands;
mod logging;
mod utils;

fn load_config(args: &Args) -> YumResult<Config> {
    let mut config = match &args.config {
        Some(path) => {
            let path = resolve_path(path).map_err(ConfigError::from)?;
            Config::load(&path)?
        }
        None => Config::new()?,
    };

    if let Some(proxy) = &args.proxy {
        config.proxy = Some(proxy.clone());
    }
    if let Some(user_agent) = &args.user_agent {
        config.user_agent = Some(user_agent.clone());
    }

    Ok(config)
}

/// Runs the selected command; `Ok(false)` means a validation or check failed.
fn handle_cli(args: Args) -> YumResult<bool> {
    if args.no_color {
        let mut color = COLOR.write()?;
        *color = false;
    }

    let config = load_config(&args)?;
    debug!("using query command '{}'", config.repoquery_command());

    if let Commands::Config = args.command {
        commands::show_config(&config)?;
        return Ok(true);
    }

    let cache = Arc::new(QueryCache::new());
    let poller = PackageRepositoryPoller::from_config(config, Arc::clone(&cache))?;

    let result = match args.command {
        Commands::ValidateRepo {
            repo,
            set,
        } => {
            let properties = with_extra(repo.properties(), set);
            Ok(commands::report_validation(
                &validate_repository_configuration(&properties),
            ))
        }
        Commands::ValidatePackage {
            package,
            set,
        } => {
            let properties = with_extra(package.properties(), set);
            Ok(commands::report_validation(
                &validate_package_configuration(&properties),
            ))
        }
        Commands::CheckRepo {
            repo,
        } => Ok(commands::check_repo(&poller, &repo.properties())),
        Commands::CheckPackage {
            repo,
            package,
        } => {
            Ok(commands::check_package(
                &poller,
                &package.properties(),
                &repo.properties(),
            ))
        }
        Commands::Latest {
            repo,
            package,
        } => {
            commands::latest(&poller, &package.properties(), &repo.properties()).map(|()| true)
        }
        Commands::LatestSince {
            repo,
            package,
            revision,
            timestamp,
        } => {
            commands::latest_since(
                &poller,
                &package.properties(),
                &repo.properties(),
                revision,
                timestamp,
            )
            .map(|()| true)
        }
        Commands::Config => Ok(true),
    };

    cache.clear()?;
    result
}

fn main() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    let args = Args::parse();
    setup_logging(&args);

    match handle_cli(args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("{:?}", miette::Report::new(err));
            std::process::exit(1);
        }
    }
}
