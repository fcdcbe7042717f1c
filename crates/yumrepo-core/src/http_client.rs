use std::time::Duration;

use tracing::debug;
use ureq::{Agent, Proxy};
use yumrepo_config::config::Config;

use crate::{error::YumError, YumResult};

/// Settings for the agent used to reach repository metadata over HTTP.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub user_agent: String,
    pub proxy: Option<Proxy>,
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("yumrepo/{}", env!("CARGO_PKG_VERSION")),
            proxy: None,
            timeout: None,
        }
    }
}

impl ClientConfig {
    /// Creates client settings from the application configuration.
    ///
    /// # Errors
    ///
    /// * [`YumError::InvalidProxy`] if the configured proxy cannot be parsed
    /// * [`YumError::Config`] if the configured timeout is not a valid duration
    pub fn from_config(config: &Config) -> YumResult<Self> {
        let proxy = config
            .proxy
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .map(parse_proxy)
            .transpose()?;

        Ok(Self {
            user_agent: config.user_agent(),
            proxy,
            timeout: config.http_timeout()?,
        })
    }

    /// Builds an agent that hands every HTTP status back as a response, so
    /// callers can inspect 401 challenges and report final status lines.
    pub fn build(&self) -> Agent {
        debug!(
            user_agent = %self.user_agent,
            proxy = self.proxy.is_some(),
            timeout = ?self.timeout,
            "building http agent"
        );

        ureq::Agent::config_builder()
            .proxy(self.proxy.clone())
            .timeout_global(self.timeout)
            .user_agent(&self.user_agent)
            .http_status_as_error(false)
            .build()
            .into()
    }
}

pub fn parse_proxy(proxy: &str) -> YumResult<Proxy> {
    Proxy::new(proxy).map_err(|err| {
        YumError::InvalidProxy {
            proxy: proxy.to_string(),
            reason: err.to_string(),
        }
    })
}
