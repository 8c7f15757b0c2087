use crate::Result;
use crate::calendar::PeriodSpec;
use crate::series::{LabelFilter, Scope};
use camino::{Utf8Path, Utf8PathBuf};
use core::time::Duration;
use ohno::{IntoAppError, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use url::Url;

/// The default configuration TOML content, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

/// File looked up in the current directory when no configuration path is given
pub const DEFAULT_CONFIG_FILE: &str = "issue-stats.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Repositories (`owner/name`) or owners to report on
    #[serde(default)]
    pub scopes: Vec<String>,

    /// Report columns: `issues`, `pulls`, or a label name
    #[serde(default = "default_labels")]
    pub labels: Vec<String>,

    /// Length of one interval, e.g. `1w`
    #[serde(default)]
    pub period: PeriodSpec,

    /// Number of intervals to report
    #[serde(default = "default_interval_count")]
    pub interval_count: u32,

    /// Base URL of the GitHub REST API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Base URL of the GitHub web interface
    #[serde(default = "default_web_url")]
    pub web_url: String,

    /// Number of search requests allowed in flight at once
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,

    /// Minimum spacing between two search requests
    #[serde(default = "default_min_request_interval", with = "humantime_serde")]
    pub min_request_interval: Duration,

    /// Longest wait for a rate limit reset before failing
    #[serde(default = "default_max_rate_limit_wait", with = "humantime_serde")]
    pub max_rate_limit_wait: Duration,
}

fn default_labels() -> Vec<String> {
    vec!["issues".to_string(), "pulls".to_string()]
}

const fn default_interval_count() -> u32 {
    4
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_web_url() -> String {
    "https://github.com".to_string()
}

const fn default_max_concurrent_requests() -> usize {
    2
}

const fn default_min_request_interval() -> Duration {
    Duration::from_secs(1)
}

const fn default_max_rate_limit_wait() -> Duration {
    Duration::from_hours(1)
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// Without an explicit path, `issue-stats.toml` in the current directory is used when it exists.
    pub fn load(config_path: Option<&Utf8Path>) -> Result<Self> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading configuration file '{path}'"))?;
            (path.to_path_buf(), text)
        } else {
            let path = Utf8PathBuf::from(DEFAULT_CONFIG_FILE);
            match fs::read_to_string(&path) {
                Ok(text) => (path, text),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    // No config file found, use defaults
                    return Ok(Self::default());
                }
                Err(e) => return Err(e).into_app_err_with(|| format!("reading configuration file '{path}'")),
            }
        };

        let config: Self = toml::from_str(&text).into_app_err_with(|| format!("parsing configuration file '{final_path}'"))?;
        config.validate().into_app_err_with(|| format!("validating configuration file '{final_path}'"))?;

        Ok(config)
    }

    /// Save the default configuration to a TOML file
    pub fn save_default(output_path: &Utf8Path) -> Result<()> {
        fs::write(output_path, DEFAULT_CONFIG_TOML).into_app_err_with(|| format!("writing default configuration to {output_path}"))?;
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        for scope in &self.scopes {
            let _ = Scope::parse(scope)?;
        }

        for label in &self.labels {
            let _ = LabelFilter::parse(label)?;
        }

        if self.interval_count == 0 {
            bail!("interval_count must be at least 1");
        }

        if self.max_concurrent_requests == 0 {
            bail!("max_concurrent_requests must be at least 1");
        }

        let _ = self.api_url()?;
        let _ = self.web_url()?;

        Ok(())
    }

    pub fn api_url(&self) -> Result<Url> {
        Url::parse(&self.api_url).into_app_err_with(|| format!("invalid api_url '{}'", self.api_url))
    }

    pub fn web_url(&self) -> Result<Url> {
        Url::parse(&self.web_url).into_app_err_with(|| format!("invalid web_url '{}'", self.web_url))
    }
}

impl Default for Config {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG_TOML).expect("default_config.toml should be valid TOML that deserializes to Config")
    }
}
