//! Configuration loading via `ortho-config`.

use std::ffi::OsString;
use std::time::Duration;

use ortho_config::OrthoConfig;
use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;

/// Public SoftLayer REST endpoint.
pub const DEFAULT_ENDPOINT_URL: &str = "https://api.softlayer.com/rest/v3.1";

/// Transport settings for the SoftLayer API derived from defaults,
/// configuration files, and environment variables.
///
/// Credentials are not part of this structure; they are passed on the
/// command line so each pipeline step can act on behalf of a different
/// account.
#[derive(Clone, Debug, Deserialize, OrthoConfig, PartialEq, Eq)]
#[ortho_config(
    prefix = "SL",
    discovery(
        app_name = "slguest",
        env_var = "SLGUEST_CONFIG_PATH",
        config_file_name = "slguest.toml",
        dotfile_name = ".slguest.toml",
        project_file_name = "slguest.toml"
    )
)]
pub struct SoftLayerConfig {
    /// Base URL of the REST gateway.
    #[ortho_config(default = DEFAULT_ENDPOINT_URL.to_owned())]
    pub endpoint_url: String,
    /// Seconds to pause between provisioning status checks.
    #[ortho_config(default = 30)]
    pub poll_interval_secs: u64,
    /// Per-request HTTP timeout in seconds.
    #[ortho_config(default = 60)]
    pub request_timeout_secs: u64,
}

impl SoftLayerConfig {
    /// Loads configuration without attempting to parse CLI arguments. Values
    /// merge defaults, configuration files, and environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the merge fails.
    pub fn load_without_cli_args() -> Result<Self, ConfigError> {
        Self::load_from_iter([OsString::from("slguest")])
            .map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Pause between provisioning status checks.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Timeout applied to each HTTP request.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Parses the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEndpoint`] when the value is not an
    /// absolute `http` or `https` URL.
    pub fn endpoint(&self) -> Result<Url, ConfigError> {
        let trimmed = self.endpoint_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ConfigError::MissingField(String::from(
                "missing SoftLayer endpoint: set SL_ENDPOINT_URL or add endpoint_url to slguest.toml",
            )));
        }
        let url = Url::parse(trimmed).map_err(|err| ConfigError::InvalidEndpoint {
            value: trimmed.to_owned(),
            message: err.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEndpoint {
                value: trimmed.to_owned(),
                message: format!("unsupported scheme {}", url.scheme()),
            });
        }
        Ok(url)
    }

    /// Performs semantic validation. Error messages include guidance on how
    /// to provide corrected values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the endpoint is unusable or the request
    /// timeout is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.endpoint()?;
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::MissingField(String::from(
                "request timeout must be positive: set SL_REQUEST_TIMEOUT_SECS or request_timeout_secs in slguest.toml",
            )));
        }
        Ok(())
    }
}

/// Errors raised during configuration loading and validation.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    /// Indicates a required configuration field is empty or unusable.
    #[error("missing configuration field: {0}")]
    MissingField(String),
    /// Indicates the endpoint could not be parsed as an HTTP URL.
    #[error("invalid SoftLayer endpoint '{value}': {message}")]
    InvalidEndpoint {
        /// Endpoint as configured.
        value: String,
        /// Parser error message.
        message: String,
    },
    /// Surfaces errors from the `ortho-config` loader.
    #[error("configuration parsing failed: {0}")]
    Parse(String),
}

impl From<ortho_config::OrthoError> for ConfigError {
    fn from(value: ortho_config::OrthoError) -> Self {
        Self::Parse(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn defaults() -> SoftLayerConfig {
        SoftLayerConfig {
            endpoint_url: DEFAULT_ENDPOINT_URL.to_owned(),
            poll_interval_secs: 30,
            request_timeout_secs: 60,
        }
    }

    #[rstest]
    fn default_config_is_valid(defaults: SoftLayerConfig) {
        let config = defaults;
        assert!(config.validate().is_ok());
        assert_eq!(config.poll_interval(), Duration::from_secs(30));
    }

    #[rstest]
    fn endpoint_strips_trailing_slash(defaults: SoftLayerConfig) {
        let config = SoftLayerConfig {
            endpoint_url: String::from("http://127.0.0.1:8080/rest/v3.1/"),
            ..defaults
        };
        let url = config.endpoint().expect("endpoint should parse");
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/rest/v3.1");
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn empty_endpoint_mentions_env_var(defaults: SoftLayerConfig, #[case] value: &str) {
        let config = SoftLayerConfig {
            endpoint_url: value.to_owned(),
            ..defaults
        };
        let error = config.validate().expect_err("empty endpoint should fail");
        assert!(
            error.to_string().contains("SL_ENDPOINT_URL"),
            "unexpected error: {error}"
        );
    }

    #[rstest]
    #[case("not a url")]
    #[case("ftp://api.softlayer.com/rest")]
    fn unusable_endpoint_is_rejected(defaults: SoftLayerConfig, #[case] value: &str) {
        let config = SoftLayerConfig {
            endpoint_url: value.to_owned(),
            ..defaults
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidEndpoint { .. })
        ));
    }

    #[rstest]
    fn zero_request_timeout_is_rejected(defaults: SoftLayerConfig) {
        let config = SoftLayerConfig {
            request_timeout_secs: 0,
            ..defaults
        };
        let error = config.validate().expect_err("zero timeout should fail");
        assert!(error.to_string().contains("SL_REQUEST_TIMEOUT_SECS"));
    }
}
