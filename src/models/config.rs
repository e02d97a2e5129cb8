//! Configuration model loaded from external sources.

use std::path::Path;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde::de::{self, Deserializer};

use crate::domain::auth::Credentials;
use crate::domain::types::UserRole;
use crate::pagination::DEFAULT_ITEMS_PER_PAGE;
use crate::repository::{FallbackPolicy, ResourceEndpoint};

/// Prefix of environment overrides, e.g. `DONOR_CONSOLE__API_TOKEN`.
pub const ENV_PREFIX: &str = "DONOR_CONSOLE";

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_NAME: &str = "donor-console";

#[derive(Clone, Debug, Deserialize)]
pub struct ResourceConfig {
    /// Alternate collection tried once after a fallback-eligible failure.
    /// Empty disables the fallback.
    #[serde(default)]
    pub alternate: String,
}

impl ResourceConfig {
    fn with_alternate(alternate: &str) -> Self {
        Self {
            alternate: alternate.to_string(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ResourcesConfig {
    pub users: ResourceConfig,
    pub blood_requests: ResourceConfig,
    pub alerts: ResourceConfig,
}

impl Default for ResourcesConfig {
    fn default() -> Self {
        Self {
            users: ResourceConfig::with_alternate("users-alt"),
            blood_requests: ResourceConfig::with_alternate("blood-requests-alt"),
            alerts: ResourceConfig::with_alternate("alerts-alt"),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
/// Settings shared by every list controller.
pub struct ConsoleConfig {
    pub api_base_url: String,
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default)]
    pub api_role: Option<UserRole>,
    #[serde(default = "default_items_per_page")]
    pub items_per_page: usize,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(
        default = "default_fallback_statuses",
        deserialize_with = "deserialize_statuses"
    )]
    pub fallback_statuses: Vec<u16>,
    #[serde(default = "default_fallback_on_server_error")]
    pub fallback_on_server_error: bool,
    #[serde(default)]
    pub resources: ResourcesConfig,
}

fn default_items_per_page() -> usize {
    DEFAULT_ITEMS_PER_PAGE
}

fn default_request_timeout_secs() -> u64 {
    15
}

fn default_fallback_statuses() -> Vec<u16> {
    FallbackPolicy::default().statuses
}

/// Status list as a sequence, a single status or comma-separated text.
#[derive(Deserialize)]
#[serde(untagged)]
enum StatusList {
    List(Vec<u16>),
    One(u16),
    Text(String),
}

fn deserialize_statuses<'de, D>(deserializer: D) -> Result<Vec<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    match StatusList::deserialize(deserializer)? {
        StatusList::List(statuses) => Ok(statuses),
        StatusList::One(status) => Ok(vec![status]),
        StatusList::Text(text) => text
            .split(',')
            .map(str::trim)
            .filter(|status| !status.is_empty())
            .map(|status| {
                status
                    .parse::<u16>()
                    .map_err(|_| de::Error::custom(format!("invalid HTTP status `{status}`")))
            })
            .collect(),
    }
}

fn default_fallback_on_server_error() -> bool {
    true
}

/// `DONOR_CONSOLE__*` overrides, e.g. `DONOR_CONSOLE__FALLBACK_STATUSES=400,401`.
fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX).separator("__")
}

impl ConsoleConfig {
    /// Reads `path` (or the optional default file) and applies environment
    /// overrides on top.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };

        Config::builder()
            .add_source(file)
            .add_source(environment())
            .build()?
            .try_deserialize()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn fallback_policy(&self) -> FallbackPolicy {
        FallbackPolicy {
            statuses: self.fallback_statuses.clone(),
            server_errors: self.fallback_on_server_error,
        }
    }

    pub fn credentials(&self) -> Credentials {
        match &self.api_token {
            Some(token) => Credentials::new(token.clone(), self.api_role),
            None => Credentials::anonymous(),
        }
    }

    pub fn endpoint(&self, resource: &str, settings: &ResourceConfig) -> ResourceEndpoint {
        ResourceEndpoint::new(resource).alternate(settings.alternate.as_str())
    }
}
