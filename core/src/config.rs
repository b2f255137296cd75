//! Client configuration read from the environment.

use std::time::Duration;

use crate::error::ConfigError;
use crate::types::Credentials;

pub const AUTH_URL_VAR: &str = "MOVIES_AUTH_URL";
pub const API_URL_VAR: &str = "MOVIES_API_URL";
pub const TIMEOUT_VAR: &str = "MOVIES_TIMEOUT_SECS";
pub const ADMIN_EMAIL_VAR: &str = "MOVIES_ADMIN_EMAIL";
pub const ADMIN_PASSWORD_VAR: &str = "MOVIES_ADMIN_PASSWORD";

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";

/// Where the services live and how to reach them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the auth service (`/auth/*`, `/user/*`).
    pub auth_base_url: String,
    /// Base URL of the movies service (`/movies*`).
    pub api_base_url: String,
    pub timeout: Option<Duration>,
    pub admin: Option<Credentials>,
}

impl Config {
    /// Both services at `base_url`, no timeout, no admin account.
    pub fn local(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            auth_base_url: base_url.clone(),
            api_base_url: base_url,
            timeout: None,
            admin: None,
        }
    }

    pub fn with_admin(mut self, admin: Credentials) -> Self {
        self.admin = Some(admin);
        self
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base = |var: &str| lookup(var).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout = match lookup(TIMEOUT_VAR) {
            Some(value) => Some(Duration::from_secs(value.trim().parse().map_err(|_| {
                ConfigError::InvalidTimeout {
                    var: TIMEOUT_VAR,
                    value,
                }
            })?)),
            None => None,
        };

        let admin = match (lookup(ADMIN_EMAIL_VAR), lookup(ADMIN_PASSWORD_VAR)) {
            (Some(email), Some(password)) => Some(Credentials::new(email, password)),
            (None, None) => None,
            (Some(_), None) => {
                return Err(ConfigError::IncompleteCredentials {
                    present: ADMIN_EMAIL_VAR,
                    missing: ADMIN_PASSWORD_VAR,
                })
            }
            (None, Some(_)) => {
                return Err(ConfigError::IncompleteCredentials {
                    present: ADMIN_PASSWORD_VAR,
                    missing: ADMIN_EMAIL_VAR,
                })
            }
        };

        Ok(Self {
            auth_base_url: base(AUTH_URL_VAR),
            api_base_url: base(API_URL_VAR),
            timeout,
            admin,
        })
    }
}
