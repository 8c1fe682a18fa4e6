use std::fmt::Display;
use std::str::FromStr;

use crate::error::Error;
use crate::middleware::AuthConfig;
use crate::upstream::NavitimeConfig;

const DEFAULT_PORT: u16 = 3000;

/// Process-wide configuration, built once at start-up and handed to the
/// router. Nothing reads the environment after this.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub auth: AuthConfig,
    pub navitime: NavitimeConfig,
}

impl Config {
    /// # Errors
    ///
    /// Returns [`Error::Config`] when a variable is present but invalid.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// # Errors
    ///
    /// Returns [`Error::Config`] when a variable is present but invalid.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let port = try_load(&lookup, "PORT", DEFAULT_PORT)?;
        let auth = AuthConfig::from_vars(&lookup).map_err(|e| Error::Config(e.to_string()))?;

        let api_key = lookup("RAPIDAPI_KEY").filter(|k| !k.is_empty());
        if api_key.is_none() {
            tracing::warn!("RAPIDAPI_KEY not set; search endpoints will answer 500");
        }

        Ok(Self {
            port,
            auth,
            navitime: NavitimeConfig::new(api_key),
        })
    }

    /// Log the effective configuration, without secrets.
    pub fn log(&self) {
        tracing::info!(
            port = self.port,
            project_id = %self.auth.project_id(),
            auth_server = %self.auth.auth_server_url(),
            app_base_url = %self.auth.app_base_url(),
            secure_cookies = self.auth.secure_cookies(),
            rapidapi_key = if self.navitime.has_api_key() { "set" } else { "missing" },
            "Configuration loaded"
        );
    }
}

fn try_load<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T, Error>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        Some(value) => value
            .parse()
            .map_err(|e| Error::Config(format!("invalid {key} value {value:?}: {e}"))),
        None => {
            tracing::info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}
