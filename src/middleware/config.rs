use url::Url;

use super::cookies;
use super::error::AuthError;

const DEFAULT_AUTH_SERVER_URL: &str = "http://localhost:8000";
const DEFAULT_APP_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_PROJECT_ID: &str = "transport-search";

/// Shared auth settings used by both config and runtime state.
#[derive(Clone, Debug)]
pub(crate) struct AuthSettings {
    pub(crate) project_id: String,
    pub(crate) auth_server_url: Url,
    pub(crate) login_url: Url,
    pub(crate) app_base_url: Url,
    pub(crate) session_ttl_days: i64,
    pub(crate) secure_cookies: bool,
}

impl AuthSettings {
    #[must_use]
    pub(crate) fn session_cookie_name(&self) -> String {
        cookies::session_cookie_name(&self.project_id)
    }
}

/// Auth gate configuration.
///
/// Use [`from_env()`](AuthConfig::from_env) for convention-based setup,
/// or [`new()`](AuthConfig::new) with `with_*` methods for full control.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub(super) settings: AuthSettings,
}

impl AuthConfig {
    /// Create config for the given auth server and public application URL.
    ///
    /// Project id defaults to `transport-search`, sessions last 7 days and
    /// cookies are `Secure`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Config`] if the login URL cannot be derived.
    pub fn new(auth_server_url: Url, app_base_url: Url) -> Result<Self, AuthError> {
        let login_url = login_url(&auth_server_url, DEFAULT_PROJECT_ID)?;
        Ok(Self {
            settings: AuthSettings {
                project_id: DEFAULT_PROJECT_ID.into(),
                auth_server_url,
                login_url,
                app_base_url,
                session_ttl_days: 7,
                secure_cookies: true,
            },
        })
    }

    /// Create config from environment variables.
    ///
    /// # Optional env vars
    /// - `AUTH_SERVER_URL`: shared auth server (default `http://localhost:8000`)
    /// - `PROJECT_ID`: namespaces the session cookie and the login path
    ///   (default `transport-search`)
    /// - `APP_BASE_URL`: public URL of this app, used to build login return
    ///   URLs (default `http://localhost:3000`)
    /// - `APP_ENV`: `production` enables `Secure` cookies
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Config`] if a URL is invalid.
    pub fn from_env() -> Result<Self, AuthError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Like [`from_env()`](AuthConfig::from_env), reading from `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Config`] if a URL is invalid.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AuthError> {
        let auth_server_url = parse_url(
            "AUTH_SERVER_URL",
            &lookup("AUTH_SERVER_URL").unwrap_or_else(|| DEFAULT_AUTH_SERVER_URL.into()),
        )?;
        let app_base_url = parse_url(
            "APP_BASE_URL",
            &lookup("APP_BASE_URL").unwrap_or_else(|| DEFAULT_APP_BASE_URL.into()),
        )?;
        let production = lookup("APP_ENV").is_some_and(|env| env == "production");

        let mut config = Self::new(auth_server_url, app_base_url)?.with_secure_cookies(production);
        if let Some(project_id) = lookup("PROJECT_ID").filter(|p| !p.is_empty()) {
            config = config.with_project_id(project_id)?;
        }
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns [`AuthError::Config`] if the login URL cannot be derived.
    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Result<Self, AuthError> {
        let project_id = project_id.into();
        self.settings.login_url = login_url(&self.settings.auth_server_url, &project_id)?;
        self.settings.project_id = project_id;
        Ok(self)
    }

    #[must_use]
    pub fn with_secure_cookies(mut self, secure: bool) -> Self {
        self.settings.secure_cookies = secure;
        self
    }

    #[must_use]
    pub fn with_session_ttl_days(mut self, days: i64) -> Self {
        self.settings.session_ttl_days = days;
        self
    }

    #[must_use]
    pub fn project_id(&self) -> &str {
        &self.settings.project_id
    }

    #[must_use]
    pub fn auth_server_url(&self) -> &Url {
        &self.settings.auth_server_url
    }

    #[must_use]
    pub fn app_base_url(&self) -> &Url {
        &self.settings.app_base_url
    }

    /// External login page, without the `redirect` parameter.
    #[must_use]
    pub fn login_url(&self) -> &Url {
        &self.settings.login_url
    }

    #[must_use]
    pub fn secure_cookies(&self) -> bool {
        self.settings.secure_cookies
    }

    /// Primary session cookie name, `session_{PROJECT_ID}`.
    #[must_use]
    pub fn session_cookie_name(&self) -> String {
        self.settings.session_cookie_name()
    }
}

fn login_url(auth_server_url: &Url, project_id: &str) -> Result<Url, AuthError> {
    auth_server_url
        .join(&format!("/login/{project_id}"))
        .map_err(|e| AuthError::Config(format!("login URL for project {project_id}: {e}")))
}

fn parse_url(name: &str, value: &str) -> Result<Url, AuthError> {
    value
        .parse()
        .map_err(|e| AuthError::Config(format!("{name}: {e}")))
}
