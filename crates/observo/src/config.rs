/// Environment variable holding the login username.
pub const USERNAME_ENV: &str = "OBSERVO_USERNAME";
/// Environment variable holding the login password.
pub const PASSWORD_ENV: &str = "OBSERVO_PASSWORD";
/// Environment variable pinning the cookie signing secret.
pub const SECRET_KEY_ENV: &str = "OBSERVO_SECRET_KEY";

pub const DEFAULT_SESSION_COOKIE: &str = "osession";
pub const DEFAULT_COOKIE_PATH: &str = "/";

/// Startup configuration for a [`crate::Panel`].
#[derive(Debug, Clone)]
pub struct Config {
    /// Username required at login. Skipped when `None`.
    pub username: Option<String>,
    /// Password required at login. Also seeds the cookie signing key.
    pub password: Option<String>,
    /// Explicit signing secret; overrides the password-derived key.
    pub secret_key: Option<String>,
    pub session_cookie: String,
    /// Path scope of the session cookie.
    pub cookie_path: String,
    /// Mount prefix used for links and redirects. Inferred from the request
    /// when `None`, which works for axum hosts that nest the panel.
    pub base_path: Option<String>,
    /// Refuse file operations outside the watched directories and files.
    pub restrict_to_watched: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            username: None,
            password: None,
            secret_key: None,
            session_cookie: DEFAULT_SESSION_COOKIE.to_string(),
            cookie_path: DEFAULT_COOKIE_PATH.to_string(),
            base_path: None,
            restrict_to_watched: false,
        }
    }
}

impl Config {
    /// Defaults, with credentials read from `OBSERVO_USERNAME`,
    /// `OBSERVO_PASSWORD` and `OBSERVO_SECRET_KEY`.
    pub fn from_env() -> Self {
        Self {
            username: std::env::var(USERNAME_ENV).ok(),
            password: std::env::var(PASSWORD_ENV).ok(),
            secret_key: std::env::var(SECRET_KEY_ENV).ok(),
            ..Self::default()
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = Some(base_path.into());
        self
    }

    pub fn restrict_to_watched(mut self, restrict: bool) -> Self {
        self.restrict_to_watched = restrict;
        self
    }
}
