use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::auth::Credentials;
use crate::config::Config;
use crate::registry::WatchRegistry;

/// Cookie names and scope shared by the session and notice cookies.
#[derive(Debug, Clone)]
pub struct CookieSettings {
    pub session_name: String,
    pub path: String,
}

/// Shared panel state, handed to every request through axum `State`.
///
/// Registration and credential changes are meant to happen before serving.
/// They are safe afterwards, but in-flight requests may see either version,
/// and a password change signs out every session immediately.
#[derive(Clone)]
pub struct State {
    inner: Arc<Inner>,
}

struct Inner {
    registry: RwLock<WatchRegistry>,
    credentials: RwLock<Credentials>,
    cookies: RwLock<CookieSettings>,
    base_path: RwLock<Option<String>>,
    restrict_to_watched: bool,
}

impl State {
    pub fn from_config(config: &Config) -> Self {
        let credentials = Credentials::new(
            config.username.clone(),
            config.password.clone(),
            config.secret_key.clone(),
        );
        tracing::debug!(
            guard_enabled = credentials.is_enabled(),
            restrict_to_watched = config.restrict_to_watched,
            "panel state initialised"
        );

        Self {
            inner: Arc::new(Inner {
                registry: RwLock::new(WatchRegistry::new()),
                credentials: RwLock::new(credentials),
                cookies: RwLock::new(CookieSettings {
                    session_name: config.session_cookie.clone(),
                    path: config.cookie_path.clone(),
                }),
                base_path: RwLock::new(config.base_path.as_deref().map(normalize_base_path)),
                restrict_to_watched: config.restrict_to_watched,
            }),
        }
    }

    pub fn registry(&self) -> RwLockReadGuard<'_, WatchRegistry> {
        self.inner.registry.read()
    }

    pub fn registry_mut(&self) -> RwLockWriteGuard<'_, WatchRegistry> {
        self.inner.registry.write()
    }

    pub fn credentials(&self) -> RwLockReadGuard<'_, Credentials> {
        self.inner.credentials.read()
    }

    pub fn credentials_mut(&self) -> RwLockWriteGuard<'_, Credentials> {
        self.inner.credentials.write()
    }

    pub fn cookies(&self) -> CookieSettings {
        self.inner.cookies.read().clone()
    }

    pub fn set_cookie_path(&self, path: impl Into<String>) {
        self.inner.cookies.write().path = path.into();
    }

    pub fn base_path(&self) -> Option<String> {
        self.inner.base_path.read().clone()
    }

    pub fn set_base_path(&self, base_path: Option<&str>) {
        *self.inner.base_path.write() = base_path.map(normalize_base_path);
    }

    pub fn restrict_to_watched(&self) -> bool {
        self.inner.restrict_to_watched
    }
}

impl FromRef<State> for Key {
    fn from_ref(state: &State) -> Self {
        state.credentials().signing_key().clone()
    }
}

/// `"/observo/"` and `"observo"` both become `"/observo"`; `"/"` becomes `""`.
fn normalize_base_path(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}
