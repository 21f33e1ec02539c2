use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::SignedCookieJar;
use serde::{Deserialize, Serialize};

use crate::state::CookieSettings;

/// Lifetime of a persistent login.
const SESSION_MAX_AGE_DAYS: i64 = 31;

/// Payload of the signed session cookie.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub logged_in: bool,
}

impl Session {
    pub fn logged_in() -> Self {
        Self { logged_in: true }
    }

    /// Read the session from a verified jar. Cookies that fail signature
    /// checks never reach this point; malformed payloads read as anonymous.
    pub fn from_jar(jar: &SignedCookieJar, settings: &CookieSettings) -> Self {
        jar.get(&settings.session_name)
            .and_then(|cookie| serde_json::from_str(cookie.value()).ok())
            .unwrap_or_default()
    }

    pub fn into_cookie(self, settings: &CookieSettings) -> Cookie<'static> {
        // Serialising a struct of one bool cannot fail
        let value = serde_json::to_string(&self).unwrap_or_default();
        Cookie::build((settings.session_name.clone(), value))
            .path(settings.path.clone())
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(time::Duration::days(SESSION_MAX_AGE_DAYS))
            .build()
    }
}

/// Add a logged-in session cookie to the jar.
pub fn login(jar: SignedCookieJar, settings: &CookieSettings) -> SignedCookieJar {
    jar.add(Session::logged_in().into_cookie(settings))
}

/// Remove the session cookie. The removal cookie must carry the same path
/// the session was issued with or browsers keep the original.
pub fn logout(jar: SignedCookieJar, settings: &CookieSettings) -> SignedCookieJar {
    jar.remove(
        Cookie::build((settings.session_name.clone(), ""))
            .path(settings.path.clone())
            .build(),
    )
}
