//! One-shot notices shown on the next index render.

use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::SignedCookieJar;

use crate::state::CookieSettings;

const NOTICE_COOKIE: &str = "oflash";

fn read(jar: &SignedCookieJar) -> Vec<String> {
    jar.get(NOTICE_COOKIE)
        .and_then(|cookie| serde_json::from_str(cookie.value()).ok())
        .unwrap_or_default()
}

/// Queue a notice for the next page.
pub fn push(
    jar: SignedCookieJar,
    settings: &CookieSettings,
    message: impl Into<String>,
) -> SignedCookieJar {
    let mut notices = read(&jar);
    notices.push(message.into());
    let value = serde_json::to_string(&notices).unwrap_or_default();

    jar.add(
        Cookie::build((NOTICE_COOKIE, value))
            .path(settings.path.clone())
            .http_only(true)
            .same_site(SameSite::Lax)
            .build(),
    )
}

/// Drain queued notices. The returned jar carries the removal cookie.
pub fn take(jar: SignedCookieJar, settings: &CookieSettings) -> (SignedCookieJar, Vec<String>) {
    let notices = read(&jar);
    if notices.is_empty() {
        return (jar, notices);
    }

    let jar = jar.remove(
        Cookie::build((NOTICE_COOKIE, ""))
            .path(settings.path.clone())
            .build(),
    );
    (jar, notices)
}
