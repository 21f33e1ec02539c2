use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::SignedCookieJar;

use super::Session;
use crate::http_server::prefix::MountPrefix;
use crate::ServiceState;

/// Let the request through when the guard is off or the session is logged
/// in; otherwise redirect to the login page.
pub async fn require_login(
    State(state): State<ServiceState>,
    prefix: MountPrefix,
    jar: SignedCookieJar,
    request: Request,
    next: Next,
) -> Response {
    if !state.credentials().is_enabled() {
        return next.run(request).await;
    }

    let session = Session::from_jar(&jar, &state.cookies());
    if session.logged_in {
        return next.run(request).await;
    }

    tracing::debug!(path = %request.uri().path(), "anonymous request, redirecting to login");
    Redirect::to(&prefix.login()).into_response()
}
