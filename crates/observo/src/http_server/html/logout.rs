use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::SignedCookieJar;

use crate::auth::session;
use crate::http_server::MountPrefix;
use crate::ServiceState;

pub async fn handler(
    State(state): State<ServiceState>,
    prefix: MountPrefix,
    jar: SignedCookieJar,
) -> Response {
    let jar = session::logout(jar, &state.cookies());
    (jar, Redirect::to(&prefix.login())).into_response()
}
