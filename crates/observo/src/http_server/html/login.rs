use askama::Template;
use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use axum_extra::extract::SignedCookieJar;
use http::StatusCode;
use serde::Deserialize;

use crate::auth::session;
use crate::http_server::{render, MountPrefix};
use crate::ServiceState;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub base: String,
    pub error: Option<String>,
    pub ask_username: bool,
}

fn login_page(state: &ServiceState, prefix: &MountPrefix, error: Option<String>) -> Response {
    let template = LoginTemplate {
        base: prefix.0.clone(),
        error,
        ask_username: state.credentials().username().is_some(),
    };
    render(StatusCode::OK, &template)
}

pub async fn page_handler(State(state): State<ServiceState>, prefix: MountPrefix) -> Response {
    login_page(&state, &prefix, None)
}

/// Check the submitted credentials and start a session.
///
/// Failures re-render the form with one generic message, whichever field
/// was wrong.
#[tracing::instrument(skip_all)]
pub async fn submit_handler(
    State(state): State<ServiceState>,
    prefix: MountPrefix,
    jar: SignedCookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    let verified = state
        .credentials()
        .verify(form.username.as_deref(), form.password.as_deref());

    match verified {
        Ok(()) => {
            tracing::info!("login succeeded");
            let jar = session::login(jar, &state.cookies());
            (jar, Redirect::to(&prefix.index())).into_response()
        }
        Err(e) => {
            tracing::warn!("login rejected");
            login_page(&state, &prefix, Some(e.to_string()))
        }
    }
}
