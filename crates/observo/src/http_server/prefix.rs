use std::convert::Infallible;

use axum::async_trait;
use axum::extract::{FromRequestParts, OriginalUri};
use http::request::Parts;

use crate::ServiceState;

/// Path prefix the panel is mounted under, without a trailing slash.
///
/// Empty when the panel is served at the root. Taken from
/// [`crate::Config::base_path`] when set, otherwise inferred by comparing
/// the request URI the panel sees with the one the host received.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MountPrefix(pub String);

impl MountPrefix {
    /// Join a panel-relative path (starting with `/`) onto the prefix.
    pub fn join(&self, path: &str) -> String {
        format!("{}{}", self.0, path)
    }

    /// The index URL. Under a prefix this is the bare prefix, which is the
    /// path axum's `nest` answers on.
    pub fn index(&self) -> String {
        if self.0.is_empty() {
            "/".to_string()
        } else {
            self.0.clone()
        }
    }

    pub fn login(&self) -> String {
        self.join("/login")
    }
}

#[async_trait]
impl FromRequestParts<ServiceState> for MountPrefix {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServiceState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(base) = state.base_path() {
            return Ok(Self(base));
        }

        let inner = parts.uri.path();
        let prefix = match parts.extensions.get::<OriginalUri>() {
            Some(OriginalUri(original)) => infer_prefix(original.path(), inner),
            None => String::new(),
        };
        Ok(Self(prefix))
    }
}

fn infer_prefix(original: &str, inner: &str) -> String {
    if let Some(prefix) = original.strip_suffix(inner) {
        return prefix.trim_end_matches('/').to_string();
    }
    // `/observo` nested at `/observo` is seen by the panel as `/`
    if inner == "/" {
        return original.trim_end_matches('/').to_string();
    }
    String::new()
}
