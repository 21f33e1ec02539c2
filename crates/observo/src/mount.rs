//! Embedding the panel into a host.
//!
//! - axum hosts nest [`Panel::router`] (or call [`Panel::mount`]).
//! - Other `tower`/`hyper` hosts take [`Panel::into_service`].
//! - Synchronous programs go through [`BlockingPanel`], which drives the
//!   async router on its own current-thread runtime.
//!
//! Hosts that strip the mount prefix themselves should set
//! [`Config::base_path`] so links and redirects point back under it.

use std::convert::Infallible;
use std::path::PathBuf;

use axum::body::Body;
use axum::extract::Request;
use axum::response::Response;
use axum::Router;
use tower::util::BoxCloneService;
use tower::ServiceExt;

use crate::config::Config;
use crate::http_server;
use crate::ServiceState;

/// Handle used to configure the panel and hand it to a host.
#[derive(Clone)]
pub struct Panel {
    state: ServiceState,
}

impl Panel {
    pub fn new(config: Config) -> Self {
        Self {
            state: ServiceState::from_config(&config),
        }
    }

    pub fn state(&self) -> &ServiceState {
        &self.state
    }

    /// Expose the current contents of a directory under `title`.
    pub fn watch(&self, title: impl Into<String>, path: impl Into<PathBuf>) {
        self.state.registry_mut().watch(title, path);
    }

    /// Expose a directory titled "logs".
    pub fn watch_logs(&self, logs_dir: impl Into<PathBuf>) {
        self.state.registry_mut().watch_logs(logs_dir);
    }

    /// Expose a single file, shown as `name` or its file name.
    pub fn watch_file(&self, path: impl Into<PathBuf>, name: Option<&str>) {
        self.state
            .registry_mut()
            .watch_file(path, name.map(str::to_string));
    }

    pub fn set_username(&self, username: impl Into<String>) {
        self.state.credentials_mut().set_username(username);
    }

    /// Set the password. Every existing session is signed out.
    pub fn set_password(&self, password: impl Into<String>) {
        self.state.credentials_mut().set_password(password);
    }

    pub fn set_secret_key(&self, secret: impl Into<String>) {
        self.state.credentials_mut().set_secret_key(secret);
    }

    /// Scope the session cookie to `path`. Use `/` to keep it valid
    /// wherever the panel is mounted.
    pub fn set_cookie_path(&self, path: impl Into<String>) {
        self.state.set_cookie_path(path);
    }

    pub fn set_base_path(&self, base_path: Option<&str>) {
        self.state.set_base_path(base_path);
    }

    pub fn router(&self) -> Router {
        http_server::router(self.state.clone())
    }

    /// Nest the panel into `host` at `prefix`, with the session cookie
    /// scoped to `/`.
    pub fn mount(&self, host: Router, prefix: &str) -> Router {
        self.set_cookie_path("/");
        let prefix = prefix.trim_end_matches('/');
        if prefix.is_empty() {
            host.merge(self.router())
        } else {
            host.nest(prefix, self.router())
        }
    }

    /// The panel as a boxed `tower` service for non-axum hosts.
    pub fn into_service(self) -> BoxCloneService<Request, Response, Infallible> {
        BoxCloneService::new(self.router())
    }

    pub fn blocking(&self) -> Result<BlockingPanel, MountError> {
        BlockingPanel::new(self)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MountError {
    #[error("failed to build runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("BlockingPanel cannot be driven from inside an async runtime")]
    InsideRuntime,
    #[error("failed to read response body: {0}")]
    Body(#[from] axum::Error),
}

/// Synchronous front for the panel.
///
/// Requests carry panel-relative URIs (`/`, `/login`, `/file/...`).
pub struct BlockingPanel {
    router: Router,
    runtime: tokio::runtime::Runtime,
}

impl BlockingPanel {
    pub fn new(panel: &Panel) -> Result<Self, MountError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self {
            router: panel.router(),
            runtime,
        })
    }

    /// Serve one request to completion.
    pub fn handle(
        &self,
        request: http::Request<Vec<u8>>,
    ) -> Result<http::Response<Vec<u8>>, MountError> {
        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(MountError::InsideRuntime);
        }

        let request = request.map(Body::from);
        self.runtime.block_on(async {
            let response = match self.router.clone().oneshot(request).await {
                Ok(response) => response,
                Err(never) => match never {},
            };
            let (parts, body) = response.into_parts();
            let bytes = axum::body::to_bytes(body, usize::MAX).await?;
            Ok::<_, MountError>(http::Response::from_parts(parts, bytes.to_vec()))
        })
    }
}
