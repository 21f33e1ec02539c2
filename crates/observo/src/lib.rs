//! Embeddable web panel for looking after server-side log files.
//!
//! Build a [`Panel`], register what it should show, then either nest its
//! router into a host application or run it on its own:
//!
//! ```no_run
//! use axum::{routing::get, Router};
//! use observo::{Config, Panel};
//!
//! # async fn example() -> std::io::Result<()> {
//! let panel = Panel::new(Config::from_env());
//! panel.watch_logs("logs");
//!
//! let app = panel.mount(Router::new().route("/", get(|| async { "Hello" })), "/observo");
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, app).await
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod files;
pub mod format;
pub mod http_server;
pub mod mount;
pub mod registry;
pub mod runner;
pub mod state;

pub use config::Config;
pub use mount::{BlockingPanel, MountError, Panel};
pub use registry::{WatchRegistry, WatchedDirectory, WatchedFile, DEFAULT_LOGS_DIR};
pub use runner::{run, run_blocking, RunConfig, RunError};
pub use state::State as ServiceState;
