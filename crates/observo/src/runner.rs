use crate::mount::Panel;

/// Where and how the standalone panel listens.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub host: String,
    pub port: u16,
    /// Verbose logging. The binary lowers its log filter to DEBUG.
    pub debug: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            debug: false,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Serve the panel on its own until Ctrl-C.
pub async fn run(panel: Panel, config: RunConfig) -> Result<(), RunError> {
    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
        .await
        .map_err(|source| RunError::Bind {
            addr: format!("{}:{}", config.host, config.port),
            source,
        })?;
    tracing::info!("observo listening on http://{}", listener.local_addr()?);
    if config.debug {
        tracing::debug!("debug mode enabled");
    }

    axum::serve(listener, panel.router())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("observo stopped");
    Ok(())
}

/// [`run`] from synchronous code, on a fresh multi-threaded runtime.
pub fn run_blocking(panel: Panel, config: RunConfig) -> Result<(), RunError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run(panel, config))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
