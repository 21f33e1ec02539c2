use std::path::PathBuf;

use clap::Parser;

use observo::config::{PASSWORD_ENV, SECRET_KEY_ENV, USERNAME_ENV};
use observo::{Config, Panel, RunConfig, DEFAULT_LOGS_DIR};

/// Serve the observo log panel on its own.
#[derive(Parser, Debug)]
#[command(name = "observo", version, about)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 5000)]
    port: u16,

    /// Verbose logging
    #[arg(long)]
    debug: bool,

    /// Login username
    #[arg(long, env = USERNAME_ENV)]
    username: Option<String>,

    /// Login password; also seeds the session signing key
    #[arg(long, env = PASSWORD_ENV, hide_env_values = true)]
    password: Option<String>,

    /// Pin the session signing secret
    #[arg(long, env = SECRET_KEY_ENV, hide_env_values = true)]
    secret_key: Option<String>,

    /// Logs directory to watch
    #[arg(long, default_value = DEFAULT_LOGS_DIR)]
    logs: PathBuf,

    /// Extra directory to watch, as TITLE=PATH (repeatable)
    #[arg(long = "watch", value_parser = parse_watch)]
    watches: Vec<(String, PathBuf)>,

    /// Single file to watch (repeatable)
    #[arg(long = "file")]
    files: Vec<PathBuf>,

    /// Refuse file operations outside the watched paths
    #[arg(long)]
    restrict: bool,
}

fn parse_watch(value: &str) -> Result<(String, PathBuf), String> {
    match value.split_once('=') {
        Some((title, path)) if !title.is_empty() && !path.is_empty() => {
            Ok((title.to_string(), PathBuf::from(path)))
        }
        _ => Err(format!("expected TITLE=PATH, got '{}'", value)),
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = if args.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    let config = Config {
        username: args.username,
        password: args.password,
        secret_key: args.secret_key,
        restrict_to_watched: args.restrict,
        ..Config::default()
    };

    let panel = Panel::new(config);
    panel.watch_logs(args.logs);
    for (title, path) in args.watches {
        panel.watch(title, path);
    }
    for path in args.files {
        panel.watch_file(path, None);
    }

    if !panel.state().credentials().is_enabled() {
        tracing::warn!("no username or password configured, the panel is open to anyone");
    }

    let run_config = RunConfig {
        host: args.host,
        port: args.port,
        debug: args.debug,
    };
    observo::run_blocking(panel, run_config)?;
    Ok(())
}
