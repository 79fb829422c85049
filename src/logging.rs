//! One log file per run; `--verbose` mirrors events to stderr.

use chrono::Local;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_ENV: &str = "SAFECLI_LOG";

pub fn init(log_dir: &Path, verbose: bool) -> Option<WorkerGuard> {
    let log_path = match create_log_file(log_dir) {
        Ok(path) => path,
        Err(err) => {
            eprintln!("warning: logging disabled: {err}");
            return None;
        }
    };
    let log_file = match fs::File::create(&log_path) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("warning: failed to create log file: {err}");
            return None;
        }
    };

    let (writer, guard) = tracing_appender::non_blocking(log_file);
    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true);
    let stderr_layer = verbose.then(|| {
        fmt::layer()
            .with_writer(io::stderr)
            .with_target(false)
            .without_time()
    });

    let result = tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(file_layer)
        .with(stderr_layer)
        .try_init();
    if let Err(err) = result {
        eprintln!("warning: failed to initialize logging: {err}");
        return None;
    }

    tracing::info!("logging to {}", log_path.display());
    Some(guard)
}

fn create_log_file(log_dir: &Path) -> io::Result<PathBuf> {
    fs::create_dir_all(log_dir)?;
    let timestamp = Local::now().format("%Y-%m-%d-%H-%M-%S");
    Ok(log_dir.join(format!("safecli.{timestamp}.log")))
}

fn env_filter(verbose: bool) -> EnvFilter {
    let default = if verbose { "debug" } else { "info" };
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default))
}
