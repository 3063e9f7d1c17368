use std::{fs, path::Path, sync::Mutex};

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::core::error::CheckError;

const ROTATE_AT_BYTES: u64 = 1_000_000;

/// Install the global subscriber: stderr always, plus an append-only file when given.
///
/// `RUST_LOG` wins over `verbose` when set.
pub fn init_tracing(verbose: u8, log_file: Option<&Path>) -> Result<(), CheckError> {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let file_layer = match log_file {
        Some(path) => {
            let file = open_log_file(path)?;
            Some(
                fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_target(false),
            )
        }
        None => None,
    };

    let console_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| CheckError::Config(e.to_string()))
}

fn open_log_file(log_path: &Path) -> Result<fs::File, CheckError> {
    if let Some(parent) = log_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| CheckError::Config(e.to_string()))?;
        }
    }
    if let Ok(meta) = fs::metadata(log_path) {
        if meta.len() > ROTATE_AT_BYTES {
            let rotated = log_path.with_extension("log.1");
            let _ = fs::rename(log_path, rotated);
        }
    }
    fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .map_err(|e| CheckError::Config(e.to_string()))
}
